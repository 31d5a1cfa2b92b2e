//! Performance measurement for neighborhood compositing at varying tile sizes

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ndarray::Array1;
use terratile::compositor::mosaic::{MosaicConfig, stitch};
use terratile::compositor::{GeneratorConfig, Rotation, TileGenerator, TileId, TilePlacement};
use terratile::inference::latent::{LatentSpace, random_latents};
use terratile::inference::procedural::{ProceduralStageA, UpsamplingStageB};
use std::hint::black_box;

fn build_generator(
    tile_resolution: usize,
) -> Option<TileGenerator<ProceduralStageA, UpsamplingStageB>> {
    let config = GeneratorConfig::new(32, tile_resolution, tile_resolution * 4, 3);
    let stage_a = ProceduralStageA::new(tile_resolution, 3).ok()?;
    let stage_b = UpsamplingStageB::new(config.scale()).ok()?;
    let latent_space = LatentSpace::new(Array1::from_elem(32, 1.0)).ok()?;
    TileGenerator::new(config, stage_a, stage_b, latent_space).ok()
}

fn full_neighborhood(seed: u64) -> Vec<TilePlacement> {
    random_latents(32, 9, seed)
        .into_iter()
        .enumerate()
        .map(|(index, latent)| {
            TilePlacement::new(latent, TileId(index as u64), Rotation::None)
        })
        .collect()
}

/// Measures single-tile generation cost as the tile resolution grows
fn bench_generate_tile(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_tile");

    for tile_resolution in &[8_usize, 16, 32] {
        let neighborhood = full_neighborhood(7);

        group.bench_with_input(
            BenchmarkId::from_parameter(tile_resolution),
            tile_resolution,
            |b, &resolution| {
                b.iter(|| {
                    // Fresh session per iteration so every Stage-A tile is
                    // actually generated rather than served from cache
                    let Some(mut generator) = build_generator(resolution) else {
                        return;
                    };
                    let tile = generator.generate_tile(black_box(&neighborhood), "bench");
                    black_box(tile).ok();
                });
            },
        );
    }

    group.finish();
}

/// Measures warm-cache compositing where all nine tiles are already resolved
fn bench_generate_tile_cached(c: &mut Criterion) {
    let Some(mut generator) = build_generator(16) else {
        return;
    };
    let neighborhood = full_neighborhood(7);
    if generator.generate_tile(&neighborhood, "warmup").is_err() {
        return;
    }

    c.bench_function("generate_tile_cached", |b| {
        b.iter(|| {
            let tile = generator.generate_tile(black_box(&neighborhood), "bench");
            black_box(tile).ok();
        });
    });
}

/// Measures mosaic stitching, where the identity cache absorbs most of the
/// Stage-A work across adjacent neighborhoods
fn bench_stitch_mosaic(c: &mut Criterion) {
    c.bench_function("stitch_3x3_mosaic", |b| {
        b.iter(|| {
            let Some(mut generator) = build_generator(16) else {
                return;
            };
            let config = MosaicConfig {
                columns: 3,
                rows: 3,
                seed: 42,
            };
            let mosaic = stitch(&mut generator, black_box(&config));
            black_box(mosaic).ok();
        });
    });
}

criterion_group!(
    benches,
    bench_generate_tile,
    bench_generate_tile_cached,
    bench_stitch_mosaic
);
criterion_main!(benches);
