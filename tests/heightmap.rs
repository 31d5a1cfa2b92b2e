//! Validates HGT decoding, window sampling, and PNG export end to end

use std::path::Path;
use terratile::heightmap::hgt::{HgtTile, decode_hgt};
use terratile::heightmap::sampler::{SampleConfig, normalize_sample, sample_windows};
use terratile::io::error::Result;
use terratile::io::image::export_heightmap_sample;

// A synthetic 8x8 tile with a strict north-to-south elevation ramp,
// encoded big-endian as SRTM does
fn ramp_tile_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 * 8 * 2);
    for row in 0..8_i16 {
        for col in 0..8_i16 {
            let elevation = row * 100 + col;
            bytes.extend_from_slice(&elevation.to_be_bytes());
        }
    }
    bytes
}

#[test]
fn test_decode_from_disk_round_trips() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("N47E011.hgt");
    std::fs::write(&path, ramp_tile_bytes())?;

    let tile = decode_hgt(&path)?;
    assert_eq!(tile.resolution(), 8);
    assert_eq!(tile.elevations().get([0, 0]).copied(), Some(0));
    assert_eq!(tile.elevations().get([7, 7]).copied(), Some(707));
    Ok(())
}

#[test]
fn test_missing_file_reports_the_path() {
    let result = decode_hgt(Path::new("/nonexistent/void.hgt"));
    let Err(error) = result else {
        unreachable!("decoding a missing file must fail");
    };
    assert!(error.to_string().contains("void.hgt"));
}

#[test]
fn test_sampling_is_reproducible_and_in_bounds() -> Result<()> {
    let tile = HgtTile::from_bytes(&ramp_tile_bytes(), Path::new("ramp.hgt"))?;
    let config = SampleConfig {
        sample_size: 4,
        samples_per_tile: 6,
        seed: 7,
    };

    let first = sample_windows(&tile, &config)?;
    let second = sample_windows(&tile, &config)?;
    assert_eq!(first.len(), 6);

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.dim(), (4, 4));
        assert_eq!(a, b);
    }
    Ok(())
}

#[test]
fn test_normalized_samples_span_the_unit_interval() -> Result<()> {
    let tile = HgtTile::from_bytes(&ramp_tile_bytes(), Path::new("ramp.hgt"))?;
    let config = SampleConfig {
        sample_size: 4,
        samples_per_tile: 3,
        seed: 99,
    };

    for sample in sample_windows(&tile, &config)? {
        let normalized = normalize_sample(&sample);
        let mut low = f32::INFINITY;
        let mut high = f32::NEG_INFINITY;
        for &value in &normalized {
            low = low.min(value);
            high = high.max(value);
        }
        // Every window of the ramp contains variation, so the per-sample
        // rescale must reach both ends of the interval
        assert!((low - 0.0).abs() < 1e-6);
        assert!((high - 1.0).abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn test_exported_sample_is_a_readable_png() -> Result<()> {
    let tile = HgtTile::from_bytes(&ramp_tile_bytes(), Path::new("ramp.hgt"))?;
    let config = SampleConfig {
        sample_size: 4,
        samples_per_tile: 1,
        seed: 1,
    };
    let samples = sample_windows(&tile, &config)?;
    let Some(sample) = samples.first() else {
        unreachable!("one sample was requested");
    };
    let normalized = normalize_sample(sample);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.png");
    export_heightmap_sample(&normalized, &path)?;

    let written = image::open(&path)?;
    assert_eq!(written.width(), 4);
    assert_eq!(written.height(), 4);
    Ok(())
}
