//! Command-line interface for heightmap slicing and demo mosaic generation

use crate::compositor::generator::{GeneratorConfig, TileGenerator};
use crate::compositor::mosaic::{MosaicConfig, stitch};
use crate::heightmap::hgt::decode_hgt;
use crate::heightmap::sampler::{SampleConfig, normalize_sample, sample_windows};
use crate::inference::latent::LatentSpace;
use crate::inference::procedural::{ProceduralStageA, UpsamplingStageB};
use crate::io::configuration::{
    DEFAULT_CHANNELS, DEFAULT_LATENT_SIZE, DEFAULT_MOSAIC_SIZE, DEFAULT_OUTPUT_RESOLUTION,
    DEFAULT_OVERLAP, DEFAULT_SAMPLE_SIZE, DEFAULT_SAMPLES_PER_FILE, DEFAULT_SEED,
    DEFAULT_TILE_RESOLUTION,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{export_heightmap_sample, export_tile_channel};
use crate::io::progress::ProgressManager;
use clap::{Args, Parser, Subcommand};
use ndarray::Array1;
use std::path::{Path, PathBuf};

/// Command-line arguments for the terrain synthesis toolkit
#[derive(Parser)]
#[command(name = "terratile")]
#[command(
    author,
    version,
    about = "Slice elevation data and stitch GAN-generated terrain tiles"
)]
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Toolkit operations
#[derive(Subcommand)]
pub enum Command {
    /// Slice raw .hgt elevation files into training sample images
    Slice(SliceArgs),
    /// Stitch a demo mosaic using the procedural backend
    Mosaic(MosaicArgs),
}

/// Arguments for the `slice` subcommand
#[derive(Args)]
pub struct SliceArgs {
    /// Input .hgt file or directory searched recursively
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory receiving the sample images
    #[arg(short, long, default_value = "samples")]
    pub output: PathBuf,

    /// Side length of extracted samples in pixels
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Number of random samples extracted per file
    #[arg(long, default_value_t = DEFAULT_SAMPLES_PER_FILE)]
    pub samples_per_file: usize,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Arguments for the `mosaic` subcommand
#[derive(Args)]
pub struct MosaicArgs {
    /// Output image path
    #[arg(short, long, default_value = "mosaic.png")]
    pub output: PathBuf,

    /// Mosaic width in tiles
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SIZE)]
    pub columns: usize,

    /// Mosaic height in tiles
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SIZE)]
    pub rows: usize,

    /// Latent vector length
    #[arg(long, default_value_t = DEFAULT_LATENT_SIZE)]
    pub latent_size: usize,

    /// Stage-A tile resolution
    #[arg(long, default_value_t = DEFAULT_TILE_RESOLUTION)]
    pub tile_resolution: usize,

    /// Stage-B output resolution
    #[arg(long, default_value_t = DEFAULT_OUTPUT_RESOLUTION)]
    pub output_resolution: usize,

    /// Pixels blended between adjacent tiles
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Executes the selected toolkit operation
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the parsed arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected subcommand
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, decoding, generation, or
    /// export fails
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Command::Slice(args) => self.run_slice(args),
            Command::Mosaic(args) => self.run_mosaic(args),
        }
    }

    fn run_slice(&self, args: &SliceArgs) -> Result<()> {
        let files = collect_hgt_files(&args.target)?;
        if files.is_empty() {
            log::warn!("no .hgt files found under '{}'", args.target.display());
            return Ok(());
        }

        let progress = (!self.cli.quiet).then(|| ProgressManager::new(files.len()));
        let config = SampleConfig {
            sample_size: args.sample_size,
            samples_per_tile: args.samples_per_file,
            seed: args.seed,
        };

        for file in &files {
            if let Some(pm) = &progress {
                pm.start_file(file);
            }

            let tile = decode_hgt(file)?;
            let windows = sample_windows(&tile, &config)?;
            let stem = file
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            for (index, window) in windows.iter().enumerate() {
                let normalized = normalize_sample(window);
                let path = args.output.join(format!("{stem}_{index}.png"));
                export_heightmap_sample(&normalized, &path)?;
            }
            log::info!(
                "sliced {} samples from '{}' ({}x{})",
                windows.len(),
                file.display(),
                tile.resolution(),
                tile.resolution(),
            );

            if let Some(pm) = &progress {
                pm.complete_file();
            }
        }

        if let Some(pm) = &progress {
            pm.finish();
        }
        Ok(())
    }

    fn run_mosaic(&self, args: &MosaicArgs) -> Result<()> {
        let config = GeneratorConfig {
            overlap: args.overlap,
            ..GeneratorConfig::new(
                args.latent_size,
                args.tile_resolution,
                args.output_resolution,
                DEFAULT_CHANNELS,
            )
        };

        let stage_a = ProceduralStageA::new(args.tile_resolution, DEFAULT_CHANNELS)?;
        let stage_b = UpsamplingStageB::new(config.scale())?;
        let latent_space = LatentSpace::new(Array1::from_elem(args.latent_size, 1.0))?;
        let mut generator = TileGenerator::new(config, stage_a, stage_b, latent_space)?;

        let mosaic = stitch(
            &mut generator,
            &MosaicConfig {
                columns: args.columns,
                rows: args.rows,
                seed: args.seed,
            },
        )?;

        let channel = usize::from(DEFAULT_CHANNELS > 1);
        export_tile_channel(&mosaic, channel, &args.output)?;
        log::info!("wrote mosaic to '{}'", args.output.display());
        Ok(())
    }
}

// Recursive .hgt discovery matching the original preparation script
fn collect_hgt_files(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return if has_hgt_extension(target) {
            Ok(vec![target.to_path_buf()])
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"target file must have an .hgt extension",
            ))
        };
    }
    if !target.is_dir() {
        return Err(invalid_parameter(
            "target",
            &target.display(),
            &"target must be an .hgt file or a directory",
        ));
    }

    let mut files = Vec::new();
    let mut pending = vec![target.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if has_hgt_extension(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn has_hgt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hgt"))
}
