//! Slicing elevation tiles into training samples
//!
//! Draws seeded random square windows from a decoded elevation grid and
//! rotates each by a random quarter turn, matching the augmentation the
//! training data preparation applied. Samples are normalized per window
//! before export so every image spans the full grayscale range.

use crate::compositor::rotation::Rotation;
use crate::heightmap::hgt::HgtTile;
use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array2, s};
use num_traits::ToPrimitive;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Parameters for window extraction
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Side length of extracted windows
    pub sample_size: usize,
    /// Number of windows drawn per tile
    pub samples_per_tile: usize,
    /// Seed for window positions and rotations
    pub seed: u64,
}

/// Extract random rotated windows from an elevation tile
///
/// # Errors
///
/// Returns an error if the window size is zero or exceeds the tile's
/// resolution
pub fn sample_windows(tile: &HgtTile, config: &SampleConfig) -> Result<Vec<Array2<i16>>> {
    let resolution = tile.resolution();
    if config.sample_size == 0 {
        return Err(invalid_parameter(
            "sample_size",
            &config.sample_size,
            &"sample windows must have positive size",
        ));
    }
    if config.sample_size > resolution {
        return Err(invalid_parameter(
            "sample_size",
            &config.sample_size,
            &format!("sample windows cannot exceed the tile resolution ({resolution})"),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let span = resolution - config.sample_size;
    let mut windows = Vec::with_capacity(config.samples_per_tile);

    for _ in 0..config.samples_per_tile {
        let row = if span == 0 { 0 } else { rng.random_range(0..span) };
        let col = if span == 0 { 0 } else { rng.random_range(0..span) };
        let window = tile
            .elevations()
            .slice(s![
                row..row + config.sample_size,
                col..col + config.sample_size
            ])
            .to_owned();

        let turns = rng.random_range(0..4_usize);
        let rotation = Rotation::ALL.get(turns).copied().unwrap_or_default();
        windows.push(rotation.apply(&window));
    }
    Ok(windows)
}

/// Normalize a sample to `[0, 1]` by its own elevation range
///
/// Flat windows (a single elevation everywhere) normalize to zero.
pub fn normalize_sample<T>(sample: &Array2<T>) -> Array2<f32>
where
    T: Copy + PartialOrd + ToPrimitive,
{
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for value in sample.iter() {
        let v = value.to_f32().unwrap_or_default();
        min = min.min(v);
        max = max.max(v);
    }

    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return Array2::zeros(sample.dim());
    }
    sample.mapv(|v| (v.to_f32().unwrap_or_default() - min) / range)
}
