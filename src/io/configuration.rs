//! Pipeline constants and runtime configuration defaults

/// Positions in a tile neighborhood (3x3, row-major, bottom row first)
pub const NEIGHBORHOOD_SIZE: usize = 9;

/// Guard added to weight sums before normalization to prevent division by zero
pub const BLEND_EPSILON: f32 = 1e-8;

/// Blend factor for fully-grown inference (no progressive interpolation)
pub const FULLY_GROWN: f32 = 1.0;

/// Pixels shared between adjacent tiles, blended rather than duplicated
pub const DEFAULT_OVERLAP: usize = 2;

/// Falloff exponent for the intermediate (Stage A) weight mask
pub const DEFAULT_INTERMEDIATE_FALLOFF: f32 = 1.0;

/// Falloff exponent for the final (Stage B) weight mask
pub const DEFAULT_OUTPUT_FALLOFF: f32 = 4.0;

/// Distance moved along the latent reference direction before Stage A
pub const DEFAULT_RECENTER_DISTANCE: f32 = -1.0;

// Offline slicing settings matching the original training data preparation
/// Side length of extracted heightmap training samples
pub const DEFAULT_SAMPLE_SIZE: usize = 512;
/// Number of random samples extracted per elevation file
pub const DEFAULT_SAMPLES_PER_FILE: usize = 32;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default mosaic dimensions in tiles
pub const DEFAULT_MOSAIC_SIZE: usize = 4;

// Demo generator shapes for the procedural backend
/// Default latent vector length
pub const DEFAULT_LATENT_SIZE: usize = 32;
/// Default Stage-A tile resolution
pub const DEFAULT_TILE_RESOLUTION: usize = 16;
/// Default Stage-B output resolution
pub const DEFAULT_OUTPUT_RESOLUTION: usize = 64;
/// Default channel count for demo generation
pub const DEFAULT_CHANNELS: usize = 3;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 50;
