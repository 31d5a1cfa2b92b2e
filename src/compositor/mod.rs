//! Tiled, overlap-blended composition of two-stage generator outputs
//!
//! This module contains the inference-side core:
//! - Weight mask construction for both blend stages
//! - Identity-keyed caching of intermediate tiles
//! - Rotation bookkeeping for edges shared across the tile graph
//! - Neighborhood blending, refinement, and cropping
//! - Mosaic stitching of many generated tiles

/// Weighted accumulation buffers with epsilon-guarded normalization
pub mod blend;
/// Memoization of Stage-A tiles keyed by tile identity
pub mod cache;
/// The two-stage tile generator and its configuration
pub mod generator;
/// Radially decaying blend weight masks
pub mod mask;
/// Stitching generated tiles into large seamless images
pub mod mosaic;
/// Quarter-turn rotations for tile edge alignment
pub mod rotation;

pub use cache::TileId;
pub use generator::{GeneratorConfig, TileGenerator, TilePlacement};
pub use rotation::Rotation;
