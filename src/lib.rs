//! Seam-free tiled inference for progressively-grown terrain GANs
//!
//! The crate composes independently generated GAN tile outputs into
//! spatially coherent terrain: intermediate tiles are cached by identity,
//! rotated into alignment, blended with radial weight masks, refined at
//! full resolution, and cropped so adjacent outputs meet without seams.
//! Offline utilities slice raw HGT elevation data into training samples.

/// Tile compositing: masks, caching, rotation, blending, and stitching
pub mod compositor;
/// Offline elevation data preparation
pub mod heightmap;
/// Inference provider abstractions and stand-in backends
pub mod inference;
/// Input/output operations and error handling
pub mod io;

pub use io::error::{PipelineError, Result};
