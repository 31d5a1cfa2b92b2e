//! Offline preparation of elevation data for training
//!
//! Decodes raw HGT elevation grids and slices them into rotated,
//! normalized training samples.

/// Raw HGT elevation file decoding
pub mod hgt;
/// Random window extraction and normalization
pub mod sampler;
