//! Weighted accumulation buffers for overlap compositing
//!
//! A blend buffer pairs a value accumulator with a parallel weight-sum
//! array. Tiles are added as `tile * mask` while the mask alone accumulates
//! into the weight sums; overlapping placements add into shared cells.
//! Normalization divides the two, with an epsilon guard so cells no tile
//! reached normalize to zero instead of dividing by zero.

use crate::io::configuration::BLEND_EPSILON;
use crate::io::error::{Result, computation_error};
use ndarray::{Array3, ArrayView3, s};

/// Accumulator and weight-sum pair for one compositing stage
#[derive(Debug, Clone)]
pub struct BlendBuffer {
    values: Array3<f32>,
    weights: Array3<f32>,
}

impl BlendBuffer {
    /// Create a zeroed buffer of `size x size` cells with `channels` channels
    pub fn new(size: usize, channels: usize) -> Self {
        Self {
            values: Array3::zeros((size, size, channels)),
            weights: Array3::zeros((size, size, 1)),
        }
    }

    /// Side length of the buffer in cells
    pub fn size(&self) -> usize {
        self.values.dim().0
    }

    /// Accumulate a weighted tile at the given row/column offset
    ///
    /// The mask must be shaped `(rows, cols, 1)` to broadcast across the
    /// tile's channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement extends past the buffer bounds or
    /// the mask footprint disagrees with the tile
    pub fn accumulate(
        &mut self,
        row: usize,
        col: usize,
        tile: ArrayView3<'_, f32>,
        mask: &Array3<f32>,
    ) -> Result<()> {
        let (rows, cols, channels) = tile.dim();
        let (size_r, size_c, buffer_channels) = self.values.dim();
        if row + rows > size_r || col + cols > size_c {
            return Err(computation_error(
                "blend accumulation",
                &format!(
                    "placement at ({row}, {col}) of a {rows}x{cols} tile \
                     exceeds the {size_r}x{size_c} buffer"
                ),
            ));
        }
        if channels != buffer_channels {
            return Err(computation_error(
                "blend accumulation",
                &format!("tile has {channels} channels, buffer expects {buffer_channels}"),
            ));
        }
        if mask.dim() != (rows, cols, 1) {
            return Err(computation_error(
                "blend accumulation",
                &format!("mask footprint {:?} does not cover a {rows}x{cols} tile", mask.dim()),
            ));
        }

        let mut value_region = self.values.slice_mut(s![row..row + rows, col..col + cols, ..]);
        value_region += &(&tile * mask);
        let mut weight_region = self
            .weights
            .slice_mut(s![row..row + rows, col..col + cols, ..]);
        weight_region += mask;
        Ok(())
    }

    /// Accumulated weight sums (one value per cell)
    pub const fn weights(&self) -> &Array3<f32> {
        &self.weights
    }

    /// Normalize accumulated values by their weight sums
    ///
    /// Cells that received no contribution normalize to zero via the
    /// epsilon guard rather than dividing by zero.
    pub fn normalized(&self) -> Array3<f32> {
        &self.values / &(&self.weights + BLEND_EPSILON)
    }
}
