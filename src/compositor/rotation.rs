//! Quarter-turn rotations for aligning tile edges before blending
//!
//! Tiles shared between independently generated neighborhoods may enter a
//! neighborhood in a different orientation than they were generated in.
//! Rotating by 90-degree multiples before compositing (and by the inverse
//! before refinement) keeps shared edges aligned across the tile graph.

use crate::io::error::{Result, invalid_parameter};
use ndarray::{Array, Axis, Dimension};

/// Rotation applied to a tile before compositing, in 90-degree multiples
///
/// Rotations act counterclockwise on the leading two axes of an array,
/// matching the row/column plane of `(height, width, channels)` tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    None,
    /// 90 degrees counterclockwise
    Quarter,
    /// 180 degrees
    Half,
    /// 270 degrees counterclockwise
    ThreeQuarter,
}

impl Rotation {
    /// All rotations in increasing quarter-turn order
    pub const ALL: [Self; 4] = [Self::None, Self::Quarter, Self::Half, Self::ThreeQuarter];

    /// Construct a rotation from a raw quarter-turn count
    ///
    /// # Errors
    ///
    /// Returns an error if `turns` is outside `0..=3`
    pub fn from_quarter_turns(turns: u32) -> Result<Self> {
        match turns {
            0 => Ok(Self::None),
            1 => Ok(Self::Quarter),
            2 => Ok(Self::Half),
            3 => Ok(Self::ThreeQuarter),
            _ => Err(invalid_parameter(
                "rotation",
                &turns,
                &"rotations are limited to quarter-turn multiples 0..=3",
            )),
        }
    }

    /// Number of counterclockwise quarter turns this rotation performs
    pub const fn quarter_turns(self) -> usize {
        match self {
            Self::None => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarter => 3,
        }
    }

    /// The rotation that undoes this one
    pub const fn inverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Quarter => Self::ThreeQuarter,
            Self::Half => Self::Half,
            Self::ThreeQuarter => Self::Quarter,
        }
    }

    /// Rotate the leading two axes of an array by this rotation
    ///
    /// Works for both `(rows, cols)` heightmap windows and
    /// `(rows, cols, channels)` image tensors; trailing axes are untouched.
    pub fn apply<T, D>(self, input: &Array<T, D>) -> Array<T, D>
    where
        T: Clone,
        D: Dimension,
    {
        let mut view = input.view();
        for _ in 0..self.quarter_turns() {
            view.swap_axes(0, 1);
            view.invert_axis(Axis(0));
        }
        view.to_owned()
    }
}
