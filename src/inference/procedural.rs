//! Deterministic stand-in backends for running the pipeline untrained
//!
//! These providers exercise the full compositing path without network
//! weights: Stage A renders a smooth harmonic field from the latent vector,
//! Stage B bilinearly upsamples its input to the refined resolution. Both
//! are pure functions of their inputs, so tile identity caching and seam
//! reuse behave exactly as with a real generator.

use crate::inference::provider::InferenceProvider;
use crate::io::error::{Result, inference_error, invalid_parameter};
use ndarray::{Array1, Array3};
use std::f32::consts::TAU;

/// Stage-A stand-in rendering harmonic fields from latent vectors
#[derive(Debug, Clone)]
pub struct ProceduralStageA {
    resolution: usize,
    channels: usize,
}

impl ProceduralStageA {
    /// Create a Stage-A stand-in producing `resolution` square tiles
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution or channel count is zero
    pub fn new(resolution: usize, channels: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(invalid_parameter(
                "resolution",
                &resolution,
                &"stand-in tile resolution must be positive",
            ));
        }
        if channels == 0 {
            return Err(invalid_parameter(
                "channels",
                &channels,
                &"stand-in channel count must be positive",
            ));
        }
        Ok(Self {
            resolution,
            channels,
        })
    }

    // Low-frequency harmonics weighted by latent components, squashed to
    // the generator's native [-1, 1] range
    fn field(&self, latent: &Array1<f32>) -> Array3<f32> {
        let res = self.resolution;
        let span = (res.max(2) - 1) as f32;
        let scale = (latent.len().max(1) as f32).sqrt();

        Array3::from_shape_fn((res, res, self.channels), |(i, j, c)| {
            let u = i as f32 / span;
            let v = j as f32 / span;
            let mut value = 0.0_f32;
            for (k, &weight) in latent.iter().enumerate() {
                let fx = ((k % 3) + 1) as f32;
                let fy = ((k / 3) % 3 + 1) as f32;
                let phase = (c as f32).mul_add(0.7, k as f32 * 0.35);
                value += weight * (TAU * fx.mul_add(u, fy * v) + phase).cos();
            }
            (value / scale).tanh()
        })
    }
}

impl InferenceProvider for ProceduralStageA {
    type Input = Array1<f32>;

    fn infer(&self, inputs: &[Array1<f32>], _blend_factor: f32) -> Result<Vec<Array3<f32>>> {
        inputs
            .iter()
            .map(|latent| {
                if latent.is_empty() {
                    Err(inference_error("stage a", &"latent vector is empty"))
                } else {
                    Ok(self.field(latent))
                }
            })
            .collect()
    }
}

/// Stage-B stand-in upsampling its input bilinearly
#[derive(Debug, Clone)]
pub struct UpsamplingStageB {
    scale: usize,
}

impl UpsamplingStageB {
    /// Create a Stage-B stand-in magnifying by an integer factor
    ///
    /// # Errors
    ///
    /// Returns an error if the scale factor is zero
    pub fn new(scale: usize) -> Result<Self> {
        if scale == 0 {
            return Err(invalid_parameter(
                "scale",
                &scale,
                &"upsampling factor must be positive",
            ));
        }
        Ok(Self { scale })
    }

    fn upsample(&self, input: &Array3<f32>) -> Array3<f32> {
        let (rows, cols, channels) = input.dim();
        let out_rows = rows * self.scale;
        let out_cols = cols * self.scale;

        Array3::from_shape_fn((out_rows, out_cols, channels), |(i, j, c)| {
            let src_row = map_coordinate(i, out_rows, rows);
            let src_col = map_coordinate(j, out_cols, cols);
            let r0 = src_row.floor() as usize;
            let c0 = src_col.floor() as usize;
            let r1 = (r0 + 1).min(rows - 1);
            let c1 = (c0 + 1).min(cols - 1);
            let fr = src_row - r0 as f32;
            let fc = src_col - c0 as f32;

            let sample = |r: usize, col: usize| -> f32 {
                input.get([r, col, c]).copied().unwrap_or_default()
            };
            let top = sample(r0, c0).mul_add(1.0 - fc, sample(r0, c1) * fc);
            let bottom = sample(r1, c0).mul_add(1.0 - fc, sample(r1, c1) * fc);
            top.mul_add(1.0 - fr, bottom * fr)
        })
    }
}

// Align-corners source coordinate for an output index
fn map_coordinate(index: usize, out_extent: usize, in_extent: usize) -> f32 {
    if out_extent <= 1 || in_extent <= 1 {
        0.0
    } else {
        index as f32 * (in_extent - 1) as f32 / (out_extent - 1) as f32
    }
}

impl InferenceProvider for UpsamplingStageB {
    type Input = Array3<f32>;

    fn infer(&self, inputs: &[Array3<f32>], _blend_factor: f32) -> Result<Vec<Array3<f32>>> {
        inputs
            .iter()
            .map(|input| {
                let (rows, cols, channels) = input.dim();
                if rows == 0 || cols == 0 || channels == 0 {
                    Err(inference_error(
                        "stage b",
                        &format!("degenerate input tensor of shape {:?}", input.dim()),
                    ))
                } else {
                    Ok(self.upsample(input))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ProceduralStageA, UpsamplingStageB};
    use crate::inference::latent::random_latents;
    use crate::inference::provider::InferenceProvider;
    use crate::io::configuration::FULLY_GROWN;
    use crate::io::error::Result;
    use ndarray::Array3;

    #[test]
    fn test_stage_a_is_deterministic_and_bounded() -> Result<()> {
        let stage = ProceduralStageA::new(8, 3)?;
        let latents = random_latents(16, 2, 7);
        let first = stage.infer(&latents, FULLY_GROWN)?;
        let second = stage.infer(&latents, FULLY_GROWN)?;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        for tile in &first {
            assert_eq!(tile.dim(), (8, 8, 3));
            assert!(tile.iter().all(|v| (-1.0..=1.0).contains(v)));
        }
        Ok(())
    }

    #[test]
    fn test_stage_b_preserves_constant_fields() -> Result<()> {
        let stage = UpsamplingStageB::new(4)?;
        let input = Array3::from_elem((4, 4, 2), 0.25);
        let outputs = stage.infer(std::slice::from_ref(&input), FULLY_GROWN)?;
        let output = outputs.first().ok_or_else(|| {
            crate::io::error::computation_error("test", &"missing output")
        })?;
        assert_eq!(output.dim(), (16, 16, 2));
        assert!(output.iter().all(|v| (v - 0.25).abs() < 1e-6));
        Ok(())
    }

    #[test]
    fn test_stage_b_interpolates_between_corners() -> Result<()> {
        let stage = UpsamplingStageB::new(2)?;
        let mut input = Array3::zeros((2, 2, 1));
        if let Some(cell) = input.get_mut([1, 1, 0]) {
            *cell = 1.0;
        }
        let outputs = stage.infer(std::slice::from_ref(&input), FULLY_GROWN)?;
        let output = outputs.first().ok_or_else(|| {
            crate::io::error::computation_error("test", &"missing output")
        })?;
        // Interior samples must fall strictly between the corner values
        let interior = output.get([2, 2, 0]).copied().unwrap_or_default();
        assert!(interior > 0.0 && interior < 1.0);
        Ok(())
    }

    #[test]
    fn test_invalid_configurations_are_rejected() {
        assert!(ProceduralStageA::new(0, 1).is_err());
        assert!(ProceduralStageA::new(4, 0).is_err());
        assert!(UpsamplingStageB::new(0).is_err());
    }
}
