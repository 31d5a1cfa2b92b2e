//! Opaque inference capability implemented by network backends
//!
//! The compositor never talks to a concrete network. Any backend that can
//! map a batch of inputs plus a blend factor to a batch of image tensors
//! can drive it: a trained generator behind FFI, a remote inference server,
//! or the deterministic procedural stand-ins shipped with this crate.

use crate::io::error::Result;
use ndarray::Array3;

/// A batch inference call into one generator stage
///
/// Stage A instantiates `Input` as latent vectors, Stage B as image tensors.
/// Outputs are `(height, width, channels)` tensors in the backend's native
/// value range. The blend factor is the progressive-growing interpolation
/// weight between resolution stages; fully trained networks are invoked
/// with [`crate::io::configuration::FULLY_GROWN`].
pub trait InferenceProvider {
    /// Per-sample input type for this stage
    type Input;

    /// Run the stage on a batch of inputs
    ///
    /// Implementations must return exactly one output per input, all with
    /// identical dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unavailable or rejects the
    /// batch; the compositor propagates such failures without retrying
    fn infer(&self, inputs: &[Self::Input], blend_factor: f32) -> Result<Vec<Array3<f32>>>;
}
