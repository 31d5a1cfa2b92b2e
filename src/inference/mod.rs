//! Abstractions over the opaque generator network stages
//!
//! The compositor depends only on the [`provider::InferenceProvider`]
//! capability; latent conditioning and the procedural stand-in backends
//! live alongside it.

/// Latent-space transforms applied before Stage-A generation
pub mod latent;
/// Deterministic stand-in backends for untrained runs
pub mod procedural;
/// The batch inference capability implemented by network backends
pub mod provider;

pub use provider::InferenceProvider;
