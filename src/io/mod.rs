//! Input/output operations, configuration, and error handling

/// Command-line interface and batch orchestration
pub mod cli;
/// Pipeline constants and runtime configuration defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Grayscale PNG export
pub mod image;
/// Batch progress display
pub mod progress;
