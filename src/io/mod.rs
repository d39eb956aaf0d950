//! Input/output operations, configuration, and error handling

/// Command-line interface and batch processing
pub mod cli;
/// Generation constants and tunable defaults
pub mod configuration;
/// Snippet definition parsing and image decoding
pub mod definitions;
/// Error types for loading, generation, and export
pub mod error;
/// PNG export of generated worlds
pub mod image;
/// Batch progress display
pub mod progress;
