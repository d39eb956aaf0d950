//! Closed-loop tile world generation from connector-matched snippets
//!
//! The generator places square tile snippets on a sparse integer grid: a
//! closed main-path circuit first, probabilistic branches off it second, and
//! a fixed sequence of repair passes last, so every connector in the final
//! world faces a matching one. Identical seed, configuration, and snippet
//! library always reproduce the same world.

#![forbid(unsafe_code)]

/// Main path, branch growth, repair passes, and run orchestration
pub mod generation;
/// Input/output operations and error handling
pub mod io;
/// Snippet library loading, validation, and wall geometry
pub mod registry;
/// Grid coordinates, cells, the sparse world map, and chunk streaming
pub mod spatial;

pub use io::error::{GenerationError, Result};
