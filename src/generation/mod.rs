//! World generation: main path, branches, and invariant repair

/// Worklist-driven branch growth
pub mod branch;
/// Run orchestration and configuration
pub mod executor;
/// Closed-loop main path planning and placement
pub mod main_path;
/// Ordered post-generation repair passes
pub mod repair;
/// Weighted snippet selection
pub mod selection;

pub use executor::{GeneratedWorld, GenerationConfig, WorldGenerator};
pub use repair::{RepairReport, RepairWarning};
pub use selection::TypeWeightMultipliers;
