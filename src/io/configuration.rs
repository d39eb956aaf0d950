//! Generation constants and tunable defaults

/// Default RNG seed when none is supplied
pub const DEFAULT_SEED: u64 = 42;

/// Default minimum main-path circuit length, in cells
pub const DEFAULT_MIN_PATH_LENGTH: usize = 4;

/// Default maximum main-path circuit length, in cells
///
/// The spiral planner saturates at an eight-cell circuit, so larger maxima
/// only waste draw range.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 8;

/// Default probability of seeding a branch at a free main-path neighbor
pub const DEFAULT_BRANCH_PROBABILITY: f64 = 0.4;

/// Default maximum branch depth, counted from the main path
pub const DEFAULT_BRANCH_MAX_DEPTH: u32 = 3;

/// Default probability that a branch cell terminates in a dead-end
pub const DEFAULT_DEAD_END_PROBABILITY: f64 = 0.3;

/// Default probability that an extra connector spawns a sub-branch
pub const DEFAULT_SUB_BRANCH_PROBABILITY: f64 = 0.25;

/// Empty-cell padding added around the generated region
pub const BORDER_MARGIN: i32 = 2;

/// Sweep cap for connector reconciliation
///
/// Each sweep strictly reduces open mismatches or terminates, so the cap is
/// a termination guarantee rather than an expected limit.
pub const MAX_RECONCILE_SWEEPS: usize = 8;

/// Sweep cap for empty-tile clustering
///
/// Conversions only shrink the set of non-empty cells, so sweeps converge
/// quickly; the cap bounds the pathological case.
pub const MAX_CLUSTER_SWEEPS: usize = 4;

/// Default chunk edge length, in cells
pub const DEFAULT_CHUNK_SIZE: u32 = 8;

/// Default Chebyshev radius of loaded chunks around the viewer
pub const DEFAULT_LOAD_RADIUS: u32 = 2;

/// Suffix appended to exported map image filenames
pub const OUTPUT_SUFFIX: &str = "_map";
