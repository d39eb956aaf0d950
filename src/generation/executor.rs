//! Generation orchestration
//!
//! [`WorldGenerator`] owns nothing but a registry reference and a validated
//! configuration; the RNG is re-seeded from the configured seed at the start
//! of every run, so two calls to [`WorldGenerator::generate`] with equal
//! inputs produce bit-identical worlds.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::generation::branch::generate_branches;
use crate::generation::main_path::generate_main_path;
use crate::generation::repair::{RepairReport, run_repair_passes};
use crate::generation::selection::TypeWeightMultipliers;
use crate::io::configuration::{
    DEFAULT_BRANCH_MAX_DEPTH, DEFAULT_BRANCH_PROBABILITY, DEFAULT_DEAD_END_PROBABILITY,
    DEFAULT_MAX_PATH_LENGTH, DEFAULT_MIN_PATH_LENGTH, DEFAULT_SEED, DEFAULT_SUB_BRANCH_PROBABILITY,
};
use crate::io::error::{Result, invalid_parameter};
use crate::registry::SnippetRegistry;
use crate::spatial::WorldMap;

/// Tunable parameters for one generation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// RNG seed; equal seeds with equal configs yield equal worlds
    pub seed: u64,
    /// Minimum main-path circuit length, in cells
    pub min_path_length: usize,
    /// Maximum main-path circuit length, in cells
    pub max_path_length: usize,
    /// Probability of seeding a branch at each free main-path neighbor
    pub branch_probability: f64,
    /// Maximum branch depth, counted from the main path
    pub branch_max_depth: u32,
    /// Probability that a branch cell terminates in a dead-end
    pub dead_end_probability: f64,
    /// Probability that an extra branch connector spawns a sub-branch
    pub sub_branch_probability: f64,
    /// Per-kind weight scaling applied to every snippet draw
    pub type_weight_multipliers: TypeWeightMultipliers,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            min_path_length: DEFAULT_MIN_PATH_LENGTH,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            branch_probability: DEFAULT_BRANCH_PROBABILITY,
            branch_max_depth: DEFAULT_BRANCH_MAX_DEPTH,
            dead_end_probability: DEFAULT_DEAD_END_PROBABILITY,
            sub_branch_probability: DEFAULT_SUB_BRANCH_PROBABILITY,
            type_weight_multipliers: TypeWeightMultipliers::default(),
        }
    }
}

impl GenerationConfig {
    /// Validate parameter ranges before a run
    ///
    /// # Errors
    ///
    /// Returns an error when a probability falls outside `[0, 1]`, a length
    /// bound is inconsistent, or a multiplier is negative.
    pub fn validate(&self) -> Result<()> {
        if self.min_path_length < 4 {
            return Err(invalid_parameter(
                "min_path_length",
                &self.min_path_length,
                &"a closed circuit needs at least 4 cells",
            ));
        }
        if self.max_path_length < self.min_path_length {
            return Err(invalid_parameter(
                "max_path_length",
                &self.max_path_length,
                &format!("must be at least min_path_length ({})", self.min_path_length),
            ));
        }
        for (name, value) in [
            ("branch_probability", self.branch_probability),
            ("dead_end_probability", self.dead_end_probability),
            ("sub_branch_probability", self.sub_branch_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid_parameter(name, &value, &"must be in [0, 1]"));
            }
        }
        for (name, value) in [
            ("dead_end_multiplier", self.type_weight_multipliers.dead_end),
            ("path_multiplier", self.type_weight_multipliers.path),
            ("junction_multiplier", self.type_weight_multipliers.junction),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    name,
                    &value,
                    &"must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// A finished world plus the repair diagnostics produced while building it
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    /// The repaired cell grid
    pub map: WorldMap,
    /// Counters and warnings from the repair passes
    pub report: RepairReport,
}

/// Drives a full generation run: main path, branches, then repair
#[derive(Debug)]
pub struct WorldGenerator<'a> {
    registry: &'a SnippetRegistry,
    config: GenerationConfig,
}

impl<'a> WorldGenerator<'a> {
    /// Create a generator over a loaded registry
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(registry: &'a SnippetRegistry, config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The validated configuration this generator runs with
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run one complete generation pass
    ///
    /// # Errors
    ///
    /// Returns an error when the main path cannot be closed or a branch
    /// placement finds no candidate snippet. Repair shortfalls are reported
    /// as warnings, not errors.
    pub fn generate(&self) -> Result<GeneratedWorld> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut map = WorldMap::new();

        generate_main_path(
            &mut map,
            self.registry,
            self.config.min_path_length,
            self.config.max_path_length,
            &self.config.type_weight_multipliers,
            &mut rng,
        )?;
        log::debug!(
            "seed {}: main path placed with {} cells",
            self.config.seed,
            map.main_path().len()
        );

        generate_branches(&mut map, self.registry, &self.config, &mut rng)?;
        log::debug!(
            "seed {}: {} branch cells grown",
            self.config.seed,
            map.branch_cells().len()
        );

        let report = run_repair_passes(&mut map, self.registry);
        Ok(GeneratedWorld { map, report })
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationConfig;

    #[test]
    fn test_default_config_validates() {
        assert!(GenerationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_probability_is_rejected() {
        let config = GenerationConfig {
            branch_probability: 1.5,
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_length_bounds_are_rejected() {
        let config = GenerationConfig {
            min_path_length: 8,
            max_path_length: 4,
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_multiplier_is_rejected() {
        let mut config = GenerationConfig::default();
        config.type_weight_multipliers.junction = -1.0;
        assert!(config.validate().is_err());
    }
}
