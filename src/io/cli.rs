//! Command-line interface for batch world generation

use std::path::PathBuf;

use clap::Parser;

use crate::generation::executor::{GenerationConfig, WorldGenerator};
use crate::generation::selection::TypeWeightMultipliers;
use crate::io::configuration::{
    DEFAULT_BRANCH_MAX_DEPTH, DEFAULT_BRANCH_PROBABILITY, DEFAULT_DEAD_END_PROBABILITY,
    DEFAULT_MAX_PATH_LENGTH, DEFAULT_MIN_PATH_LENGTH, DEFAULT_SEED, DEFAULT_SUB_BRANCH_PROBABILITY,
    OUTPUT_SUFFIX,
};
use crate::io::definitions::load_library;
use crate::io::error::Result;
use crate::io::image::export_world_as_png;
use crate::io::progress::ProgressManager;

/// Command-line arguments for the world generation tool
#[derive(Parser)]
#[command(name = "loopworld")]
#[command(
    author,
    version,
    about = "Generate closed-loop tile worlds from a snippet library"
)]
pub struct Cli {
    /// Snippet definition JSON file; images are loaded from its directory
    #[arg(value_name = "DEFINITIONS")]
    pub definitions: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of worlds to generate, using consecutive seeds
    #[arg(short, long, default_value_t = 1)]
    pub count: usize,

    /// Output directory for exported map images
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Minimum main-path circuit length in cells
    #[arg(long, default_value_t = DEFAULT_MIN_PATH_LENGTH)]
    pub min_path: usize,

    /// Maximum main-path circuit length in cells
    #[arg(long, default_value_t = DEFAULT_MAX_PATH_LENGTH)]
    pub max_path: usize,

    /// Probability of seeding a branch at each free main-path neighbor
    #[arg(long, default_value_t = DEFAULT_BRANCH_PROBABILITY)]
    pub branch_probability: f64,

    /// Maximum branch depth
    #[arg(long, default_value_t = DEFAULT_BRANCH_MAX_DEPTH)]
    pub branch_depth: u32,

    /// Probability that a branch cell terminates in a dead-end
    #[arg(long, default_value_t = DEFAULT_DEAD_END_PROBABILITY)]
    pub dead_end_probability: f64,

    /// Probability that an extra branch connector spawns a sub-branch
    #[arg(long, default_value_t = DEFAULT_SUB_BRANCH_PROBABILITY)]
    pub sub_branch_probability: f64,

    /// Weight multiplier for dead-end snippets
    #[arg(long, default_value_t = 1.0)]
    pub dead_end_weight: f64,

    /// Weight multiplier for two-connector path snippets
    #[arg(long, default_value_t = 1.0)]
    pub path_weight: f64,

    /// Weight multiplier for junction snippets
    #[arg(long, default_value_t = 1.0)]
    pub junction_weight: f64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Generation configuration for the world at `index` within the batch
    pub const fn config_for(&self, index: usize) -> GenerationConfig {
        GenerationConfig {
            seed: self.seed.wrapping_add(index as u64),
            min_path_length: self.min_path,
            max_path_length: self.max_path,
            branch_probability: self.branch_probability,
            branch_max_depth: self.branch_depth,
            dead_end_probability: self.dead_end_probability,
            sub_branch_probability: self.sub_branch_probability,
            type_weight_multipliers: TypeWeightMultipliers {
                dead_end: self.dead_end_weight,
                path: self.path_weight,
                junction: self.junction_weight,
            },
        }
    }
}

/// Orchestrates batch world generation with progress tracking
pub struct WorldProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl WorldProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli
            .should_show_progress()
            .then(|| ProgressManager::new(cli.count));
        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate and export every world in the batch
    ///
    /// Worlds use consecutive seeds starting at the configured seed, so a
    /// batch of one with seed N and world N of a larger batch are identical.
    ///
    /// # Errors
    ///
    /// Returns an error if the library cannot be loaded, a configuration is
    /// invalid, a world cannot be generated, or an export fails.
    pub fn process(&self) -> Result<()> {
        let (registry, masks) = load_library(&self.cli.definitions)?;
        log::info!(
            "loaded {} snippets at {}px from {}",
            registry.len(),
            registry.tile_size(),
            self.cli.definitions.display()
        );

        for index in 0..self.cli.count {
            let config = self.cli.config_for(index);
            if let Some(ref pm) = self.progress_manager {
                pm.start_world(config.seed);
            }

            let generator = WorldGenerator::new(&registry, config)?;
            let generated = generator.generate()?;
            let output_path = self.output_path(config.seed);
            export_world_as_png(&generated.map, &registry, &masks, &output_path)?;

            if !generated.report.warnings.is_empty() {
                log::warn!(
                    "seed {}: finished with {} repair warnings",
                    config.seed,
                    generated.report.warnings.len()
                );
            }
            if let Some(ref pm) = self.progress_manager {
                pm.complete_world();
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }
        Ok(())
    }

    fn output_path(&self, seed: u64) -> PathBuf {
        let stem = self
            .cli
            .definitions
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        self.cli
            .output
            .join(format!("{stem}_{seed}{OUTPUT_SUFFIX}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn test_batch_configs_use_consecutive_seeds() {
        let cli = Cli::parse_from(["loopworld", "snippets.json", "--seed", "7", "--count", "3"]);
        assert_eq!(cli.config_for(0).seed, 7);
        assert_eq!(cli.config_for(2).seed, 9);
    }

    #[test]
    fn test_defaults_form_a_valid_config() {
        let cli = Cli::parse_from(["loopworld", "snippets.json"]);
        assert!(cli.config_for(0).validate().is_ok());
    }
}
