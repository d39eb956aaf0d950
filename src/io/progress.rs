//! Batch progress display for multi-world generation runs

use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Worlds: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar over the worlds of one batch run
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a bar sized to the number of worlds to generate
    pub fn new(world_count: usize) -> Self {
        let bar = ProgressBar::new(world_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        Self { bar }
    }

    /// Show which seed is currently generating
    pub fn start_world(&self, seed: u64) {
        self.bar.set_message(format!("seed {seed}"));
    }

    /// Mark one world as finished
    pub fn complete_world(&self) {
        self.bar.inc(1);
    }

    /// Clean up the display
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
