//! CLI entry point for the closed-loop tile world generator

use clap::Parser;
use loopworld::io::cli::{Cli, WorldProcessor};

fn main() -> loopworld::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let processor = WorldProcessor::new(cli);
    processor.process()
}
