//! CLI entry point for the tile mosaic generator

use clap::Parser;
use tilemosaic::io::cli::{Cli, FileProcessor, init_logging};

fn main() -> tilemosaic::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_filter());
    let mut processor = FileProcessor::new(cli);
    processor.process()?;
    Ok(())
}
