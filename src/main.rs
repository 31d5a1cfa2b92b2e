//! CLI entry point for the terrain tile synthesis toolkit

use clap::Parser;
use terratile::io::cli::{Cli, CommandRunner};

fn main() -> terratile::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    CommandRunner::new(cli).run()
}
