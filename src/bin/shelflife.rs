use anyhow::Result;
use clap::Parser;
use shelflife::cli::{self, Cli};

fn main() -> Result<()> {
    cli::run(Cli::parse())
}
