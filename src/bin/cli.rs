// src/bin/cli.rs
use clap::Parser;
use kama_sona_scrape::cli::{self, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    kama_sona_scrape::log::init(args.verbose);
    cli::run(&args)?;
    Ok(())
}
