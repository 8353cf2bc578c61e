//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface of the satellite data service.
#[derive(Parser)]
#[command(name = "sds")]
#[command(about = "Map locations to Sentinel-2 grid cells and fetch Copernicus products")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
