pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fragments")]
#[command(about = "Store, list and convert fragments over HTTP")]
pub struct Args {
    /// Path to the fragments config directory (defaults to ~/.fragments)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
