//! 命令行界面定义
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "turn-server")]
#[command(version)]
#[command(about = "TURN relay server with an HTTP API for issuing per-user session credentials")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Configuration file path (defaults to searching standard locations)
    #[arg(short, long, default_value = "config.toml")]
    pub(crate) config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Validate a configuration file and exit
    Test {
        /// Configuration file path (optional, defaults to --config)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,
    },
}
