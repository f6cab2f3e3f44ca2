//! Kestrel CLI library

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// Kestrel - infrastructure platform assets for cluster provisioning
#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage infrastructure platform assets
    Asset(commands::asset::AssetArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Asset(args) => commands::asset::run(args).await,
        }
    }
}
