//! Kestrel CLI
//!
//! Manages infrastructure platform assets from the shell.

use clap::Parser;

use kestrel_cli::Cli;
use kestrel_common::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = init_telemetry(TelemetryConfig::default()) {
        eprintln!("warning: {e}");
    }

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
