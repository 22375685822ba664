//! Reversi match server (default binary).
//!
//! Accepts connections in pairs and runs each pair as a match until the
//! process is stopped.

use anyhow::Result;
use clap::Parser;

use reversi::adapter::{run_server, ServerConfig};

/// Reversi match server
#[derive(Parser, Debug)]
#[command(name = "reversi-server")]
#[command(about = "Authoritative Reversi server speaking the line protocol", long_about = None)]
#[command(version)]
struct Cli {
    /// Port to listen on (overrides REVERSI_PORT)
    port: Option<u16>,

    /// Address to bind (overrides REVERSI_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Append every protocol line as JSON to this file (overrides REVERSI_LOG_PATH)
    #[arg(long)]
    log_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    reversi::init_tracing();
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if cli.log_path.is_some() {
        config.log_path = cli.log_path;
    }

    run_server(config, None).await
}
