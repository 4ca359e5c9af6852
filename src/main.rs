use clap::Parser;
use std::path::PathBuf;

use genesis_server_lib::config::AppConfig;
use genesis_server_lib::server::{self, AppState};

/// Genesis - AI-powered startup idea generation and validation backend
#[derive(Parser, Debug)]
#[command(name = "genesis-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,

    /// Path to a TOML config file (default: ~/.config/genesis/genesis.toml)
    #[arg(long, env = "GENESIS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // CLI flags override file and environment
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run_server(state).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
