//! sociapp server binary

#![allow(missing_docs)]

use clap::Parser;
use sociapp::Config;
use sociapp::config::LoggingConfig;
use sociapp::server::ServerBuilder;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "sociapp-server", version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "SOCIAPP_CONFIG", default_value = "config/sociapp.yaml")]
    config: PathBuf,
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> sociapp::Result<()> {
    let config = Config::load(&args.config).await?;
    init_logging(config.logging());

    info!("Starting sociapp {}", sociapp::VERSION);
    let server = ServerBuilder::new().with_config(config).build().await?;
    info!("Server starting at http://{}", server.config().address());

    server.start().await
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
