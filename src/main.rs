#![allow(clippy::result_large_err)]

use clap::Parser;
use dotenvy::dotenv;
use gfinancas_admin::{
    commands::{self, Cli},
    config::Environment,
    errors::Result,
    session::AppContext,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    let cli = Cli::parse();

    // 3. Resolve the environment and pick the transport
    let env = Environment::from_env()
        .inspect_err(|e| error!("Invalid environment: {}", e))?;
    let ctx = AppContext::from_environment(&env)?;

    // 4. Run the command
    let output = commands::run(&ctx, &cli)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}
