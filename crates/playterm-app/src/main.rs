use anyhow::Result;
use clap::Parser;

use playterm_app::{app, config::AppConfig, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    let config = AppConfig::resolve(&cli)?;
    app::run(&cli.command, config).await
}
