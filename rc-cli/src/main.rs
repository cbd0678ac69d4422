//! rc: call any Rocket.Chat client operation from the shell. Config from env (and `.env`).

use anyhow::{Context, Result};
use clap::Parser;
use rc_cli::{execute, Cli};
use rc_client::{ClientConfig, RocketChatClient};
use rc_core::init_tracing;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::load().context("Load Rocket.Chat config from .env or environment")?;
    if let Some(log_file) = cli.log_file.clone() {
        config = config.with_log_file(log_file);
    }
    config.validate()?;
    init_tracing(config.log_file())?;

    let client = RocketChatClient::new(&config)?;
    match execute(&client, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "step: command failed");
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "success": false, "error": e.to_string() }))?
            );
            std::process::exit(1);
        }
    }
}
