//! `covin-locator` -- find vaccination slots for tomorrow and manage an
//! availability alert.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default | Description                          |
//! |-----------------------|----------|---------|--------------------------------------|
//! | `COVIN_API_BASE_URL`  | yes      | --      | Alerts and fallback availability API |
//! | `COVIN_ACCESS_TOKEN`  | no       | --      | Access token for `alert` commands    |
//! | `RUST_LOG`            | no       | `covin_locator=info,covin_client=info` | Log filter |
//!
//! See `ClientConfig::from_env` for the full list. A `.env` file in the
//! working directory is loaded first.

use std::io::{BufRead, Write};

use anyhow::Context;
use clap::Parser;
use covin_client::config::ClientConfig;
use covin_client::services::Services;
use covin_locator::cli::Cli;
use covin_locator::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "covin_locator=info,covin_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    tracing::debug!(api = %config.api_base_url, state_id = config.state_id, "Configuration loaded");

    let services = Services::from_config(&config).context("Failed to set up HTTP clients")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, &services, &mut out, ask).await?;
    out.flush()?;
    Ok(())
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
fn ask(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush().ok();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
