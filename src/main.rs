//! # bbc_monitoring
//!
//! Command-line front end for the BBC Monitoring API client.
//!
//! Every run is one session: log in, run a single command, log out.
//!
//! ```sh
//! bbc_monitoring -k ./data/api_key.json article 1ds9ezq2
//! bbc_monitoring search wildfire --limit 5
//! ```

use bbc_monitoring::{ApiError, ClientConfig, MonitoringClient, extract_body_text};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.config, ?args.base_url, ?args.api_key_path, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default(),
    }
    .with_overrides(args.base_url.clone(), args.api_key_path.clone());

    let client = MonitoringClient::connect(&config).await.map_err(|e| {
        error!(error = %e, "Could not start a session");
        e
    })?;

    // the session is ended whether or not the command succeeded
    let outcome = run(&client, &args.command).await;
    client.end_session().await;

    let elapsed = start_time.elapsed();
    match outcome {
        Ok(output) => {
            println!("{output}");
            info!(?elapsed, "Execution complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, domain = e.is_domain_error(), ?elapsed, "Command failed");
            Err(e.into())
        }
    }
}

async fn run(client: &MonitoringClient, command: &Command) -> Result<String, ApiError> {
    match command {
        Command::Article { id, raw: true } => {
            let article = client.fetch_by_id(id).await?;
            Ok(serde_json::to_string_pretty(&article)?)
        }
        Command::Article { id, raw: false } => {
            let article = client.fetch_by_id(id).await?;
            extract_body_text(&article)
        }
        Command::Search { query, limit } => {
            let result = client.search_headlines(query, *limit).await?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
    }
}
