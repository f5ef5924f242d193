//! Tilgang terminal console.

#![forbid(unsafe_code)]

mod commands;
mod console_config;

use std::sync::Arc;

use clap::Parser;
use tilgang_application::{AdminConsole, ConsolePorts};
use tilgang_core::{AppError, AppResult};
use tilgang_infrastructure::{
    HttpApiClient, HttpAssignmentRepository, HttpOrgUnitRepository, HttpRoleRepository,
    HttpUserRepository, TracingNotifier,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::console_config::ConsoleConfig;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let console = build_console(&config)?;

    info!(
        api_url = %config.api_url,
        base_path = %config.base_path,
        command = ?cli.command,
        "tilgang-console started"
    );

    for line in cli.command.run(&console).await? {
        println!("{line}");
    }

    Ok(())
}

fn build_console(config: &ConsoleConfig) -> AppResult<AdminConsole> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let client = HttpApiClient::new(
        http_client,
        config.api_url.as_str(),
        config.http_max_attempts,
        config.http_retry_backoff_ms,
    )?;

    let ports = ConsolePorts {
        users: Arc::new(HttpUserRepository::new(client.clone())),
        roles: Arc::new(HttpRoleRepository::new(client.clone())),
        assignments: Arc::new(HttpAssignmentRepository::new(client.clone())),
        org_units: Arc::new(HttpOrgUnitRepository::new(client)),
        notifier: Arc::new(TracingNotifier::new()),
    };

    Ok(AdminConsole::new(
        config.base_path.clone(),
        ports,
        config.page_size,
    ))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
