//! plan-check - loads the planner once and reports the weekly grid.
//!
//! Reads configuration from `COURSE_PLANNER__*` variables and the session
//! token from `COURSE_PLANNER_TOKEN`. Prints the plan view as JSON on stdout;
//! logs go to stderr.
//!
//! Exits with status 1 if the planner cannot be loaded or the loaded plan has
//! conflicts.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use course_planner::adapters::{HttpPlannerStore, HttpStoreConfig, StaticSession};
use course_planner::application::PlanStateManager;
use course_planner::config::{AppConfig, ClientConfig, LogFormat};

const TOKEN_VAR: &str = "COURSE_PLANNER_TOKEN";

fn init_tracing(client: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&client.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match client.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.client);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let store = match HttpPlannerStore::new(HttpStoreConfig::from(&config.store)) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create planner store");
            return ExitCode::FAILURE;
        }
    };

    let manager = PlanStateManager::with_config(
        Arc::new(store),
        Arc::new(StaticSession::from_env(TOKEN_VAR)),
        config.autosave.clone(),
    );

    if let Err(e) = manager.load().await {
        tracing::error!(error = %e, code = %e.code(), "Planner load failed");
        return ExitCode::FAILURE;
    }

    let view = manager.view();
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode plan view");
            return ExitCode::FAILURE;
        }
    }

    if view.conflicts.is_empty() {
        ExitCode::SUCCESS
    } else {
        tracing::warn!(conflicts = view.conflicts.len(), "Planned schedule has conflicts");
        ExitCode::FAILURE
    }
}
