//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COURSE_PLANNER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use course_planner::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Planner store at {}", config.store.base_url);
//! ```

mod autosave;
mod client;
mod error;
mod store;

pub use autosave::AutosaveConfig;
pub use client::{ClientConfig, Environment, LogFormat};
pub use error::{ConfigError, ValidationError};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Client runtime configuration (environment, logging)
    #[serde(default)]
    pub client: ClientConfig,

    /// Remote planner store configuration
    pub store: StoreConfig,

    /// Debounced autosave settings
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COURSE_PLANNER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COURSE_PLANNER__STORE__BASE_URL=...` -> `store.base_url = ...`
    /// - `COURSE_PLANNER__AUTOSAVE__DEBOUNCE_MS=500` -> `autosave.debounce_ms = 500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSE_PLANNER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate(&self.client.environment)?;
        self.autosave.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.client.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("COURSE_PLANNER__STORE__BASE_URL", "https://planner.example.edu");
    }

    fn clear_env() {
        env::remove_var("COURSE_PLANNER__STORE__BASE_URL");
        env::remove_var("COURSE_PLANNER__STORE__REQUEST_TIMEOUT_SECS");
        env::remove_var("COURSE_PLANNER__AUTOSAVE__DEBOUNCE_MS");
        env::remove_var("COURSE_PLANNER__AUTOSAVE__ENABLED");
        env::remove_var("COURSE_PLANNER__CLIENT__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.store.base_url, "https://planner.example.edu");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.planner_path, "/planner");
        assert_eq!(config.autosave.debounce_ms, 800);
        assert!(config.autosave.enabled);
        assert_eq!(config.client.environment, Environment::Development);
    }

    #[test]
    fn test_custom_autosave_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("COURSE_PLANNER__AUTOSAVE__DEBOUNCE_MS", "250");
        env::set_var("COURSE_PLANNER__AUTOSAVE__ENABLED", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.autosave.debounce_ms, 250);
        assert!(!config.autosave.enabled);
    }

    #[test]
    fn test_missing_store_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("COURSE_PLANNER__CLIENT__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }
}
