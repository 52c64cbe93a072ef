//! Planner store configuration

use serde::Deserialize;
use std::time::Duration;

use super::client::Environment;
use super::error::ValidationError;

/// Remote planner store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the planner service
    pub base_url: String,

    /// Path of the planner document
    #[serde(default = "default_planner_path")]
    pub planner_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate store configuration
    ///
    /// In production, requires HTTPS for the base URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidStoreUrl);
        }
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::StoreUrlMustBeHttps);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            planner_path: default_planner_path(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_planner_path() -> String {
    "/planner".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> StoreConfig {
        StoreConfig {
            base_url: "https://planner.example.edu".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.planner_path, "/planner");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_accepts_https() {
        assert!(valid().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_validation_requires_base_url() {
        let config = StoreConfig::default();
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("STORE__BASE_URL"))
        );
    }

    #[test]
    fn test_validation_rejects_non_http_scheme() {
        let config = StoreConfig {
            base_url: "ftp://planner".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidStoreUrl)
        );
    }

    #[test]
    fn test_http_allowed_only_outside_production() {
        let config = StoreConfig {
            base_url: "http://localhost:3000".to_string(),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::StoreUrlMustBeHttps)
        );
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let config = StoreConfig {
            request_timeout_secs: 0,
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_err());

        let config = StoreConfig {
            request_timeout_secs: 500,
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }
}
