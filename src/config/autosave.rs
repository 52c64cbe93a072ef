//! Autosave configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Debounced autosave settings for the plan state manager
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Whether local edits schedule saves at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Trailing debounce window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl AutosaveConfig {
    /// Get the debounce window as Duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate autosave configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.debounce_ms == 0 || self.debounce_ms > 60_000 {
            return Err(ValidationError::InvalidDebounce);
        }
        Ok(())
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    800
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autosave_defaults() {
        let config = AutosaveConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce(), Duration::from_millis(800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_and_huge_debounce() {
        let zero = AutosaveConfig { debounce_ms: 0, ..Default::default() };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidDebounce));

        let huge = AutosaveConfig { debounce_ms: 120_000, ..Default::default() };
        assert_eq!(huge.validate(), Err(ValidationError::InvalidDebounce));
    }
}
