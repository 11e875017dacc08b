//! Observer configuration
//!
//! The check interval is the only tunable. It can be set in code or loaded
//! from TOML:
//!
//! ```toml
//! interval_ms = 150
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ObserverError, Result};

/// Check interval used when none is configured
pub const DEFAULT_INTERVAL_MS: u64 = 200;

/// Configuration for a [`ScrollObserver`](crate::ScrollObserver)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Milliseconds between checks; unset or 0 means [`DEFAULT_INTERVAL_MS`]
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

impl ObserverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the check interval in milliseconds
    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    /// The interval the observer actually runs at
    ///
    /// Unset and zero both fall back to the default.
    pub fn effective_interval_ms(&self) -> u64 {
        match self.interval_ms {
            Some(ms) if ms > 0 => ms,
            _ => DEFAULT_INTERVAL_MS,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.effective_interval_ms())
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(ObserverError::ConfigRead)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_interval_defaults() {
        assert_eq!(ObserverConfig::new().effective_interval_ms(), 200);
        assert_eq!(ObserverConfig::new().interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_zero_interval_defaults() {
        let config = ObserverConfig::new().interval_ms(0);
        assert_eq!(config.interval_ms, Some(0));
        assert_eq!(config.effective_interval_ms(), DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_explicit_interval() {
        assert_eq!(ObserverConfig::new().interval_ms(1).effective_interval_ms(), 1);
        assert_eq!(ObserverConfig::new().interval_ms(75).effective_interval_ms(), 75);
    }

    #[test]
    fn test_from_toml() {
        let config = ObserverConfig::from_toml_str("interval_ms = 150").unwrap();
        assert_eq!(config.effective_interval_ms(), 150);

        let empty = ObserverConfig::from_toml_str("").unwrap();
        assert_eq!(empty.effective_interval_ms(), 200);

        let zero = ObserverConfig::from_toml_str("interval_ms = 0").unwrap();
        assert_eq!(zero.effective_interval_ms(), 200);
    }

    #[test]
    fn test_from_toml_rejects_negative() {
        let err = ObserverConfig::from_toml_str("interval_ms = -5").unwrap_err();
        assert!(matches!(err, ObserverError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ObserverConfig::load(Path::new("/nonexistent/scrollwatch.toml")).unwrap_err();
        assert!(matches!(err, ObserverError::ConfigRead(_)));
    }
}
