//! NAV feed configuration

use serde::{Deserialize, Serialize};

/// Configuration for the NAV feed client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavFeedConfig {
    /// Feed base URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Fetch attempts before giving up
    pub max_attempts: u32,
}

impl Default for NavFeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mfapi.in".to_string(),
            timeout_secs: 10,
            max_attempts: 3,
        }
    }
}

impl NavFeedConfig {
    /// Loads configuration from `NAV_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&NavFeedConfig::default())?)
            .add_source(config::Environment::with_prefix("NAV"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = NavFeedConfig::default();
        assert_eq!(cfg.base_url, "https://api.mfapi.in");
        assert_eq!(cfg.max_attempts, 3);
    }
}
