use crate::StoreError;
use std::time::Duration;

/// Configuration for the client-side market data cache
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the market data gateway
    pub gateway_url: String,
    /// How often a polling consumer refreshes the coin list
    pub poll_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:3000".to_string(),
            poll_interval: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    /// Create a new store configuration from environment variables
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let defaults = Self::default();

        let gateway_url = lookup("GATEWAY_URL").unwrap_or(defaults.gateway_url);
        let poll_interval = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    StoreError::ConfigError(format!("POLL_INTERVAL_SECS is not a number: {}", raw))
                })?;
                if secs == 0 {
                    return Err(StoreError::ConfigError(
                        "POLL_INTERVAL_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.poll_interval,
        };

        Ok(Self {
            gateway_url,
            poll_interval,
        })
    }
}
