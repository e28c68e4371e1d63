pub mod coingecko;
pub mod gateway;
pub mod schema;

use async_trait::async_trait;
use common::{Error, Result};
use reqwest::Url;
use serde_json::Value;

/// Read-only market data operations. Implemented by the upstream provider
/// and by the client of our own relay, so consumers can sit on either.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Top coins by market cap, USD, with sparkline and 24h/7d change
    async fn list_coins(&self) -> Result<Value>;

    /// One coin by provider id
    async fn get_coin(&self, id: &str) -> Result<Value>;

    /// OHLC rows for a coin over `days` (passed through as given)
    async fn get_ohlc(&self, id: &str, days: &str) -> Result<Value>;

    /// Trending assets
    async fn trending(&self) -> Result<Value>;

    /// Free-text asset search; an empty query is sent as-is
    async fn search(&self, query: &str) -> Result<Value>;
}

/// Append `segments` to `base`, percent-encoding each one as a single path segment.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| Error::ConfigError(format!("Invalid base URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::ConfigError(format!("Base URL '{}' cannot carry a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let url = endpoint("https://api.coingecko.com/api/v3", &["coins", "bitcoin", "ohlc"]).unwrap();
        assert_eq!(url.as_str(), "https://api.coingecko.com/api/v3/coins/bitcoin/ohlc");

        let url = endpoint("http://localhost:3000/", &["api", "crypto", "coins"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/crypto/coins");
    }

    #[test]
    fn test_endpoint_encodes_reserved_characters() {
        let url = endpoint("http://localhost:3000", &["coin", "a/b?c#d"]).unwrap();
        assert_eq!(url.path(), "/coin/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_unusable_base_is_config_error() {
        assert!(matches!(endpoint("not a url", &["coins"]), Err(Error::ConfigError(_))));
        assert!(matches!(
            endpoint("mailto:ops@example.com", &["coins"]),
            Err(Error::ConfigError(_))
        ));
    }
}
