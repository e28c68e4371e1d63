use connectors::coingecko::COINGECKO_API_URL;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the upstream market-data provider
    pub upstream_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            upstream_url: COINGECKO_API_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("API_HOST").unwrap_or(defaults.host);
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let upstream_url = std::env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url);

        Self {
            host,
            port,
            upstream_url,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, common::Error> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| common::Error::ConfigError(format!("Invalid API_HOST '{}': {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
