use crate::{endpoint, MarketDataProvider};
use async_trait::async_trait;
use common::{Error, Result};
use reqwest::{header, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

// The public API rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct CoinGeckoConnector {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoConnector {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value> {
        let url = endpoint(&self.base_url, segments)?;

        debug!("Fetching from CoinGecko: {} {:?}", url, query);

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(Error::HttpError)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            error!("CoinGecko API returned 404 for {}", url);
            return Err(Error::NotFound(format!(
                "No upstream resource at {}",
                segments.join("/")
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("CoinGecko API error: {} - {}", status, error_text);
            return Err(Error::UpstreamError(format!(
                "CoinGecko API returned {}",
                status.as_u16()
            )));
        }

        response.json().await.map_err(|e| {
            Error::ParseError(format!("Failed to parse CoinGecko response: {}", e))
        })
    }
}

impl Default for CoinGeckoConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoConnector {
    async fn list_coins(&self) -> Result<Value> {
        let coins = self
            .fetch(
                &["coins", "markets"],
                &[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", "50"),
                    ("page", "1"),
                    ("sparkline", "true"),
                    ("price_change_percentage", "24h,7d"),
                ],
            )
            .await?;

        debug!(
            "Fetched {} coins from CoinGecko",
            coins.as_array().map(Vec::len).unwrap_or(0)
        );
        Ok(coins)
    }

    async fn get_coin(&self, id: &str) -> Result<Value> {
        self.fetch(
            &["coins", id],
            &[
                ("localization", "false"),
                ("tickers", "false"),
                ("market_data", "true"),
                ("community_data", "false"),
                ("developer_data", "false"),
            ],
        )
        .await
    }

    async fn get_ohlc(&self, id: &str, days: &str) -> Result<Value> {
        self.fetch(
            &["coins", id, "ohlc"],
            &[("vs_currency", "usd"), ("days", days)],
        )
        .await
    }

    async fn trending(&self) -> Result<Value> {
        self.fetch(&["search", "trending"], &[]).await
    }

    async fn search(&self, query: &str) -> Result<Value> {
        self.fetch(&["search"], &[("query", query)]).await
    }
}
