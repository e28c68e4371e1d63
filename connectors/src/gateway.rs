use crate::{endpoint, schema::PayloadShape, MarketDataProvider};
use async_trait::async_trait;
use common::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

/// Client for the relay's `/api/crypto` surface.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, path: &[&str], query: &[(&str, &str)], shape: PayloadShape) -> Result<Value> {
        let mut segments = vec!["api", "crypto"];
        segments.extend_from_slice(path);
        let url = endpoint(&self.base_url, &segments)?;

        debug!("Fetching from gateway: {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(Error::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            let envelope = response.json::<ErrorEnvelope>().await.ok();
            let message = match envelope {
                Some(ErrorEnvelope { error, details: Some(details) }) => {
                    format!("{} ({})", error, details)
                }
                Some(ErrorEnvelope { error, details: None }) => error,
                None => format!("Gateway returned {}", status.as_u16()),
            };
            error!("Gateway error: {} - {}", status, message);
            return Err(if status == StatusCode::NOT_FOUND {
                Error::NotFound(message)
            } else {
                Error::UpstreamError(message)
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::ParseError(format!("Failed to parse gateway response: {}", e)))?;
        shape.check(&payload)?;
        Ok(payload)
    }
}

#[async_trait]
impl MarketDataProvider for GatewayClient {
    async fn list_coins(&self) -> Result<Value> {
        self.fetch(&["coins"], &[], PayloadShape::CoinList).await
    }

    async fn get_coin(&self, id: &str) -> Result<Value> {
        self.fetch(&["coin", id], &[], PayloadShape::Coin).await
    }

    async fn get_ohlc(&self, id: &str, days: &str) -> Result<Value> {
        self.fetch(&["ohlc", id], &[("days", days)], PayloadShape::Ohlc)
            .await
    }

    async fn trending(&self) -> Result<Value> {
        self.fetch(&["trending"], &[], PayloadShape::Trending).await
    }

    async fn search(&self, query: &str) -> Result<Value> {
        self.fetch(&["search"], &[("q", query)], PayloadShape::Search).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::net::SocketAddr;

    async fn spawn_gateway(app: Router) -> GatewayClient {
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        GatewayClient::new(format!("http://{}/", addr))
    }

    #[tokio::test]
    async fn test_list_coins_passes_through() {
        let client = spawn_gateway(Router::new().route(
            "/api/crypto/coins",
            get(|| async { Json(json!([{ "id": "bitcoin" }])) }),
        ))
        .await;

        assert_eq!(client.list_coins().await.unwrap(), json!([{ "id": "bitcoin" }]));
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_upstream_error() {
        let client = spawn_gateway(Router::new().route(
            "/api/crypto/trending",
            get(|| async {
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Failed to fetch trending coins", "details": "timeout" })),
                )
            }),
        ))
        .await;

        match client.trending().await {
            Err(Error::UpstreamError(msg)) => {
                assert_eq!(msg, "Failed to fetch trending coins (timeout)")
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let client = spawn_gateway(Router::new().route(
            "/api/crypto/coin/:id",
            get(|| async {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Coin not found" })))
            }),
        ))
        .await;

        assert!(matches!(client.get_coin("nope").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_coin_id_is_encoded_into_path() {
        let client = spawn_gateway(Router::new().route(
            "/api/crypto/coin/:id",
            get(|Path(id): Path<String>| async move { Json(json!({ "id": id })) }),
        ))
        .await;

        assert_eq!(
            client.get_coin("../coins?x=1").await.unwrap(),
            json!({ "id": "../coins?x=1" })
        );
    }

    #[tokio::test]
    async fn test_malformed_success_is_rejected() {
        let client = spawn_gateway(Router::new().route(
            "/api/crypto/ohlc/:id",
            get(|| async { Json(json!([[1, 2, 3]])) }),
        ))
        .await;

        assert!(matches!(
            client.get_ohlc("bitcoin", "7").await,
            Err(Error::SchemaMismatch(_))
        ));
    }
}
