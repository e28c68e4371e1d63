use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::Error as CommonError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::service::MarketService;

pub type SharedService = Arc<MarketService>;

/// A failed relay call: a generic message for the client plus the cause.
pub struct ApiError {
    message: &'static str,
    source: CommonError,
}

impl ApiError {
    pub fn new(message: &'static str, source: CommonError) -> Self {
        Self { message, source }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Upstream status codes stay in the logs; only exception text goes in `details`.
        let (status, details) = match &self.source {
            CommonError::NotFound(_) => (StatusCode::NOT_FOUND, Some(self.source.to_string())),
            CommonError::HttpError(_)
            | CommonError::ParseError(_)
            | CommonError::SchemaMismatch(_) => {
                (StatusCode::BAD_GATEWAY, Some(self.source.to_string()))
            }
            CommonError::UpstreamError(_) => (StatusCode::BAD_GATEWAY, None),
            CommonError::Validation(_) => (StatusCode::BAD_REQUEST, Some(self.source.to_string())),
            CommonError::ConfigError(_) | CommonError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorResponse {
            error: self.message.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub async fn list_coins(State(service): State<SharedService>) -> Result<Json<Value>, ApiError> {
    let coins = service
        .list_coins()
        .await
        .map_err(|e| ApiError::new("Failed to fetch coins", e))?;
    Ok(Json(coins))
}

pub async fn get_coin(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let coin = service
        .get_coin(&coin_id)
        .await
        .map_err(|e| ApiError::new("Failed to fetch coin data", e))?;
    Ok(Json(coin))
}

#[derive(Debug, Deserialize)]
pub struct OhlcQuery {
    pub days: Option<String>,
}

pub async fn get_ohlc(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
    Query(query): Query<OhlcQuery>,
) -> Result<Json<Value>, ApiError> {
    // Whatever the caller sends is forwarded; the provider decides what it accepts.
    let days = query.days.unwrap_or_else(|| "7".to_string());

    let rows = service
        .get_ohlc(&coin_id, &days)
        .await
        .map_err(|e| ApiError::new("Failed to fetch OHLC data", e))?;
    Ok(Json(rows))
}

pub async fn trending(State(service): State<SharedService>) -> Result<Json<Value>, ApiError> {
    let trending = service
        .trending()
        .await
        .map_err(|e| ApiError::new("Failed to fetch trending coins", e))?;
    Ok(Json(trending))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search(
    State(service): State<SharedService>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let q = query.q.unwrap_or_default();

    let results = service
        .search(&q)
        .await
        .map_err(|e| ApiError::new("Failed to search coins", e))?;
    Ok(Json(results))
}
