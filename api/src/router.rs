use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handler::{self, SharedService};

pub fn build_router(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/crypto/coins", get(handler::list_coins))
        .route("/api/crypto/coin/:id", get(handler::get_coin))
        .route("/api/crypto/ohlc/:id", get(handler::get_ohlc))
        .route("/api/crypto/trending", get(handler::trending))
        .route("/api/crypto/search", get(handler::search))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}
