mod config;
mod handler;
mod router;
mod service;

use config::ApiConfig;
use connectors::coingecko::CoinGeckoConnector;
use service::MarketService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting CoinLizard market gateway");

    let config = ApiConfig::from_env();
    let addr = config
        .socket_addr()
        .map_err(|e| format!("Failed to load API configuration: {}", e))?;

    let upstream = Arc::new(CoinGeckoConnector::with_base_url(config.upstream_url.clone()));
    let service = Arc::new(MarketService::new(upstream));

    let app = router::build_router(service);

    info!("Relaying {} on {}", config.upstream_url, addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
