use common::Result;
use connectors::{schema::PayloadShape, MarketDataProvider};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Stateless relay in front of one market-data provider.
///
/// Every call maps to exactly one upstream request. Payloads are checked
/// against their expected shape and otherwise returned untouched. There is
/// no retry and no caching.
pub struct MarketService {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn list_coins(&self) -> Result<Value> {
        debug!("Relaying coin list");
        let coins = self.provider.list_coins().await;
        checked("coins", coins, PayloadShape::CoinList)
    }

    pub async fn get_coin(&self, id: &str) -> Result<Value> {
        debug!("Relaying coin {}", id);
        let coin = self.provider.get_coin(id).await;
        checked("coin", coin, PayloadShape::Coin)
    }

    pub async fn get_ohlc(&self, id: &str, days: &str) -> Result<Value> {
        debug!("Relaying OHLC for {} over {} days", id, days);
        let rows = self.provider.get_ohlc(id, days).await;
        checked("ohlc", rows, PayloadShape::Ohlc)
    }

    pub async fn trending(&self) -> Result<Value> {
        debug!("Relaying trending");
        let trending = self.provider.trending().await;
        checked("trending", trending, PayloadShape::Trending)
    }

    pub async fn search(&self, query: &str) -> Result<Value> {
        debug!("Relaying search for {:?}", query);
        let results = self.provider.search(query).await;
        checked("search", results, PayloadShape::Search)
    }
}

fn checked(operation: &str, payload: Result<Value>, shape: PayloadShape) -> Result<Value> {
    let result = payload.and_then(|value| shape.check(&value).map(|_| value));
    if let Err(e) = &result {
        error!("Error in /api/crypto/{}: {}", operation, e);
    }
    result
}
