use common::models::{CoinDetail, CoinSummary};
use connectors::{gateway::GatewayClient, MarketDataProvider};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::StoreConfig;

type Snapshot = Arc<Vec<CoinDetail>>;

struct CacheState {
    coins: Snapshot,
    fresh: bool,
}

/// Shared read-through cache of the coin list.
///
/// Views hold one `Arc<CoinStore>` and either pull with [`CoinStore::get_coins`]
/// or subscribe for updates. A fetch always replaces the whole list. A failed
/// or malformed fetch leaves an empty list and marks the cache stale so the
/// next pull retries.
pub struct CoinStore {
    provider: Arc<dyn MarketDataProvider>,
    state: RwLock<CacheState>,
    updates: watch::Sender<Snapshot>,
}

impl CoinStore {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        let (updates, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            provider,
            state: RwLock::new(CacheState {
                coins: Arc::new(Vec::new()),
                fresh: false,
            }),
            updates,
        }
    }

    /// Store reading from the gateway named in `config`.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(Arc::new(GatewayClient::new(config.gateway_url.clone())))
    }

    /// Cached coin list, fetched first if the cache is empty or invalidated.
    pub async fn get_coins(&self) -> Vec<CoinSummary> {
        summaries(&self.snapshot().await)
    }

    /// Look up one coin's detail in the cached list.
    pub async fn find_coin(&self, id: &str) -> Option<CoinDetail> {
        self.snapshot()
            .await
            .iter()
            .find(|coin| coin.summary.id == id)
            .cloned()
    }

    /// Fetch unconditionally and replace the cached list.
    pub async fn refresh(&self) -> Vec<CoinSummary> {
        let (coins, fresh) = match self.provider.list_coins().await {
            Ok(payload) => match decode_coin_list(&payload) {
                Some(coins) => (coins, true),
                None => (Vec::new(), false),
            },
            Err(e) => {
                error!("Error fetching coins: {}", e);
                (Vec::new(), false)
            }
        };

        info!("Coin list refreshed with {} coins", coins.len());

        let snapshot = Arc::new(coins);
        {
            let mut state = self.state.write().await;
            state.coins = snapshot.clone();
            state.fresh = fresh;
        }
        self.updates.send_replace(snapshot.clone());

        summaries(&snapshot)
    }

    /// Mark the cache stale; the next pull refetches.
    pub async fn invalidate(&self) {
        self.state.write().await.fresh = false;
    }

    /// Receiver that sees every list the store publishes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<CoinDetail>>> {
        self.updates.subscribe()
    }

    /// Poll at the interval named in `config`.
    pub fn spawn_configured_polling(self: &Arc<Self>, config: &StoreConfig) -> PollHandle {
        self.spawn_polling(config.poll_interval)
    }

    /// Refresh now and then every `period` until the returned handle is stopped or dropped.
    /// A refresh that overruns the period pushes the next one back rather than
    /// queueing the missed ones.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> PollHandle {
        let store = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("Polling coin list");
                store.refresh().await;
            }
        });

        PollHandle { task: Some(task) }
    }

    async fn snapshot(&self) -> Snapshot {
        {
            let state = self.state.read().await;
            if state.fresh {
                return state.coins.clone();
            }
        }
        self.refresh().await;
        self.state.read().await.coins.clone()
    }
}

/// Owns a polling task. The task is cancelled exactly once, on `stop` or drop.
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Stopping coin list polling");
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Decode a coin list payload. Returns `None` when the payload is not an
/// array; entries that fail to decode are skipped.
pub fn decode_coin_list(payload: &Value) -> Option<Vec<CoinDetail>> {
    let Some(items) = payload.as_array() else {
        error!("Invalid data format: expected coin array, got {}", payload);
        return None;
    };

    let coins = items
        .iter()
        .filter_map(|item| match CoinDetail::deserialize(item) {
            Ok(coin) => Some(coin),
            Err(e) => {
                debug!("Skipping malformed coin entry: {}", e);
                None
            }
        })
        .collect();
    Some(coins)
}

fn summaries(coins: &[CoinDetail]) -> Vec<CoinSummary> {
    coins.iter().map(|coin| coin.summary.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{Error, Result};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves queued coin-list responses, repeating the last one.
    struct QueuedProvider {
        responses: Mutex<Vec<Result<Value>>>,
        calls: AtomicUsize,
    }

    impl QueuedProvider {
        fn new(responses: Vec<Result<Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for QueuedProvider {
        async fn list_coins(&self) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                match responses.first() {
                    Some(Ok(v)) => Ok(v.clone()),
                    Some(Err(e)) => Err(Error::UpstreamError(e.to_string())),
                    None => Ok(json!([])),
                }
            }
        }
        async fn get_coin(&self, _id: &str) -> Result<Value> {
            unimplemented!()
        }
        async fn get_ohlc(&self, _id: &str, _days: &str) -> Result<Value> {
            unimplemented!()
        }
        async fn trending(&self) -> Result<Value> {
            unimplemented!()
        }
        async fn search(&self, _query: &str) -> Result<Value> {
            unimplemented!()
        }
    }

    fn two_coins() -> Value {
        json!([
            { "id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "current_price": 64000.0, "high_24h": 65000.0 },
            { "id": "ethereum", "name": "Ethereum", "symbol": "eth", "current_price": 3200.0 }
        ])
    }

    #[tokio::test]
    async fn test_pull_through_fetches_once() {
        let provider = QueuedProvider::new(vec![Ok(two_coins())]);
        let store = CoinStore::new(provider.clone());

        assert_eq!(store.get_coins().await.len(), 2);
        assert_eq!(store.get_coins().await.len(), 2);
        assert_eq!(provider.calls(), 1);

        store.invalidate().await;
        store.get_coins().await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_not_appends() {
        let provider = QueuedProvider::new(vec![Ok(two_coins())]);
        let store = CoinStore::new(provider.clone());

        let first = store.refresh().await;
        let second = store.refresh().await;
        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_empty_and_retries() {
        let provider = QueuedProvider::new(vec![
            Err(Error::UpstreamError("CoinGecko API returned 500".into())),
            Ok(two_coins()),
        ]);
        let store = CoinStore::new(provider.clone());

        assert!(store.get_coins().await.is_empty());
        // Stale after the failure, so the next pull fetches again.
        assert_eq!(store.get_coins().await.len(), 2);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_array_payload_is_empty() {
        let provider = QueuedProvider::new(vec![Ok(json!({ "error": "Failed to fetch coins" }))]);
        let store = CoinStore::new(provider);
        assert!(store.refresh().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_coin_returns_detail() {
        let store = CoinStore::new(QueuedProvider::new(vec![Ok(two_coins())]));

        let btc = store.find_coin("bitcoin").await.unwrap();
        assert_eq!(btc.high_24h, Some(65000.0));
        assert!(store.find_coin("dogecoin").await.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_refresh() {
        let store = CoinStore::new(QueuedProvider::new(vec![Ok(two_coins())]));
        let mut rx = store.subscribe();

        store.refresh().await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 2);
    }

    #[test]
    fn test_decode_skips_bad_entries() {
        let payload = json!([{ "id": "bitcoin", "name": "Bitcoin", "symbol": "btc" }, { "id": 5 }]);
        let coins = decode_coin_list(&payload).unwrap();
        assert_eq!(coins.len(), 1);
        assert!(decode_coin_list(&json!("nope")).is_none());
    }

    #[test]
    fn test_decode_keeps_coin_without_image() {
        let payload = json!([
            { "id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "image": null },
            { "id": "ethereum", "name": "Ethereum", "symbol": "eth", "image": "https://example.com/eth.png" }
        ]);
        let coins = decode_coin_list(&payload).unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].summary.image, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_every_period_until_dropped() {
        let provider = QueuedProvider::new(vec![Ok(two_coins())]);
        let store = Arc::new(CoinStore::new(provider.clone()));

        let handle = store.spawn_polling(Duration::from_secs(60));
        assert!(handle.is_running());

        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(provider.calls(), 3);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(provider.calls(), 3);
    }

    /// First fetch hangs for five minutes; records when each fetch starts.
    struct SlowFirstProvider {
        origin: tokio::time::Instant,
        starts: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl MarketDataProvider for SlowFirstProvider {
        async fn list_coins(&self) -> Result<Value> {
            let first = {
                let mut starts = self.starts.lock().unwrap();
                starts.push(self.origin.elapsed().as_secs());
                starts.len() == 1
            };
            if first {
                tokio::time::sleep(Duration::from_secs(300)).await;
            }
            Ok(two_coins())
        }
        async fn get_coin(&self, _id: &str) -> Result<Value> {
            unimplemented!()
        }
        async fn get_ohlc(&self, _id: &str, _days: &str) -> Result<Value> {
            unimplemented!()
        }
        async fn trending(&self) -> Result<Value> {
            unimplemented!()
        }
        async fn search(&self, _query: &str) -> Result<Value> {
            unimplemented!()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_does_not_burst() {
        let provider = Arc::new(SlowFirstProvider {
            origin: tokio::time::Instant::now(),
            starts: Mutex::new(Vec::new()),
        });
        let store = Arc::new(CoinStore::new(provider.clone()));

        let _handle = store.spawn_polling(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(400)).await;

        assert_eq!(*provider.starts.lock().unwrap(), vec![0, 300, 360]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_polling_uses_config_interval() {
        let provider = QueuedProvider::new(vec![Ok(two_coins())]);
        let store = Arc::new(CoinStore::new(provider.clone()));
        let config = StoreConfig {
            poll_interval: Duration::from_secs(30),
            ..StoreConfig::default()
        };

        let _handle = store.spawn_configured_polling(&config);
        tokio::time::sleep(Duration::from_secs(75)).await;
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_store_from_config_reads_gateway() {
        // Nothing listens on the discard port, so the fetch fails and the list is empty.
        let config = StoreConfig {
            gateway_url: "http://127.0.0.1:9".to_string(),
            ..StoreConfig::default()
        };
        let store = CoinStore::from_config(&config);
        assert!(store.get_coins().await.is_empty());
    }
}
