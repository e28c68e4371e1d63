use common::models::CoinSummary;
use common::view::{
    filter_coins, format_billions, format_change, format_whole_usd, tab_view, trending_ids,
    MarketTab, SparklinePath,
};
use serde_json::Value;
use store::CoinStore;

const SPARKLINE_WIDTH: f64 = 120.0;
const SPARKLINE_HEIGHT: f64 = 50.0;

/// One rendered row of the market table.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub price: f64,
    pub change: String,
    pub rising: bool,
    pub market_cap: String,
    pub volume: String,
    pub sparkline: Option<SparklinePath>,
}

/// Aggregate figures over the whole coin list, ignoring search and tab.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketTotals {
    pub market_cap: f64,
    pub volume: f64,
    pub count: usize,
}

impl MarketTotals {
    pub fn market_cap_label(&self) -> String {
        format_whole_usd(self.market_cap)
    }

    pub fn volume_label(&self) -> String {
        format_whole_usd(self.volume)
    }
}

/// Market listing: the latest coin list plus search text and tab.
#[derive(Debug, Clone, Default)]
pub struct MarketBoard {
    coins: Vec<CoinSummary>,
    trending: Vec<String>,
    pub query: String,
    pub tab: MarketTab,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the current list from the shared store.
    pub async fn sync(&mut self, store: &CoinStore) {
        self.replace_coins(store.get_coins().await);
    }

    pub fn replace_coins(&mut self, coins: Vec<CoinSummary>) {
        self.coins = coins;
    }

    pub fn set_trending(&mut self, payload: &Value) {
        self.trending = trending_ids(payload);
    }

    pub fn visible(&self) -> Vec<&CoinSummary> {
        tab_view(filter_coins(&self.coins, &self.query), self.tab, &self.trending)
    }

    pub fn totals(&self) -> MarketTotals {
        MarketTotals {
            market_cap: self.coins.iter().map(|c| c.market_cap).sum(),
            volume: self.coins.iter().map(|c| c.total_volume).sum(),
            count: self.coins.len(),
        }
    }

    pub fn rows(&self) -> Vec<BoardRow> {
        self.visible()
            .into_iter()
            .enumerate()
            .map(|(i, coin)| BoardRow {
                rank: i + 1,
                id: coin.id.clone(),
                name: coin.name.clone(),
                ticker: coin.ticker(),
                price: coin.current_price,
                change: format_change(coin.price_change_percentage_24h),
                rising: coin.price_change_percentage_24h >= 0.0,
                market_cap: format_billions(coin.market_cap),
                volume: format_billions(coin.total_volume),
                sparkline: SparklinePath::new(
                    coin.sparkline_prices(),
                    SPARKLINE_WIDTH,
                    SPARKLINE_HEIGHT,
                ),
            })
            .collect()
    }
}
