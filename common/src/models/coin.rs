use serde::{Deserialize, Deserializer, Serialize};

// The provider sends `null` for prices it has not computed yet.
fn zero_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One market-listed asset as it appears in the coin list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinSummary {
    /// Provider identifier (e.g., "bitcoin", "ethereum")
    pub id: String,
    /// Human-readable name (e.g., "Bitcoin", "Ethereum")
    #[serde(default, deserialize_with = "empty_if_null")]
    pub name: String,
    /// Ticker symbol as sent upstream, usually lowercase (e.g., "btc")
    #[serde(default, deserialize_with = "empty_if_null")]
    pub symbol: String,
    /// Logo URL
    #[serde(default, deserialize_with = "empty_if_null")]
    pub image: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub price_change_percentage_24h: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_volume: f64,
    /// Seven days of price samples, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Sparkline {
    pub price: Vec<f64>,
}

impl CoinSummary {
    /// Uppercased ticker for display.
    pub fn ticker(&self) -> String {
        self.symbol.to_uppercase()
    }

    pub fn sparkline_prices(&self) -> &[f64] {
        self.sparkline_in_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }
}

/// Detail view of one asset. The list endpoint already carries these fields,
/// so a detail is looked up from the list rather than fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinDetail {
    #[serde(flatten)]
    pub summary: CoinSummary,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_decodes_list_entry() {
        let raw = json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 64000.5,
            "market_cap": 1.2e12,
            "market_cap_rank": 1,
            "total_volume": 3.1e10,
            "high_24h": 65000.0,
            "low_24h": 63000.0,
            "price_change_percentage_24h": -1.25,
            "circulating_supply": 19700000.0,
            "total_supply": null,
            "sparkline_in_7d": { "price": [1.0, 2.0, 3.0] },
            "ath": 73000.0
        });

        let detail: CoinDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.summary.id, "bitcoin");
        assert_eq!(detail.summary.ticker(), "BTC");
        assert_eq!(detail.summary.sparkline_prices(), &[1.0, 2.0, 3.0]);
        assert_eq!(detail.market_cap_rank, Some(1));
        assert_eq!(detail.total_supply, None);
        assert_eq!(detail.high_24h, Some(65000.0));
    }

    #[test]
    fn test_missing_numeric_fields_default() {
        let raw = json!({
            "id": "newcoin",
            "symbol": "new",
            "name": "New Coin",
            "price_change_percentage_24h": null
        });
        let coin: CoinSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(coin.current_price, 0.0);
        assert!(coin.sparkline_prices().is_empty());
    }

    #[test]
    fn test_null_text_fields_decode_empty() {
        let raw = json!({
            "id": "unlisted",
            "symbol": null,
            "name": null,
            "image": null,
            "current_price": 0.42
        });
        let detail: CoinDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.summary.image, "");
        assert_eq!(detail.summary.name, "");
        assert_eq!(detail.summary.ticker(), "");
        assert_eq!(detail.summary.current_price, 0.42);
    }
}
