//! Top-level shape checks for provider payloads.
//!
//! Only the structure callers rely on is checked. Everything else in the
//! payload is relayed untouched.

use common::{Error, Result};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Array of objects, each carrying a string `id`
    CoinList,
    /// Object carrying a string `id`
    Coin,
    /// Array of `[time_ms, open, high, low, close]` numeric rows
    Ohlc,
    /// Object with a `coins` array
    Trending,
    /// Object with a `coins` array
    Search,
}

impl PayloadShape {
    pub fn check(&self, payload: &Value) -> Result<()> {
        match self {
            PayloadShape::CoinList => {
                let items = expect_array(payload, "coin list")?;
                if let Some(pos) = items.iter().position(|item| !has_string_id(item)) {
                    return Err(Error::SchemaMismatch(format!(
                        "coin list entry {} has no string id",
                        pos
                    )));
                }
                Ok(())
            }
            PayloadShape::Coin => {
                if has_string_id(payload) {
                    Ok(())
                } else {
                    Err(Error::SchemaMismatch(
                        "coin payload is not an object with a string id".to_string(),
                    ))
                }
            }
            PayloadShape::Ohlc => {
                let rows = expect_array(payload, "OHLC")?;
                let bad_row = rows.iter().position(|row| {
                    row.as_array()
                        .map(|cells| cells.len() != 5 || !cells.iter().all(Value::is_number))
                        .unwrap_or(true)
                });
                match bad_row {
                    Some(pos) => Err(Error::SchemaMismatch(format!(
                        "OHLC row {} is not five numbers",
                        pos
                    ))),
                    None => Ok(()),
                }
            }
            PayloadShape::Trending | PayloadShape::Search => {
                if payload.get("coins").map(Value::is_array).unwrap_or(false) {
                    Ok(())
                } else {
                    Err(Error::SchemaMismatch(format!(
                        "{:?} payload has no coins array",
                        self
                    )))
                }
            }
        }
    }
}

fn expect_array<'a>(payload: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    payload
        .as_array()
        .ok_or_else(|| Error::SchemaMismatch(format!("{} payload is not an array", what)))
}

fn has_string_id(value: &Value) -> bool {
    value.get("id").map(Value::is_string).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coin_list_shape() {
        assert!(PayloadShape::CoinList.check(&json!([])).is_ok());
        assert!(PayloadShape::CoinList
            .check(&json!([{ "id": "bitcoin", "current_price": 1 }]))
            .is_ok());
        assert!(PayloadShape::CoinList.check(&json!({ "status": "busy" })).is_err());
        assert!(PayloadShape::CoinList.check(&json!([{ "name": "x" }])).is_err());
    }

    #[test]
    fn test_ohlc_shape() {
        assert!(PayloadShape::Ohlc
            .check(&json!([[1700000000000_i64, 1.0, 2.0, 0.5, 1.5]]))
            .is_ok());
        assert!(PayloadShape::Ohlc.check(&json!([[1, 2, 3]])).is_err());
        assert!(PayloadShape::Ohlc.check(&json!([[1, 2, 3, 4, "5"]])).is_err());
        assert!(PayloadShape::Ohlc.check(&json!([null])).is_err());
    }

    #[test]
    fn test_object_shapes() {
        assert!(PayloadShape::Coin.check(&json!({ "id": "bitcoin" })).is_ok());
        assert!(PayloadShape::Coin.check(&json!({ "error": "coin not found" })).is_err());
        assert!(PayloadShape::Trending.check(&json!({ "coins": [] })).is_ok());
        assert!(PayloadShape::Search.check(&json!({ "coins": [], "nfts": [] })).is_ok());
        assert!(matches!(
            PayloadShape::Search.check(&json!([])),
            Err(Error::SchemaMismatch(_))
        ));
    }
}
