use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upstream OHLC row: `[time_ms, open, high, low, close]`
pub type OhlcTuple = [f64; 5];

/// One candlestick bar in the shape charting widgets consume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    /// Bar open time in whole seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn from_ohlc(row: &OhlcTuple) -> Self {
        let [time_ms, open, high, low, close] = *row;
        Self {
            time: (time_ms / 1000.0).floor() as i64,
            open,
            high,
            low,
            close,
        }
    }
}

/// Convert upstream rows to candles. Order is kept as received; no gap filling
/// or deduplication happens here.
pub fn candles_from_ohlc(rows: &[OhlcTuple]) -> Vec<Candle> {
    rows.iter().map(Candle::from_ohlc).collect()
}

/// Decode an OHLC payload, rejecting rows with the wrong arity or non-numeric cells.
pub fn parse_ohlc(payload: &serde_json::Value) -> Result<Vec<OhlcTuple>> {
    Vec::<OhlcTuple>::deserialize(payload)
        .map_err(|e| Error::ParseError(format!("Malformed OHLC payload: {}", e)))
}

/// Chart windows offered by the trade views, in days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    #[serde(rename = "1")]
    OneDay,
    #[serde(rename = "7")]
    #[default]
    OneWeek,
    #[serde(rename = "30")]
    OneMonth,
    #[serde(rename = "90")]
    ThreeMonths,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
    ];

    /// Value of the `days` query parameter.
    pub fn days(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1",
            Timeframe::OneWeek => "7",
            Timeframe::OneMonth => "30",
            Timeframe::ThreeMonths => "90",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(Timeframe::OneDay),
            "7" => Ok(Timeframe::OneWeek),
            "30" => Ok(Timeframe::OneMonth),
            "90" => Ok(Timeframe::ThreeMonths),
            unknown => Err(Error::ParseError(format!(
                "Unknown timeframe: {}. Supported timeframes: 1, 7, 30, 90",
                unknown
            ))),
        }
    }
}
