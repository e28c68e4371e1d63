mod candle;
mod coin;
mod trade;

pub use candle::{candles_from_ohlc, parse_ohlc, Candle, OhlcTuple, Timeframe};
pub use coin::{CoinDetail, CoinSummary, Sparkline};
pub use trade::{LocalOrder, OrderKind, OrderStatus, Side, SyntheticHolder, SyntheticTransaction};
