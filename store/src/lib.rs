mod chart;
mod coin_store;
mod config;
mod error;

pub use chart::{
    ApplyOutcome, ChartController, ChartHost, ChartKey, ChartSurface, LoadResult, PendingLoad,
    ResizeGuard, WindowEvents,
};
pub use coin_store::{decode_coin_list, CoinStore, PollHandle};
pub use config::StoreConfig;
pub use error::StoreError;
