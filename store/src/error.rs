use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Market data provider error: {0}")]
    ProviderError(#[from] common::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Chart load was aborted")]
    Aborted,
}
