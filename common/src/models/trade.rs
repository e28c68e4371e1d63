use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Pending,
    Cancelled,
}

impl From<OrderKind> for OrderStatus {
    // Market orders fill on submit; limit orders wait forever.
    fn from(kind: OrderKind) -> Self {
        match kind {
            OrderKind::Market => OrderStatus::Completed,
            OrderKind::Limit => OrderStatus::Pending,
        }
    }
}

/// A user-submitted mock order. Lives only for the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalOrder {
    pub id: String,
    pub side: Side,
    pub kind: OrderKind,
    pub amount: f64,
    pub price: f64,
    /// Always `amount * price` at creation time
    pub total: f64,
    pub timestamp: DateTime<Utc>,
    pub status: OrderStatus,
}

impl LocalOrder {
    pub fn new(id: String, side: Side, kind: OrderKind, amount: f64, price: f64) -> Self {
        Self {
            id,
            side,
            kind,
            amount,
            price,
            total: amount * price,
            timestamp: Utc::now(),
            status: kind.into(),
        }
    }
}

/// Fabricated trade shown in the activity feed. Display-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticTransaction {
    pub id: String,
    pub side: Side,
    pub amount: f64,
    pub price: f64,
    pub total: f64,
    pub timestamp: DateTime<Utc>,
    /// Shortened counterparty address, e.g. `0x1a2b3c4d...9f8e`
    pub address: String,
}

impl SyntheticTransaction {
    pub fn new(
        id: String,
        side: Side,
        amount: f64,
        price: f64,
        timestamp: DateTime<Utc>,
        address: String,
    ) -> Self {
        Self {
            id,
            side,
            amount,
            price,
            total: amount * price,
            timestamp,
            address,
        }
    }
}

/// Fabricated holder row. Display-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntheticHolder {
    pub address: String,
    pub balance: f64,
    pub percentage: f64,
}
