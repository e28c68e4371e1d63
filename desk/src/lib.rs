//! Simulated trading desk: swap quotes, mock orders and display-only
//! synthetic activity. Nothing here reaches a real market.

pub mod board;
pub mod notify;
pub mod orders;
pub mod session;
pub mod swap;
pub mod synthetic;

pub use board::{MarketBoard, MarketTotals};
pub use notify::{Notification, NotificationKind, Notifier};
pub use orders::OrderForm;
pub use session::TradeSession;
pub use swap::SwapForm;
pub use synthetic::{RandomSynthetic, SyntheticDataGenerator};
