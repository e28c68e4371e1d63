use common::models::{CoinSummary, LocalOrder, OrderKind, Side};
use common::{Error, Result};
use rand::{distributions::Alphanumeric, Rng};

use crate::Notifier;

/// Buy/sell form plus the orders placed from it this session.
///
/// Orders never execute anywhere. Market orders are recorded as completed at
/// the coin's current price, limit orders as pending at the entered price,
/// and neither ever changes status afterwards.
#[derive(Debug, Clone)]
pub struct OrderForm {
    pub side: Side,
    pub kind: OrderKind,
    pub amount: String,
    pub price: String,
    orders: Vec<LocalOrder>,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            side: Side::Buy,
            kind: OrderKind::Market,
            amount: String::new(),
            price: String::new(),
            orders: Vec::new(),
        }
    }
}

impl OrderForm {
    /// Empty form with the price field pre-filled from the coin.
    pub fn for_coin(coin: &CoinSummary) -> Self {
        Self {
            price: coin.current_price.to_string(),
            ..Self::default()
        }
    }

    /// Newest first.
    pub fn orders(&self) -> &[LocalOrder] {
        &self.orders
    }

    /// `amount * price` to two decimals, `"0.00"` until both parse.
    pub fn total_preview(&self) -> String {
        match (self.amount.trim().parse::<f64>(), self.price.trim().parse::<f64>()) {
            (Ok(amount), Ok(price)) => format!("{:.2}", amount * price),
            _ => "0.00".to_string(),
        }
    }

    /// Submit the form. On failure an error notification is queued and nothing changes.
    pub fn place(&mut self, coin: &CoinSummary, notifier: &mut Notifier) -> Result<&LocalOrder> {
        let (amount, price) = match self.validate(coin) {
            Ok(parsed) => parsed,
            Err(e) => {
                notifier.error("Invalid Order", "Please fill in all required fields");
                return Err(e);
            }
        };

        let order = LocalOrder::new(new_order_id(), self.side, self.kind, amount, price);
        notifier.info(
            "Order Placed",
            format!(
                "{} {} {} at ${:.2}",
                self.side.to_string().to_uppercase(),
                amount,
                coin.ticker(),
                price
            ),
        );

        self.orders.insert(0, order);
        self.amount.clear();
        if self.kind == OrderKind::Limit {
            self.price = coin.current_price.to_string();
        }

        Ok(&self.orders[0])
    }

    fn validate(&self, coin: &CoinSummary) -> Result<(f64, f64)> {
        if self.amount.trim().is_empty() {
            return Err(Error::Validation("amount is required".to_string()));
        }
        let amount = parse_number("amount", &self.amount)?;

        let price = match self.kind {
            OrderKind::Market => coin.current_price,
            OrderKind::Limit => {
                if self.price.trim().is_empty() {
                    return Err(Error::Validation(
                        "price is required for limit orders".to_string(),
                    ));
                }
                parse_number("price", &self.price)?
            }
        };

        Ok((amount, price))
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("{} is not a number: {}", field, text)))
}

fn new_order_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
