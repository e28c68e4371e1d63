//! Display-only fake market activity.
//!
//! Records produced here are cosmetic filler for the trade view. They are
//! not market data and must never be fed to anything that trades.

use chrono::{DateTime, Duration, Utc};
use common::models::{Side, SyntheticHolder, SyntheticTransaction};
use rand::{distributions::Alphanumeric, rngs::StdRng, Rng, SeedableRng};

pub const TRANSACTION_COUNT: usize = 20;
pub const HOLDER_COUNT: usize = 10;

/// Minutes between consecutive fake transactions, newest first.
const TRANSACTION_SPACING_MINUTES: i64 = 5;

pub trait SyntheticDataGenerator: Send {
    /// Fake recent trades around `reference_price`, newest first, ending at `now`.
    fn transactions(&mut self, reference_price: f64, now: DateTime<Utc>) -> Vec<SyntheticTransaction>;

    /// Fake top holders.
    fn holders(&mut self) -> Vec<SyntheticHolder>;
}

/// Generator drawing every field independently from a random source.
pub struct RandomSynthetic {
    rng: StdRng,
}

impl RandomSynthetic {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic output, for reproducible screens and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn short_id(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }

    fn address(&mut self) -> String {
        format!("0x{:08x}...{:04x}", self.rng.gen::<u32>(), self.rng.gen::<u16>())
    }
}

impl Default for RandomSynthetic {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDataGenerator for RandomSynthetic {
    fn transactions(&mut self, reference_price: f64, now: DateTime<Utc>) -> Vec<SyntheticTransaction> {
        (0..TRANSACTION_COUNT)
            .map(|i| {
                let id = self.short_id();
                let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let amount = self.rng.gen_range(0.0..10.0);
                let price = reference_price * self.rng.gen_range(0.95..1.05);
                let timestamp = now - Duration::minutes(i as i64 * TRANSACTION_SPACING_MINUTES);
                let address = self.address();
                SyntheticTransaction::new(id, side, amount, price, timestamp, address)
            })
            .collect()
    }

    fn holders(&mut self) -> Vec<SyntheticHolder> {
        (0..HOLDER_COUNT)
            .map(|_| SyntheticHolder {
                address: self.address(),
                balance: self.rng.gen_range(0.0..1_000_000.0),
                percentage: self.rng.gen_range(0.0..10.0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_fields() {
        let now = Utc::now();
        let txs = RandomSynthetic::seeded(7).transactions(100.0, now);

        assert_eq!(txs.len(), TRANSACTION_COUNT);
        for (i, tx) in txs.iter().enumerate() {
            assert_eq!(tx.id.len(), 9);
            assert!((0.0..10.0).contains(&tx.amount));
            assert!((95.0..105.0).contains(&tx.price));
            assert_eq!(tx.total, tx.amount * tx.price);
            assert_eq!(tx.timestamp, now - Duration::minutes(5 * i as i64));
            assert!(tx.address.starts_with("0x"));
            assert_eq!(tx.address.len(), 2 + 8 + 3 + 4);
        }
    }

    #[test]
    fn test_holder_ranges() {
        let holders = RandomSynthetic::seeded(11).holders();
        assert_eq!(holders.len(), HOLDER_COUNT);
        assert!(holders
            .iter()
            .all(|h| (0.0..1_000_000.0).contains(&h.balance) && (0.0..10.0).contains(&h.percentage)));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let now = Utc::now();
        let a = RandomSynthetic::seeded(42).transactions(10.0, now);
        let b = RandomSynthetic::seeded(42).transactions(10.0, now);
        assert_eq!(a, b);
    }
}
