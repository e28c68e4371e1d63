use common::models::CoinSummary;

/// How many coins the token pickers offer.
pub const SWAP_TOKEN_LIMIT: usize = 20;

/// Estimated destination amount for `amount` of the source asset, six decimals.
/// `None` when the amount does not parse or the rate is undefined.
pub fn estimate(amount: &str, source_price: f64, destination_price: f64) -> Option<String> {
    let amount: f64 = amount.trim().parse().ok()?;
    let estimated = amount * source_price / destination_price;
    estimated.is_finite().then(|| format!("{:.6}", estimated))
}

/// State of the swap card.
#[derive(Debug, Clone, Default)]
pub struct SwapForm {
    pub tokens: Vec<CoinSummary>,
    pub source: Option<CoinSummary>,
    pub destination: Option<CoinSummary>,
    pub source_amount: String,
    pub destination_amount: String,
}

impl SwapForm {
    /// Build the form from a fetched list. Defaults to BTC into USDC, falling
    /// back to USDT, then to the first two coins.
    pub fn new(coins: &[CoinSummary]) -> Self {
        let tokens: Vec<CoinSummary> = coins.iter().take(SWAP_TOKEN_LIMIT).cloned().collect();

        let mut form = Self {
            tokens,
            ..Self::default()
        };
        if form.tokens.len() >= 2 {
            form.source = form
                .by_ticker("BTC")
                .or_else(|| form.tokens.first().cloned());
            form.destination = form
                .by_ticker("USDC")
                .or_else(|| form.by_ticker("USDT"))
                .or_else(|| form.tokens.get(1).cloned());
        }
        form
    }

    fn by_ticker(&self, ticker: &str) -> Option<CoinSummary> {
        self.tokens.iter().find(|t| t.ticker() == ticker).cloned()
    }

    fn by_id(&self, id: &str) -> Option<CoinSummary> {
        self.tokens.iter().find(|t| t.id == id).cloned()
    }

    pub fn set_source_amount(&mut self, text: impl Into<String>) {
        self.source_amount = text.into();
        self.recompute();
    }

    /// Returns false when `id` is not one of the offered tokens.
    pub fn select_source(&mut self, id: &str) -> bool {
        match self.by_id(id) {
            Some(token) => {
                self.source = Some(token);
                self.recompute();
                true
            }
            None => false,
        }
    }

    pub fn select_destination(&mut self, id: &str) -> bool {
        match self.by_id(id) {
            Some(token) => {
                self.destination = Some(token);
                self.recompute();
                true
            }
            None => false,
        }
    }

    /// Swap sides. Amounts move with their fields as typed; no recompute.
    pub fn switch(&mut self) {
        std::mem::swap(&mut self.source, &mut self.destination);
        std::mem::swap(&mut self.source_amount, &mut self.destination_amount);
    }

    /// Derive the destination amount from the current inputs. An unparseable
    /// amount leaves the destination as it was.
    pub fn recompute(&mut self) {
        if self.source_amount.is_empty() {
            self.destination_amount.clear();
            return;
        }
        if let (Some(source), Some(destination)) = (&self.source, &self.destination) {
            if let Some(estimated) = estimate(
                &self.source_amount,
                source.current_price,
                destination.current_price,
            ) {
                self.destination_amount = estimated;
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.source_amount.is_empty() && self.source.is_some() && self.destination.is_some()
    }
}
