use chrono::Utc;
use common::models::{CoinDetail, SyntheticHolder, SyntheticTransaction, Timeframe};
use store::{ChartKey, CoinStore};
use tracing::{debug, info};

use crate::{Notifier, OrderForm, SyntheticDataGenerator};

/// Everything the trade view holds for one asset.
pub struct TradeSession {
    pub asset_id: String,
    /// `None` when the asset is not in the current coin list
    pub coin: Option<CoinDetail>,
    pub timeframe: Timeframe,
    pub transactions: Vec<SyntheticTransaction>,
    pub holders: Vec<SyntheticHolder>,
    pub form: OrderForm,
    pub notifier: Notifier,
}

impl TradeSession {
    /// Look the asset up in the shared list and fill the activity tabs with synthetic rows.
    pub async fn open(
        store: &CoinStore,
        asset_id: &str,
        synthetic: &mut dyn SyntheticDataGenerator,
    ) -> Self {
        let coin = store.find_coin(asset_id).await;

        let (transactions, holders, form) = match &coin {
            Some(detail) => {
                info!("Opened trade view for {}", asset_id);
                (
                    synthetic.transactions(detail.summary.current_price, Utc::now()),
                    synthetic.holders(),
                    OrderForm::for_coin(&detail.summary),
                )
            }
            None => {
                debug!("Token not found: {}", asset_id);
                (Vec::new(), Vec::new(), OrderForm::default())
            }
        };

        Self {
            asset_id: asset_id.to_string(),
            coin,
            timeframe: Timeframe::default(),
            transactions,
            holders,
            form,
            notifier: Notifier::new(),
        }
    }

    /// Chart to show; `None` until the asset is known.
    pub fn chart_key(&self) -> Option<ChartKey> {
        self.coin
            .as_ref()
            .map(|_| ChartKey::new(self.asset_id.clone(), self.timeframe))
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Option<ChartKey> {
        self.timeframe = timeframe;
        self.chart_key()
    }

    /// Submit the order form. Returns whether an order was recorded.
    pub fn place_order(&mut self) -> bool {
        match &self.coin {
            Some(detail) => self.form.place(&detail.summary, &mut self.notifier).is_ok(),
            None => {
                self.notifier.error("Invalid Trade", "Please enter an amount");
                false
            }
        }
    }
}
