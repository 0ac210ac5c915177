use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::models::{percent_or_zero, Holding, Id, IdGenerator, UuidIdGenerator};

/// The portfolio snapshot the UI layer reads: an ordered list of holdings
/// plus cached aggregates.
///
/// Aggregates are a pure function of the holdings and their quotes. They are
/// recomputed by full re-sum on every mutation, never patched incrementally,
/// so they cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: Id,
    pub name: String,
    pub holdings: Vec<Holding>,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
    /// Σ holding.asset.change_24h × holding.quantity
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self::new_with_generator(&UuidIdGenerator, &SystemClock, name)
    }

    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        name: impl Into<String>,
    ) -> Self {
        let now = clock.now();
        Self {
            id: ids.new_id(),
            name: name.into(),
            holdings: Vec::new(),
            total_value: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_profit_loss: Decimal::ZERO,
            total_profit_loss_percent: Decimal::ZERO,
            day_change: Decimal::ZERO,
            day_change_percent: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn holding(&self, id: &Id) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.id == id)
    }

    pub fn holding_for_asset(&self, asset_id: &Id) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.asset_id() == asset_id)
    }

    pub(crate) fn holding_for_asset_mut(&mut self, asset_id: &Id) -> Option<&mut Holding> {
        self.holdings.iter_mut().find(|h| h.asset_id() == asset_id)
    }

    /// Full re-sum of every cached aggregate from the current holdings.
    pub(crate) fn recompute_totals(&mut self) {
        self.total_value = self.holdings.iter().map(|h| h.current_value).sum();
        self.total_cost = self.holdings.iter().map(|h| h.total_cost).sum();
        self.total_profit_loss = self.total_value - self.total_cost;
        self.total_profit_loss_percent =
            percent_or_zero(self.total_profit_loss, self.total_cost);
        self.day_change = self.holdings.iter().map(|h| h.day_change()).sum();
        self.day_change_percent =
            percent_or_zero(self.day_change, self.total_value - self.day_change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, AssetKind};
    use rust_decimal_macros::dec;

    #[test]
    fn new_portfolio_has_zero_totals() {
        let portfolio = Portfolio::new("Main");
        assert_eq!(portfolio.total_value, Decimal::ZERO);
        assert_eq!(portfolio.total_cost, Decimal::ZERO);
        assert_eq!(portfolio.total_profit_loss_percent, Decimal::ZERO);
        assert!(portfolio.holdings.is_empty());
    }

    #[test]
    fn recompute_totals_sums_all_holdings() {
        let mut portfolio = Portfolio::new("Main");
        let aapl = Asset::new("aapl", "AAPL", "Apple Inc.", AssetKind::Stock, dec!(120))
            .with_change_24h(dec!(2), dec!(1.69));
        let btc = Asset::new("btc", "BTC", "Bitcoin", AssetKind::Crypto, dec!(40000))
            .with_change_24h(dec!(-500), dec!(-1.23));
        portfolio
            .holdings
            .push(Holding::open(Id::new(), aapl, dec!(5), dec!(100)));
        portfolio
            .holdings
            .push(Holding::open(Id::new(), btc, dec!(0.5), dec!(42000)));

        portfolio.recompute_totals();

        assert_eq!(portfolio.total_value, dec!(20600));
        assert_eq!(portfolio.total_cost, dec!(21500));
        assert_eq!(portfolio.total_profit_loss, dec!(-900));
        // day change: 2*5 + (-500)*0.5 = -240
        assert_eq!(portfolio.day_change, dec!(-240));
    }

    #[test]
    fn day_change_percent_is_zero_when_denominator_is_zero() {
        let mut portfolio = Portfolio::new("Main");
        portfolio.recompute_totals();
        assert_eq!(portfolio.day_change_percent, Decimal::ZERO);
    }
}
