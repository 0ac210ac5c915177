use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::market::AssetLookup;
use crate::models::{
    Asset, Holding, Id, IdGenerator, Transaction, TransactionSide, UuidIdGenerator,
};

use super::{Portfolio, PortfolioObserver};

/// Owns the portfolio and its trade log; the only code allowed to mutate
/// either.
///
/// Every operation is synchronous and in-memory, and either completes as a
/// single atomic state transition or is a silent no-op. No operation returns
/// an error: an unresolvable asset or invalid input skips the mutation
/// entirely, leaving the snapshot untouched.
pub struct PortfolioAggregator {
    portfolio: Portfolio,
    transactions: Vec<Transaction>,
    lookup: Arc<dyn AssetLookup>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    observers: Vec<Arc<dyn PortfolioObserver>>,
}

impl PortfolioAggregator {
    pub fn new(lookup: Arc<dyn AssetLookup>) -> Self {
        Self::restore(Portfolio::new("Main"), Vec::new(), lookup)
    }

    /// Rebuild the aggregator around previously persisted state.
    pub fn restore(
        portfolio: Portfolio,
        transactions: Vec<Transaction>,
        lookup: Arc<dyn AssetLookup>,
    ) -> Self {
        Self {
            portfolio,
            transactions,
            lookup,
            ids: Box::new(UuidIdGenerator),
            clock: Box::new(SystemClock),
            observers: Vec::new(),
        }
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn subscribe(&mut self, observer: Arc<dyn PortfolioObserver>) {
        self.observers.push(observer);
    }

    pub fn snapshot(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Merge a buy into the portfolio.
    ///
    /// First buy of an asset opens a holding with `average_cost = price`;
    /// subsequent buys fold into the weighted average. Valuation always comes
    /// from the live quote, not the transaction price. Silent no-op when the
    /// asset does not resolve, `quantity <= 0`, or `price < 0`.
    pub fn add_holding(&mut self, asset_id: &Id, quantity: Decimal, price: Decimal) {
        if quantity <= Decimal::ZERO || price < Decimal::ZERO {
            debug!(asset = %asset_id, %quantity, %price, "ignoring invalid buy");
            return;
        }
        let Some(asset) = self.lookup.resolve(asset_id) else {
            debug!(asset = %asset_id, "ignoring buy for unknown asset");
            return;
        };

        self.apply_buy(asset, quantity, price);
        self.finish_mutation();
    }

    /// Remove a holding by its id. No-op if absent.
    pub fn remove_holding(&mut self, holding_id: &Id) {
        let before = self.portfolio.holdings.len();
        self.portfolio.holdings.retain(|h| &h.id != holding_id);
        if self.portfolio.holdings.len() == before {
            debug!(holding = %holding_id, "ignoring removal of unknown holding");
            return;
        }
        self.finish_mutation();
    }

    /// Append a trade to the immutable log and apply its holding-side
    /// effect: a buy merges like [`add_holding`](Self::add_holding); a sell
    /// reduces the position by at most the held quantity, leaving the
    /// average cost untouched, and prunes the holding at zero.
    ///
    /// When the asset does not resolve, nothing is logged and nothing
    /// changes. Returns the recorded transaction, if any.
    pub fn record_transaction(
        &mut self,
        asset_id: &Id,
        side: TransactionSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Option<Transaction> {
        if quantity <= Decimal::ZERO || price < Decimal::ZERO {
            debug!(asset = %asset_id, %quantity, %price, "ignoring invalid transaction");
            return None;
        }
        let Some(asset) = self.lookup.resolve(asset_id) else {
            debug!(asset = %asset_id, "ignoring transaction for unknown asset");
            return None;
        };

        let transaction = Transaction::new_with_generator(
            self.ids.as_ref(),
            self.clock.as_ref(),
            asset.id.clone(),
            asset.symbol.clone(),
            side,
            quantity,
            price,
        );
        self.transactions.push(transaction.clone());

        match side {
            TransactionSide::Buy => self.apply_buy(asset, quantity, price),
            TransactionSide::Sell => self.apply_sell(&asset.id, quantity),
        }
        self.finish_mutation();

        Some(transaction)
    }

    /// Re-resolve every holding's asset to pick up fresh quotes, then re-sum
    /// the aggregates. Holdings whose asset no longer resolves keep their
    /// previous snapshot values. This is the re-entry point for periodic
    /// price refresh.
    pub fn recalculate(&mut self) {
        for holding in &mut self.portfolio.holdings {
            if let Some(asset) = self.lookup.resolve(&holding.asset.id) {
                holding.refresh_quote(asset);
            }
        }
        self.finish_mutation();
    }

    fn apply_buy(&mut self, asset: Asset, quantity: Decimal, price: Decimal) {
        match self.portfolio.holding_for_asset_mut(&asset.id) {
            Some(holding) => holding.merge_buy(quantity, price),
            None => {
                let holding = Holding::open(self.ids.new_id(), asset, quantity, price);
                self.portfolio.holdings.push(holding);
            }
        }
    }

    fn apply_sell(&mut self, asset_id: &Id, quantity: Decimal) {
        if let Some(holding) = self.portfolio.holding_for_asset_mut(asset_id) {
            holding.reduce(quantity);
        }
        self.portfolio.holdings.retain(|h| !h.is_closed());
    }

    fn finish_mutation(&mut self) {
        self.portfolio.recompute_totals();
        self.portfolio.updated_at = self.clock.now();
        for observer in &self.observers {
            observer.portfolio_changed(&self.portfolio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::AssetCatalog;
    use crate::models::AssetKind;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn catalog() -> Arc<AssetCatalog> {
        Arc::new(AssetCatalog::from_assets(vec![
            Asset::new("aapl", "AAPL", "Apple Inc.", AssetKind::Stock, dec!(150))
                .with_change_24h(dec!(3), dec!(2.04)),
            Asset::new("btc", "BTC", "Bitcoin", AssetKind::Crypto, dec!(40000))
                .with_change_24h(dec!(-400), dec!(-0.99)),
        ]))
    }

    fn aggregator() -> PortfolioAggregator {
        PortfolioAggregator::new(catalog())
    }

    #[test]
    fn repeat_buys_merge_into_weighted_average() {
        let mut agg = aggregator();
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(170));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.holdings.len(), 1);
        let holding = &snapshot.holdings[0];
        assert_eq!(holding.quantity, dec!(20));
        assert_eq!(holding.average_cost, dec!(160));
        assert_eq!(holding.total_cost, dec!(3200));
        // Valuation from the live quote, not the purchase prices.
        assert_eq!(holding.current_value, dec!(3000));
    }

    #[test]
    fn buy_of_unknown_asset_is_a_silent_no_op() {
        let mut agg = aggregator();
        let before = agg.snapshot().updated_at;
        agg.add_holding(&Id::from_string("doge"), dec!(100), dec!(0.1));

        assert!(agg.snapshot().holdings.is_empty());
        assert_eq!(agg.snapshot().updated_at, before);
    }

    #[test]
    fn remove_of_unknown_holding_leaves_totals_untouched() {
        let mut agg = aggregator();
        agg.remove_holding(&Id::from_string("nonexistent"));

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.total_value, Decimal::ZERO);
        assert_eq!(snapshot.total_cost, Decimal::ZERO);
        assert_eq!(snapshot.total_profit_loss, Decimal::ZERO);
        assert_eq!(snapshot.total_profit_loss_percent, Decimal::ZERO);
    }

    #[test]
    fn remove_holding_resums_aggregates() {
        let mut agg = aggregator();
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));
        agg.add_holding(&Id::from_string("btc"), dec!(1), dec!(42000));

        let aapl_holding = agg.snapshot().holdings[0].id.clone();
        agg.remove_holding(&aapl_holding);

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.holdings.len(), 1);
        assert_eq!(snapshot.total_value, dec!(40000));
        assert_eq!(snapshot.total_cost, dec!(42000));
    }

    #[test]
    fn sell_reduces_quantity_and_preserves_cost_basis() {
        let mut agg = aggregator();
        agg.record_transaction(&Id::from_string("aapl"), TransactionSide::Buy, dec!(10), dec!(140));
        agg.record_transaction(&Id::from_string("aapl"), TransactionSide::Sell, dec!(4), dec!(155));

        let holding = &agg.snapshot().holdings[0];
        assert_eq!(holding.quantity, dec!(6));
        assert_eq!(holding.average_cost, dec!(140));
        assert_eq!(agg.transactions().len(), 2);
    }

    #[test]
    fn selling_everything_prunes_the_holding() {
        let mut agg = aggregator();
        agg.record_transaction(&Id::from_string("aapl"), TransactionSide::Buy, dec!(5), dec!(140));
        agg.record_transaction(&Id::from_string("aapl"), TransactionSide::Sell, dec!(9), dec!(155));

        assert!(agg.snapshot().holdings.is_empty());
        assert_eq!(agg.snapshot().total_cost, Decimal::ZERO);
        assert_eq!(agg.snapshot().total_profit_loss_percent, Decimal::ZERO);
        // Both sides stay in the log.
        assert_eq!(agg.transactions().len(), 2);
    }

    #[test]
    fn transaction_for_unknown_asset_is_not_logged() {
        let mut agg = aggregator();
        let recorded =
            agg.record_transaction(&Id::from_string("doge"), TransactionSide::Buy, dec!(1), dec!(1));

        assert!(recorded.is_none());
        assert!(agg.transactions().is_empty());
        assert!(agg.snapshot().holdings.is_empty());
    }

    #[test]
    fn recalculate_picks_up_new_quotes() {
        let catalog = catalog();
        let mut agg = PortfolioAggregator::new(catalog.clone());
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));

        let updated = catalog
            .resolve(&Id::from_string("aapl"))
            .unwrap()
            .with_price(dec!(180));
        catalog.upsert(updated);
        agg.recalculate();

        let holding = &agg.snapshot().holdings[0];
        assert_eq!(holding.current_value, dec!(1800));
        assert_eq!(holding.average_cost, dec!(150));
        assert_eq!(holding.profit_loss, dec!(300));
        assert_eq!(holding.profit_loss_percent, dec!(20));
    }

    #[test]
    fn recalculate_keeps_stale_values_for_vanished_assets() {
        let catalog = catalog();
        let mut agg = PortfolioAggregator::new(catalog.clone());
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));

        catalog.remove(&Id::from_string("aapl"));
        agg.recalculate();

        let holding = &agg.snapshot().holdings[0];
        assert_eq!(holding.current_value, dec!(1500));
        assert_eq!(agg.snapshot().total_value, dec!(1500));
    }

    #[test]
    fn day_change_uses_quantity_weighted_quote_changes() {
        let mut agg = aggregator();
        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));
        agg.add_holding(&Id::from_string("btc"), dec!(0.5), dec!(42000));

        let snapshot = agg.snapshot();
        // 3*10 + (-400)*0.5 = -170
        assert_eq!(snapshot.day_change, dec!(-170));
        let denominator = snapshot.total_value - snapshot.day_change;
        assert_eq!(
            snapshot.day_change_percent,
            snapshot.day_change / denominator * dec!(100)
        );
    }

    struct CountingObserver {
        seen: Mutex<Vec<Decimal>>,
    }

    impl PortfolioObserver for CountingObserver {
        fn portfolio_changed(&self, portfolio: &Portfolio) {
            self.seen
                .lock()
                .expect("observer lock poisoned")
                .push(portfolio.total_value);
        }
    }

    #[test]
    fn observers_see_every_completed_mutation_but_no_skips() {
        let observer = Arc::new(CountingObserver {
            seen: Mutex::new(Vec::new()),
        });
        let mut agg = aggregator();
        agg.subscribe(observer.clone());

        agg.add_holding(&Id::from_string("aapl"), dec!(10), dec!(150));
        agg.add_holding(&Id::from_string("doge"), dec!(1), dec!(1)); // skipped
        agg.remove_holding(&Id::from_string("nope")); // skipped
        agg.recalculate();

        let seen = observer.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], dec!(1500));
    }
}
