use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::alerts::{AlertBook, AlertCondition, AlertStatus, PriceAlert};
use crate::clock::{Clock, SystemClock};
use crate::config::ResolvedConfig;
use crate::duration::format_duration;
use crate::format::{format_money, format_percent};
use crate::market::{sample_assets, AssetCatalog, AssetLookup};
use crate::models::{Asset, Id, Transaction, TransactionSide, UuidIdGenerator};
use crate::portfolio::{Portfolio, PortfolioAggregator};
use crate::storage::{JsonFileStorage, Storage};
use crate::watchlist::Watchlist;

/// JSON output for one holding inside a summary.
#[derive(Serialize)]
pub struct HoldingOutput {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub total_cost: Decimal,
    pub price: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

/// JSON output for the portfolio summary command.
#[derive(Serialize)]
pub struct SummaryOutput {
    pub name: String,
    pub currency: String,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
    pub total_profit_loss_percent: Decimal,
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
    pub total_value_display: String,
    pub total_profit_loss_display: String,
    pub total_profit_loss_percent_display: String,
    pub updated_at: DateTime<Utc>,
    pub holdings: Vec<HoldingOutput>,
}

/// JSON output for transactions.
#[derive(Serialize)]
pub struct TransactionOutput {
    pub id: String,
    pub symbol: String,
    pub side: TransactionSide,
    pub quantity: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// JSON output for watchlist entries, joined with the current quote.
#[derive(Serialize)]
pub struct WatchOutput {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// JSON output for alerts.
#[derive(Serialize)]
pub struct AlertOutput {
    pub id: String,
    pub symbol: String,
    pub condition: AlertCondition,
    pub threshold: Decimal,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

/// The assembled application: config, storage, catalog, and the aggregator,
/// plus the watchlist and alert book.
///
/// Persistence is best-effort: a failed write is logged and the command
/// still succeeds with the in-memory state.
pub struct App {
    config: ResolvedConfig,
    storage: Arc<dyn Storage>,
    catalog: Arc<AssetCatalog>,
    aggregator: PortfolioAggregator,
    watchlist: Watchlist,
    alerts: AlertBook,
    ids: UuidIdGenerator,
    clock: SystemClock,
}

impl App {
    /// Load all state from the configured data directory. A fresh directory
    /// is seeded with the sample asset catalog and an empty portfolio.
    pub fn open(config: ResolvedConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(JsonFileStorage::new(&config.data_dir));
        Self::open_with_storage(config, storage)
    }

    pub fn open_with_storage(config: ResolvedConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let assets = match storage.load_assets().context("Failed to load asset catalog")? {
            Some(assets) => assets,
            None => {
                let seeded = sample_assets();
                if let Err(err) = storage.save_assets(&seeded) {
                    warn!(%err, "failed to seed asset catalog");
                }
                info!(count = seeded.len(), "seeded sample asset catalog");
                seeded
            }
        };
        let catalog = Arc::new(AssetCatalog::from_assets(assets));

        let portfolio = storage
            .load_portfolio()
            .context("Failed to load portfolio")?
            .unwrap_or_else(|| Portfolio::new("Main"));
        let transactions = storage
            .load_transactions()
            .context("Failed to load transaction log")?;
        let aggregator = PortfolioAggregator::restore(portfolio, transactions, catalog.clone());

        let watchlist = storage.load_watchlist().context("Failed to load watchlist")?;
        let alerts = storage.load_alerts().context("Failed to load alerts")?;

        Ok(Self {
            config,
            storage,
            catalog,
            aggregator,
            watchlist,
            alerts,
            ids: UuidIdGenerator,
            clock: SystemClock,
        })
    }

    pub fn aggregator(&self) -> &PortfolioAggregator {
        &self.aggregator
    }

    fn resolve_symbol(&self, symbol: &str) -> Result<Asset> {
        match self.catalog.find_symbol(symbol) {
            Some(asset) => Ok(asset),
            None => bail!("Unknown symbol: {symbol}"),
        }
    }

    fn persist_portfolio(&self) {
        if let Err(err) = self.storage.save_portfolio(self.aggregator.snapshot()) {
            warn!(%err, "failed to persist portfolio");
        }
    }

    fn persist_alerts(&self) {
        if let Err(err) = self.storage.save_alerts(&self.alerts) {
            warn!(%err, "failed to persist alerts");
        }
    }

    fn print<T: Serialize>(&self, output: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(output)?);
        Ok(())
    }

    /// Record a trade against the portfolio and persist the result.
    pub fn trade(
        &mut self,
        symbol: &str,
        side: TransactionSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<()> {
        let asset = self.resolve_symbol(symbol)?;
        let Some(transaction) =
            self.aggregator
                .record_transaction(&asset.id, side, quantity, price)
        else {
            bail!("Invalid trade: quantity must be positive and price non-negative");
        };

        if let Err(err) = self.storage.append_transactions(&[transaction.clone()]) {
            warn!(%err, "failed to persist transaction");
        }
        self.persist_portfolio();

        self.print(&transaction_output(&transaction))
    }

    /// Drop a holding without recording a trade.
    pub fn remove(&mut self, symbol: &str) -> Result<()> {
        let asset = self.resolve_symbol(symbol)?;
        let Some(holding) = self.aggregator.snapshot().holding_for_asset(&asset.id) else {
            bail!("No holding for symbol: {symbol}");
        };
        let holding_id = holding.id.clone();

        self.aggregator.remove_holding(&holding_id);
        self.persist_portfolio();
        self.summary()
    }

    /// Print the current snapshot, warning when its quotes are older than
    /// the configured staleness threshold.
    pub fn summary(&self) -> Result<()> {
        let portfolio = self.aggregator.snapshot();
        self.warn_if_stale(portfolio.updated_at);

        let display = &self.config.display;
        let output = SummaryOutput {
            name: portfolio.name.clone(),
            currency: self.config.base_currency.clone(),
            total_value: portfolio.total_value,
            total_cost: portfolio.total_cost,
            total_profit_loss: portfolio.total_profit_loss,
            total_profit_loss_percent: portfolio.total_profit_loss_percent,
            day_change: portfolio.day_change,
            day_change_percent: portfolio.day_change_percent,
            total_value_display: format_money(portfolio.total_value, display),
            total_profit_loss_display: format_money(portfolio.total_profit_loss, display),
            total_profit_loss_percent_display: format_percent(
                portfolio.total_profit_loss_percent,
            ),
            updated_at: portfolio.updated_at,
            holdings: portfolio
                .holdings
                .iter()
                .map(|h| HoldingOutput {
                    id: h.id.to_string(),
                    symbol: h.asset.symbol.clone(),
                    name: h.asset.name.clone(),
                    quantity: h.quantity,
                    average_cost: h.average_cost,
                    total_cost: h.total_cost,
                    price: h.asset.price,
                    current_value: h.current_value,
                    profit_loss: h.profit_loss,
                    profit_loss_percent: h.profit_loss_percent,
                })
                .collect(),
        };
        self.print(&output)
    }

    /// Reload the asset catalog from disk, revalue the portfolio, and run
    /// the alert book against the fresh quotes.
    pub fn refresh(&mut self) -> Result<()> {
        if let Some(assets) = self.storage.load_assets().context("Failed to load asset catalog")? {
            self.catalog.replace_all(assets);
        }
        self.aggregator.recalculate();

        let triggered = self.alerts.evaluate(self.catalog.as_ref(), &self.clock);
        if !triggered.is_empty() {
            self.persist_alerts();
        }
        self.persist_portfolio();

        self.summary()
    }

    pub fn transactions(&self) -> Result<()> {
        let output: Vec<TransactionOutput> = self
            .aggregator
            .transactions()
            .iter()
            .map(transaction_output)
            .collect();
        self.print(&output)
    }

    pub fn watch_add(&mut self, symbol: &str, notes: Option<String>) -> Result<()> {
        let asset = self.resolve_symbol(symbol)?;
        if self.watchlist.add(&self.ids, &self.clock, &asset, notes).is_none() {
            bail!("Already watching: {symbol}");
        }
        if let Err(err) = self.storage.save_watchlist(&self.watchlist) {
            warn!(%err, "failed to persist watchlist");
        }
        self.watch_list()
    }

    pub fn watch_remove(&mut self, symbol: &str) -> Result<()> {
        let asset = self.resolve_symbol(symbol)?;
        if !self.watchlist.remove(&asset.id) {
            bail!("Not watching: {symbol}");
        }
        if let Err(err) = self.storage.save_watchlist(&self.watchlist) {
            warn!(%err, "failed to persist watchlist");
        }
        self.watch_list()
    }

    pub fn watch_list(&self) -> Result<()> {
        let output: Vec<WatchOutput> = self
            .watchlist
            .items()
            .iter()
            .map(|item| {
                let quote = self.catalog.resolve(&item.asset_id);
                WatchOutput {
                    symbol: item.symbol.clone(),
                    price: quote.as_ref().map(|a| a.price),
                    change_24h_percent: quote.as_ref().map(|a| a.change_24h_percent),
                    notes: item.notes.clone(),
                    added_at: item.added_at,
                }
            })
            .collect();
        self.print(&output)
    }

    pub fn alert_add(
        &mut self,
        symbol: &str,
        condition: AlertCondition,
        threshold: Decimal,
    ) -> Result<()> {
        let asset = self.resolve_symbol(symbol)?;
        let alert = self
            .alerts
            .add(&self.ids, &self.clock, &asset, condition, threshold)
            .clone();
        self.persist_alerts();
        self.print(&alert_output(&alert))
    }

    pub fn alert_remove(&mut self, id: &str) -> Result<()> {
        if !self.alerts.remove(&Id::from_string(id)) {
            bail!("No alert with id: {id}");
        }
        self.persist_alerts();
        self.alert_list()
    }

    pub fn alert_list(&self) -> Result<()> {
        let output: Vec<AlertOutput> = self.alerts.alerts().iter().map(alert_output).collect();
        self.print(&output)
    }

    /// Evaluate active alerts against current quotes and print the ones that
    /// just fired.
    pub fn alert_check(&mut self) -> Result<()> {
        let triggered = self.alerts.evaluate(self.catalog.as_ref(), &self.clock);
        if !triggered.is_empty() {
            self.persist_alerts();
        }
        let output: Vec<AlertOutput> = self
            .alerts
            .alerts()
            .iter()
            .filter(|a| triggered.contains(&a.id))
            .map(alert_output)
            .collect();
        self.print(&output)
    }

    fn warn_if_stale(&self, updated_at: DateTime<Utc>) {
        let threshold = self.config.refresh.quote_staleness;
        let age = (self.clock.now() - updated_at)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        if age > threshold {
            warn!(
                age = %format_duration(age),
                threshold = %format_duration(threshold),
                "portfolio quotes are stale; run `foliotrack refresh`"
            );
        }
    }
}

fn transaction_output(transaction: &Transaction) -> TransactionOutput {
    TransactionOutput {
        id: transaction.id.to_string(),
        symbol: transaction.symbol.clone(),
        side: transaction.side,
        quantity: transaction.quantity,
        price: transaction.price,
        timestamp: transaction.timestamp,
    }
}

fn alert_output(alert: &PriceAlert) -> AlertOutput {
    AlertOutput {
        id: alert.id.to_string(),
        symbol: alert.symbol.clone(),
        condition: alert.condition,
        threshold: alert.threshold,
        status: alert.status,
        created_at: alert.created_at,
        triggered_at: alert.triggered_at,
    }
}
