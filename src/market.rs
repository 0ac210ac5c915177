//! Asset lookup: the catalog of quotable assets.
//!
//! There is no live market-data feed. Quotes come from an in-memory catalog
//! seeded with generated sample data and reloadable from `assets.json`, so
//! price movement is simulated by editing the file and running `refresh`.

use std::sync::RwLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Asset, Id};

/// Resolves catalog assets by id.
///
/// A missing asset is not an error: the aggregator treats not-found as a
/// silent-skip condition for every mutation.
pub trait AssetLookup: Send + Sync {
    fn resolve(&self, id: &Id) -> Option<Asset>;

    /// All known assets, in catalog order.
    fn assets(&self) -> Vec<Asset>;
}

/// In-memory quote table. Order is stable for display.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entries: RwLock<Vec<Asset>>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assets(assets: Vec<Asset>) -> Self {
        Self {
            entries: RwLock::new(assets),
        }
    }

    /// Insert or replace the asset with the same id, keeping its slot.
    pub fn upsert(&self, asset: Asset) {
        let mut entries = self.entries.write().expect("catalog lock poisoned");
        match entries.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => entries.push(asset),
        }
    }

    /// Replace the whole catalog, e.g. after reloading `assets.json`.
    pub fn replace_all(&self, assets: Vec<Asset>) {
        *self.entries.write().expect("catalog lock poisoned") = assets;
    }

    pub fn remove(&self, id: &Id) -> bool {
        let mut entries = self.entries.write().expect("catalog lock poisoned");
        let before = entries.len();
        entries.retain(|a| &a.id != id);
        entries.len() != before
    }

    /// Case-insensitive symbol lookup, for CLI surfaces where users type
    /// "aapl" rather than catalog ids.
    pub fn find_symbol(&self, symbol: &str) -> Option<Asset> {
        let entries = self.entries.read().expect("catalog lock poisoned");
        entries
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("catalog lock poisoned").is_empty()
    }
}

impl AssetLookup for AssetCatalog {
    fn resolve(&self, id: &Id) -> Option<Asset> {
        let entries = self.entries.read().expect("catalog lock poisoned");
        entries.iter().find(|a| &a.id == id).cloned()
    }

    fn assets(&self) -> Vec<Asset> {
        self.entries.read().expect("catalog lock poisoned").clone()
    }
}

fn million(value: Decimal) -> Decimal {
    value * dec!(1_000_000)
}

/// The seeded quote set written to a fresh data directory.
pub fn sample_assets() -> Vec<Asset> {
    vec![
        Asset::stock("aapl", "AAPL", "Apple Inc.", dec!(178.25))
            .with_change_24h(dec!(2.15), dec!(1.22))
            .with_market_cap(million(dec!(2_780_000)))
            .with_volume(million(dec!(52.3)))
            .with_day_range(dec!(175.80), dec!(179.10)),
        Asset::stock("msft", "MSFT", "Microsoft Corporation", dec!(412.60))
            .with_change_24h(dec!(-3.40), dec!(-0.82))
            .with_market_cap(million(dec!(3_070_000)))
            .with_volume(million(dec!(21.7)))
            .with_day_range(dec!(410.05), dec!(417.35)),
        Asset::stock("googl", "GOOGL", "Alphabet Inc.", dec!(141.80))
            .with_change_24h(dec!(0.95), dec!(0.67))
            .with_market_cap(million(dec!(1_790_000)))
            .with_volume(million(dec!(24.1)))
            .with_day_range(dec!(140.20), dec!(142.55)),
        Asset::stock("tsla", "TSLA", "Tesla, Inc.", dec!(248.50))
            .with_change_24h(dec!(-6.20), dec!(-2.43))
            .with_market_cap(million(dec!(790_000)))
            .with_volume(million(dec!(98.4)))
            .with_day_range(dec!(246.10), dec!(256.30)),
        Asset::crypto("btc", "BTC", "Bitcoin", dec!(43250.00))
            .with_change_24h(dec!(1120.00), dec!(2.66))
            .with_market_cap(million(dec!(846_000)))
            .with_volume(million(dec!(28_400)))
            .with_day_range(dec!(41980.00), dec!(43510.00)),
        Asset::crypto("eth", "ETH", "Ethereum", dec!(2285.40))
            .with_change_24h(dec!(-54.10), dec!(-2.31))
            .with_market_cap(million(dec!(274_000)))
            .with_volume(million(dec!(12_700)))
            .with_day_range(dec!(2261.00), dec!(2352.80)),
        Asset::etf("spy", "SPY", "SPDR S&P 500 ETF Trust", dec!(476.30))
            .with_change_24h(dec!(1.85), dec!(0.39))
            .with_market_cap(million(dec!(497_000)))
            .with_volume(million(dec!(71.9)))
            .with_day_range(dec!(474.00), dec!(477.65)),
        Asset::etf("vti", "VTI", "Vanguard Total Stock Market ETF", dec!(235.90))
            .with_change_24h(dec!(0.70), dec!(0.30))
            .with_market_cap(million(dec!(352_000)))
            .with_volume(million(dec!(3.2)))
            .with_day_range(dec!(234.85), dec!(236.40)),
    ]
}
