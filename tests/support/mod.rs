use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use foliotrack::clock::FixedClock;
use foliotrack::market::AssetCatalog;
use foliotrack::models::{Asset, Id};
use foliotrack::portfolio::PortfolioAggregator;

/// A small catalog with one asset of each kind and known quotes.
pub fn catalog() -> Arc<AssetCatalog> {
    Arc::new(AssetCatalog::from_assets(vec![
        Asset::stock("aapl", "AAPL", "Apple Inc.", dec!(150))
            .with_change_24h(dec!(3), dec!(2.04)),
        Asset::crypto("btc", "BTC", "Bitcoin", dec!(40000))
            .with_change_24h(dec!(-400), dec!(-0.99)),
        Asset::etf("vti", "VTI", "Vanguard Total Stock Market ETF", dec!(235))
            .with_change_24h(dec!(0.5), dec!(0.21)),
    ]))
}

pub fn aggregator() -> PortfolioAggregator {
    PortfolioAggregator::new(catalog())
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap())
}

pub fn id(value: &str) -> Id {
    Id::from_string(value)
}
