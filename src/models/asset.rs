use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stock,
    Crypto,
    Etf,
}

/// A point-in-time market quote for a tradable asset.
///
/// Immutable snapshot supplied by the catalog. The aggregator only reads
/// `price` and `change_24h`; the remaining fields exist for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Id,
    pub symbol: String,
    pub name: String,
    pub kind: AssetKind,
    /// Last quoted price in the base currency.
    pub price: Decimal,
    /// Absolute price change over the trailing 24 hours.
    pub change_24h: Decimal,
    pub change_24h_percent: Decimal,
    pub market_cap: Decimal,
    pub volume: Decimal,
    pub day_high: Decimal,
    pub day_low: Decimal,
}

impl Asset {
    pub fn new(
        id: impl Into<Id>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            kind,
            price,
            change_24h: Decimal::ZERO,
            change_24h_percent: Decimal::ZERO,
            market_cap: Decimal::ZERO,
            volume: Decimal::ZERO,
            day_high: price,
            day_low: price,
        }
    }

    pub fn stock(id: impl Into<Id>, symbol: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self::new(id, symbol, name, AssetKind::Stock, price)
    }

    pub fn crypto(id: impl Into<Id>, symbol: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self::new(id, symbol, name, AssetKind::Crypto, price)
    }

    pub fn etf(id: impl Into<Id>, symbol: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self::new(id, symbol, name, AssetKind::Etf, price)
    }

    pub fn with_change_24h(mut self, change: Decimal, percent: Decimal) -> Self {
        self.change_24h = change;
        self.change_24h_percent = percent;
        self
    }

    pub fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = market_cap;
        self
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_day_range(mut self, low: Decimal, high: Decimal) -> Self {
        self.day_low = low;
        self.day_high = high;
        self
    }

    /// Replace the quote fields, keeping identity untouched.
    ///
    /// Used when reloading the catalog from disk to simulate a price tick.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }
}
