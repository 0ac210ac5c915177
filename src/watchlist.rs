use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::models::{Asset, Id, IdGenerator};

/// An asset the user is tracking without holding it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: Id,
    pub asset_id: Id,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Watchlist membership. Adding an asset that is already present is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    items: Vec<WatchlistItem>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    pub fn contains(&self, asset_id: &Id) -> bool {
        self.items.iter().any(|item| &item.asset_id == asset_id)
    }

    /// Add an asset. Returns the new item, or `None` when the asset was
    /// already on the list.
    pub fn add(
        &mut self,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        asset: &Asset,
        notes: Option<String>,
    ) -> Option<&WatchlistItem> {
        if self.contains(&asset.id) {
            return None;
        }
        self.items.push(WatchlistItem {
            id: ids.new_id(),
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            notes,
            added_at: clock.now(),
        });
        self.items.last()
    }

    /// Remove by asset id. Returns whether anything was removed.
    pub fn remove(&mut self, asset_id: &Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.asset_id != asset_id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SystemClock};
    use crate::models::{AssetKind, FixedIdGenerator, UuidIdGenerator};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn aapl() -> Asset {
        Asset::new("aapl", "AAPL", "Apple Inc.", AssetKind::Stock, dec!(150))
    }

    #[test]
    fn add_is_idempotent_per_asset() {
        let mut watchlist = Watchlist::new();
        let ids = UuidIdGenerator;
        let clock = SystemClock;

        assert!(watchlist.add(&ids, &clock, &aapl(), None).is_some());
        assert!(watchlist
            .add(&ids, &clock, &aapl(), Some("again".to_string()))
            .is_none());
        assert_eq!(watchlist.items().len(), 1);
    }

    #[test]
    fn add_records_deterministic_id_and_timestamp() {
        let mut watchlist = Watchlist::new();
        let ids = FixedIdGenerator::new([Id::from_string("watch-1")]);
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());

        let item = watchlist
            .add(&ids, &clock, &aapl(), Some("earnings soon".to_string()))
            .unwrap();
        assert_eq!(item.id.as_str(), "watch-1");
        assert_eq!(item.added_at, clock.now());
    }

    #[test]
    fn remove_reports_membership() {
        let mut watchlist = Watchlist::new();
        watchlist.add(&UuidIdGenerator, &SystemClock, &aapl(), None);

        assert!(watchlist.remove(&Id::from_string("aapl")));
        assert!(!watchlist.remove(&Id::from_string("aapl")));
        assert!(watchlist.items().is_empty());
    }
}
