use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};

use super::{Id, IdGenerator, UuidIdGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSide {
    Buy,
    Sell,
}

/// One entry in the append-only trade log. Stored in a JSONL file, one line
/// per entry. Transactions are never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    /// Catalog id of the traded asset, resolved at record time.
    pub asset_id: Id,
    pub symbol: String,
    pub side: TransactionSide,
    pub quantity: Decimal,
    /// Execution price, which may differ from the quote at record time.
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        asset_id: Id,
        symbol: impl Into<String>,
        side: TransactionSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::new_with_generator(
            &UuidIdGenerator,
            &SystemClock,
            asset_id,
            symbol,
            side,
            quantity,
            price,
        )
    }

    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        asset_id: Id,
        symbol: impl Into<String>,
        side: TransactionSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: ids.new_id(),
            asset_id,
            symbol: symbol.into(),
            side,
            quantity,
            price,
            timestamp: clock.now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
