use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Asset, Id};

/// Percentage change of `part` against `basis`, defined as 0 when the basis
/// is zero. Derived percentages must never be NaN or infinite.
pub(crate) fn percent_or_zero(part: Decimal, basis: Decimal) -> Decimal {
    if basis.is_zero() {
        Decimal::ZERO
    } else {
        part / basis * Decimal::ONE_HUNDRED
    }
}

/// A position in a single asset: quantity plus cost basis, with valuation
/// fields derived from the last seen quote.
///
/// The holding embeds a copy of the catalog `Asset` for display; the copy is
/// refreshed whenever the portfolio recalculates. Invariants after every
/// mutation: `total_cost == quantity * average_cost` and
/// `current_value == quantity * asset.price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: Id,
    pub asset: Asset,
    pub quantity: Decimal,
    /// Quantity-weighted mean purchase price across all buys.
    pub average_cost: Decimal,
    pub total_cost: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

impl Holding {
    /// Open a new position from a first buy. The cost basis comes from the
    /// transaction price; the valuation comes from the live quote.
    pub fn open(id: Id, asset: Asset, quantity: Decimal, price: Decimal) -> Self {
        let mut holding = Self {
            id,
            asset,
            quantity,
            average_cost: price,
            total_cost: quantity * price,
            current_value: Decimal::ZERO,
            profit_loss: Decimal::ZERO,
            profit_loss_percent: Decimal::ZERO,
        };
        holding.recompute_valuation();
        holding
    }

    pub fn asset_id(&self) -> &Id {
        &self.asset.id
    }

    /// Merge an additional buy into the position, recomputing the weighted
    /// average cost: `(old_qty*old_avg + qty*price) / (old_qty + qty)`.
    pub fn merge_buy(&mut self, quantity: Decimal, price: Decimal) {
        let combined_qty = self.quantity + quantity;
        let combined_cost = self.quantity * self.average_cost + quantity * price;
        self.average_cost = combined_cost / combined_qty;
        self.quantity = combined_qty;
        self.total_cost = self.quantity * self.average_cost;
        self.recompute_valuation();
    }

    /// Reduce the position by a sold quantity, clamped to what is held.
    /// The average cost is unchanged by a sale. Returns the quantity
    /// actually removed.
    pub fn reduce(&mut self, quantity: Decimal) -> Decimal {
        let removed = quantity.min(self.quantity);
        self.quantity -= removed;
        self.total_cost = self.quantity * self.average_cost;
        self.recompute_valuation();
        removed
    }

    pub fn is_closed(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Replace the embedded asset copy with a fresh quote and re-derive the
    /// valuation fields from the unchanged cost basis.
    pub fn refresh_quote(&mut self, asset: Asset) {
        self.asset = asset;
        self.recompute_valuation();
    }

    /// This holding's contribution to the portfolio's 24h change.
    pub fn day_change(&self) -> Decimal {
        self.asset.change_24h * self.quantity
    }

    fn recompute_valuation(&mut self) {
        self.current_value = self.quantity * self.asset.price;
        self.profit_loss = self.current_value - self.total_cost;
        self.profit_loss_percent = percent_or_zero(self.profit_loss, self.total_cost);
    }
}
