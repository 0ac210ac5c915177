//! Price alerts: a threshold on a catalog asset that fires once.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::market::AssetLookup;
use crate::models::{Asset, Id, IdGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    PriceAbove,
    PriceBelow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Triggered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    pub id: Id,
    pub asset_id: Id,
    pub symbol: String,
    pub condition: AlertCondition,
    pub threshold: Decimal,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl PriceAlert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }

    fn crossed(&self, price: Decimal) -> bool {
        match self.condition {
            AlertCondition::PriceAbove => price > self.threshold,
            AlertCondition::PriceBelow => price < self.threshold,
        }
    }
}

/// All configured alerts, active and triggered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertBook {
    alerts: Vec<PriceAlert>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    pub fn active(&self) -> impl Iterator<Item = &PriceAlert> {
        self.alerts.iter().filter(|a| a.is_active())
    }

    pub fn add(
        &mut self,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
        asset: &Asset,
        condition: AlertCondition,
        threshold: Decimal,
    ) -> &PriceAlert {
        self.alerts.push(PriceAlert {
            id: ids.new_id(),
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            condition,
            threshold,
            status: AlertStatus::Active,
            created_at: clock.now(),
            triggered_at: None,
        });
        self.alerts.last().expect("just pushed")
    }

    /// Remove by alert id. Returns whether anything was removed.
    pub fn remove(&mut self, alert_id: &Id) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| &a.id != alert_id);
        self.alerts.len() != before
    }

    /// Compare every active alert against the current catalog price and mark
    /// crossed alerts as triggered. Alerts on assets that no longer resolve
    /// are skipped. Returns the ids of newly triggered alerts.
    pub fn evaluate(&mut self, lookup: &dyn AssetLookup, clock: &dyn Clock) -> Vec<Id> {
        let mut triggered = Vec::new();
        for alert in self.alerts.iter_mut().filter(|a| a.is_active()) {
            let Some(asset) = lookup.resolve(&alert.asset_id) else {
                continue;
            };
            if alert.crossed(asset.price) {
                alert.status = AlertStatus::Triggered;
                alert.triggered_at = Some(clock.now());
                info!(
                    symbol = %alert.symbol,
                    price = %asset.price,
                    threshold = %alert.threshold,
                    "price alert triggered"
                );
                triggered.push(alert.id.clone());
            }
        }
        triggered
    }
}
