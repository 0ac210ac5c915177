//! In-memory storage implementation for testing.

use std::sync::Mutex;

use anyhow::Result;

use crate::alerts::AlertBook;
use crate::models::{Asset, Transaction};
use crate::portfolio::Portfolio;
use crate::watchlist::Watchlist;

use super::Storage;

/// In-memory storage for testing purposes.
#[derive(Default)]
pub struct MemoryStorage {
    portfolio: Mutex<Option<Portfolio>>,
    transactions: Mutex<Vec<Transaction>>,
    watchlist: Mutex<Option<Watchlist>>,
    alerts: Mutex<Option<AlertBook>>,
    assets: Mutex<Option<Vec<Asset>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load_portfolio(&self) -> Result<Option<Portfolio>> {
        Ok(self.portfolio.lock().expect("storage lock poisoned").clone())
    }

    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<()> {
        *self.portfolio.lock().expect("storage lock poisoned") = Some(portfolio.clone());
        Ok(())
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .expect("storage lock poisoned")
            .clone())
    }

    fn append_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.transactions
            .lock()
            .expect("storage lock poisoned")
            .extend(transactions.iter().cloned());
        Ok(())
    }

    fn load_watchlist(&self) -> Result<Watchlist> {
        Ok(self
            .watchlist
            .lock()
            .expect("storage lock poisoned")
            .clone()
            .unwrap_or_default())
    }

    fn save_watchlist(&self, watchlist: &Watchlist) -> Result<()> {
        *self.watchlist.lock().expect("storage lock poisoned") = Some(watchlist.clone());
        Ok(())
    }

    fn load_alerts(&self) -> Result<AlertBook> {
        Ok(self
            .alerts
            .lock()
            .expect("storage lock poisoned")
            .clone()
            .unwrap_or_default())
    }

    fn save_alerts(&self, alerts: &AlertBook) -> Result<()> {
        *self.alerts.lock().expect("storage lock poisoned") = Some(alerts.clone());
        Ok(())
    }

    fn load_assets(&self) -> Result<Option<Vec<Asset>>> {
        Ok(self.assets.lock().expect("storage lock poisoned").clone())
    }

    fn save_assets(&self, assets: &[Asset]) -> Result<()> {
        *self.assets.lock().expect("storage lock poisoned") = Some(assets.to_vec());
        Ok(())
    }
}
