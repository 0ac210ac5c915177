mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use anyhow::Result;

use crate::alerts::AlertBook;
use crate::models::{Asset, Transaction};
use crate::portfolio::Portfolio;
use crate::watchlist::Watchlist;

/// Persistence seam for the tracker's state.
///
/// Semantics are best-effort: every document is loaded in full on start, and
/// a failed write is logged by the caller rather than surfaced as an
/// operation failure. Transactions are append-only; everything else is a
/// whole-document save.
pub trait Storage: Send + Sync {
    fn load_portfolio(&self) -> Result<Option<Portfolio>>;
    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<()>;

    fn load_transactions(&self) -> Result<Vec<Transaction>>;
    fn append_transactions(&self, transactions: &[Transaction]) -> Result<()>;

    fn load_watchlist(&self) -> Result<Watchlist>;
    fn save_watchlist(&self, watchlist: &Watchlist) -> Result<()>;

    fn load_alerts(&self) -> Result<AlertBook>;
    fn save_alerts(&self, alerts: &AlertBook) -> Result<()>;

    /// The quote catalog. `None` means no catalog has been written yet, in
    /// which case the caller seeds the sample set.
    fn load_assets(&self) -> Result<Option<Vec<Asset>>>;
    fn save_assets(&self, assets: &[Asset]) -> Result<()>;
}
