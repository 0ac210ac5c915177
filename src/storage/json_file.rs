use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::alerts::AlertBook;
use crate::models::{Asset, Transaction};
use crate::portfolio::Portfolio;
use crate::watchlist::Watchlist;

use super::Storage;

/// JSON file-based storage.
///
/// Layout inside the data directory:
/// ```text
/// data/
///   portfolio.json
///   watchlist.json
///   alerts.json
///   assets.json
///   transactions.jsonl
/// ```
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn portfolio_file(&self) -> PathBuf {
        self.base_path.join("portfolio.json")
    }

    fn watchlist_file(&self) -> PathBuf {
        self.base_path.join("watchlist.json")
    }

    fn alerts_file(&self) -> PathBuf {
        self.base_path.join("alerts.json")
    }

    fn assets_file(&self) -> PathBuf {
        self.base_path.join("assets.json")
    }

    fn transactions_file(&self) -> PathBuf {
        self.base_path.join("transactions.jsonl")
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).context("Failed to create data directory")
    }

    fn read_json<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read file"),
        }
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content).context("Failed to write file")
    }

    /// Read a JSONL file, skipping lines that fail to parse. A corrupt line
    /// loses that entry, never the whole log.
    fn read_jsonl<T: for<'de> serde::Deserialize<'de>>(&self, path: &Path) -> Result<Vec<T>> {
        let file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to open file"),
        };

        let reader = BufReader::new(file);
        let mut items = Vec::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line")?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(item) => items.push(item),
                Err(err) => {
                    warn!(file = %path.display(), %err, "skipping unparseable JSONL line");
                }
            }
        }

        Ok(items)
    }

    fn append_jsonl<T: serde::Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        self.ensure_dir()?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context("Failed to open file for append")?;

        for item in items {
            let line = serde_json::to_string(item).context("Failed to serialize item")?;
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
        }

        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_portfolio(&self) -> Result<Option<Portfolio>> {
        self.read_json(&self.portfolio_file())
    }

    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<()> {
        self.write_json(&self.portfolio_file(), portfolio)
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>> {
        self.read_jsonl(&self.transactions_file())
    }

    fn append_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        self.append_jsonl(&self.transactions_file(), transactions)
    }

    fn load_watchlist(&self) -> Result<Watchlist> {
        Ok(self.read_json(&self.watchlist_file())?.unwrap_or_default())
    }

    fn save_watchlist(&self, watchlist: &Watchlist) -> Result<()> {
        self.write_json(&self.watchlist_file(), watchlist)
    }

    fn load_alerts(&self) -> Result<AlertBook> {
        Ok(self.read_json(&self.alerts_file())?.unwrap_or_default())
    }

    fn save_alerts(&self, alerts: &AlertBook) -> Result<()> {
        self.write_json(&self.alerts_file(), alerts)
    }

    fn load_assets(&self) -> Result<Option<Vec<Asset>>> {
        self.read_json(&self.assets_file())
    }

    fn save_assets(&self, assets: &[Asset]) -> Result<()> {
        self.write_json(&self.assets_file(), &assets)
    }
}
