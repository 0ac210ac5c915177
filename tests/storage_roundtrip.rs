mod support;

use anyhow::Result;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::TempDir;

use foliotrack::alerts::{AlertBook, AlertCondition};
use foliotrack::clock::SystemClock;
use foliotrack::market::AssetLookup;
use foliotrack::models::{Id, Transaction, TransactionSide, UuidIdGenerator};
use foliotrack::portfolio::PortfolioAggregator;
use foliotrack::storage::{JsonFileStorage, Storage};
use foliotrack::watchlist::Watchlist;

use support::{catalog, id};

fn tx(symbol: &str, quantity: rust_decimal::Decimal) -> Transaction {
    Transaction::new(
        Id::from_string(symbol.to_lowercase()),
        symbol,
        TransactionSide::Buy,
        quantity,
        dec!(100),
    )
}

#[test]
fn portfolio_round_trips_through_json() -> Result<()> {
    let temp = TempDir::new()?;
    let storage = JsonFileStorage::new(temp.path());

    let mut agg = PortfolioAggregator::new(catalog());
    agg.add_holding(&id("aapl"), dec!(10), dec!(150));
    agg.add_holding(&id("btc"), dec!(0.5), dec!(42000));
    storage.save_portfolio(agg.snapshot())?;

    let loaded = storage.load_portfolio()?.expect("portfolio saved");
    assert_eq!(loaded.holdings.len(), 2);
    assert_eq!(loaded.total_value, agg.snapshot().total_value);
    assert_eq!(loaded.total_cost, agg.snapshot().total_cost);
    assert_eq!(loaded.updated_at, agg.snapshot().updated_at);
    Ok(())
}

#[test]
fn missing_files_load_as_empty_state() -> Result<()> {
    let temp = TempDir::new()?;
    let storage = JsonFileStorage::new(temp.path().join("does-not-exist-yet"));

    assert!(storage.load_portfolio()?.is_none());
    assert!(storage.load_transactions()?.is_empty());
    assert!(storage.load_watchlist()?.items().is_empty());
    assert!(storage.load_alerts()?.alerts().is_empty());
    assert!(storage.load_assets()?.is_none());
    Ok(())
}

#[test]
fn transaction_appends_accumulate_across_reopens() -> Result<()> {
    let temp = TempDir::new()?;

    {
        let storage = JsonFileStorage::new(temp.path());
        storage.append_transactions(&[tx("AAPL", dec!(10))])?;
    }
    {
        let storage = JsonFileStorage::new(temp.path());
        storage.append_transactions(&[tx("BTC", dec!(1)), tx("VTI", dec!(3))])?;
    }

    let storage = JsonFileStorage::new(temp.path());
    let log = storage.load_transactions()?;
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].symbol, "AAPL");
    assert_eq!(log[2].symbol, "VTI");
    Ok(())
}

#[test]
fn corrupt_jsonl_line_loses_one_entry_not_the_log() -> Result<()> {
    let temp = TempDir::new()?;
    let storage = JsonFileStorage::new(temp.path());
    storage.append_transactions(&[tx("AAPL", dec!(10))])?;

    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(temp.path().join("transactions.jsonl"))?;
        writeln!(file, "{{ not json")?;
    }
    storage.append_transactions(&[tx("BTC", dec!(1))])?;

    let log = storage.load_transactions()?;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].symbol, "AAPL");
    assert_eq!(log[1].symbol, "BTC");
    Ok(())
}

#[test]
fn watchlist_and_alerts_round_trip() -> Result<()> {
    let temp = TempDir::new()?;
    let storage = JsonFileStorage::new(temp.path());
    let lookup = catalog();

    let mut watchlist = Watchlist::new();
    let asset = lookup.resolve(&id("vti")).unwrap();
    watchlist.add(&UuidIdGenerator, &SystemClock, &asset, Some("core fund".to_string()));
    storage.save_watchlist(&watchlist)?;

    let mut alerts = AlertBook::new();
    alerts.add(
        &UuidIdGenerator,
        &SystemClock,
        &asset,
        AlertCondition::PriceBelow,
        dec!(220),
    );
    storage.save_alerts(&alerts)?;

    let loaded_watchlist = storage.load_watchlist()?;
    assert_eq!(loaded_watchlist.items().len(), 1);
    assert_eq!(loaded_watchlist.items()[0].notes.as_deref(), Some("core fund"));

    let loaded_alerts = storage.load_alerts()?;
    assert_eq!(loaded_alerts.alerts().len(), 1);
    assert_eq!(loaded_alerts.alerts()[0].threshold, dec!(220));
    assert!(loaded_alerts.alerts()[0].is_active());
    Ok(())
}

#[test]
fn asset_catalog_round_trips() -> Result<()> {
    let temp = TempDir::new()?;
    let storage = JsonFileStorage::new(temp.path());
    let assets = foliotrack::market::sample_assets();

    storage.save_assets(&assets)?;
    let loaded = storage.load_assets()?.expect("assets saved");

    assert_eq!(loaded.len(), assets.len());
    assert_eq!(loaded[0].symbol, assets[0].symbol);
    assert_eq!(loaded[0].price, assets[0].price);
    Ok(())
}
