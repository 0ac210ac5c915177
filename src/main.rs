use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use foliotrack::alerts::AlertCondition;
use foliotrack::app::App;
use foliotrack::config::{default_config_path, ResolvedConfig};
use foliotrack::models::TransactionSide;

#[derive(Parser)]
#[command(name = "foliotrack")]
#[command(about = "Local-first investment portfolio tracker")]
struct Cli {
    /// Path to config file (defaults to ./foliotrack.toml, then the XDG
    /// data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the portfolio snapshot
    Summary,
    /// Record a buy and merge it into the holdings
    Buy {
        symbol: String,
        quantity: Decimal,
        price: Decimal,
    },
    /// Record a sell and reduce the holding
    Sell {
        symbol: String,
        quantity: Decimal,
        price: Decimal,
    },
    /// Drop a holding without recording a trade
    Remove { symbol: String },
    /// Reload quotes from assets.json and revalue the portfolio
    Refresh,
    /// Show the trade log
    Transactions,
    /// Manage the watchlist
    Watch {
        #[command(subcommand)]
        command: WatchCommand,
    },
    /// Manage price alerts
    Alert {
        #[command(subcommand)]
        command: AlertCommand,
    },
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum WatchCommand {
    /// Start watching a symbol
    Add {
        symbol: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Stop watching a symbol
    Remove { symbol: String },
    /// List watched symbols with current quotes
    List,
}

#[derive(Subcommand)]
enum AlertCommand {
    /// Add a price alert for a symbol
    Add {
        symbol: String,
        direction: AlertDirection,
        threshold: Decimal,
    },
    /// Remove an alert by id
    Remove { id: String },
    /// List all alerts
    List,
    /// Evaluate active alerts against current quotes
    Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlertDirection {
    Above,
    Below,
}

impl From<AlertDirection> for AlertCondition {
    fn from(direction: AlertDirection) -> Self {
        match direction {
            AlertDirection::Above => AlertCondition::PriceAbove,
            AlertDirection::Below => AlertCondition::PriceBelow,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ResolvedConfig::load_or_default(&config_path)?;

    if let Command::Config = cli.command {
        println!("Config file: {}", config_path.display());
        println!("Data directory: {}", config.data_dir.display());
        println!("Base currency: {}", config.base_currency);
        return Ok(());
    }

    let mut app = App::open(config)?;
    match cli.command {
        Command::Summary => app.summary(),
        Command::Buy {
            symbol,
            quantity,
            price,
        } => app.trade(&symbol, TransactionSide::Buy, quantity, price),
        Command::Sell {
            symbol,
            quantity,
            price,
        } => app.trade(&symbol, TransactionSide::Sell, quantity, price),
        Command::Remove { symbol } => app.remove(&symbol),
        Command::Refresh => app.refresh(),
        Command::Transactions => app.transactions(),
        Command::Watch { command } => match command {
            WatchCommand::Add { symbol, notes } => app.watch_add(&symbol, notes),
            WatchCommand::Remove { symbol } => app.watch_remove(&symbol),
            WatchCommand::List => app.watch_list(),
        },
        Command::Alert { command } => match command {
            AlertCommand::Add {
                symbol,
                direction,
                threshold,
            } => app.alert_add(&symbol, direction.into(), threshold),
            AlertCommand::Remove { id } => app.alert_remove(&id),
            AlertCommand::List => app.alert_list(),
            AlertCommand::Check => app.alert_check(),
        },
        Command::Config => unreachable!("handled above"),
    }
}
