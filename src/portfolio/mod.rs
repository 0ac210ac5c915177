mod aggregator;
mod events;
mod models;

pub use aggregator::PortfolioAggregator;
pub use events::PortfolioObserver;
pub use models::Portfolio;
