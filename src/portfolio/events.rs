use super::Portfolio;

/// Change-notification seam for UI layers.
///
/// Observers are handed the fresh snapshot after every completed mutation.
/// They get read access only; all writes go through the aggregator's
/// operations.
pub trait PortfolioObserver: Send + Sync {
    fn portfolio_changed(&self, portfolio: &Portfolio);
}
