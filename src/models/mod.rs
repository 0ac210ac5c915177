mod asset;
mod holding;
mod id;
mod id_generator;
mod transaction;

pub use asset::{Asset, AssetKind};
pub use holding::Holding;
pub(crate) use holding::percent_or_zero;
pub use id::Id;
pub use id_generator::{FixedIdGenerator, IdGenerator, UuidIdGenerator};
pub use transaction::{Transaction, TransactionSide};
