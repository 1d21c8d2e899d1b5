//! Table models for assets, liabilities, properties and net worth snapshots.

mod model;

pub use model::{AssetDB, LiabilityDB, NetWorthSnapshotDB, PropertyDB};
