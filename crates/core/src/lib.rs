//! Domain models, sync metadata and storage contracts for Expense HUD.

pub mod budgets;
pub mod categories;
pub mod errors;
pub mod events;
pub mod goals;
pub mod imports;
pub mod records;
pub mod settings;
pub mod sync;
pub mod transactions;
pub mod wealth;

pub use errors::{Error, Result};
