//! Sync domain models and storage contracts.

mod sync_engine_model;
mod sync_model;
mod sync_scheduler;
mod sync_traits;

pub use sync_engine_model::*;
pub use sync_model::*;
pub use sync_scheduler::*;
pub use sync_traits::*;
