//! Core scheduler constants for the sync orchestrator.

/// Periodic full-sync cadence while a user is signed in.
pub const SYNC_INTERVAL_SECS: u64 = 60;
