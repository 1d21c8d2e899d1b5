//! CSV import batches.

mod import_batch_model;

pub use import_batch_model::*;
