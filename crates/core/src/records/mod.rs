//! Local read/write API used by the UI, importers and other collaborators.

mod records_service;

pub use records_service::*;
