//! Per-user display and import preferences.

mod settings_model;

pub use settings_model::*;
