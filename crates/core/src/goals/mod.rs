//! Savings and spending goals.

mod goals_model;

pub use goals_model::*;
