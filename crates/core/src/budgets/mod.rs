//! Monthly category budgets.

mod budgets_model;

pub use budgets_model::*;
