//! Transaction categories and the default category set.

mod categories_defaults;
mod categories_model;

pub use categories_defaults::*;
pub use categories_model::*;
