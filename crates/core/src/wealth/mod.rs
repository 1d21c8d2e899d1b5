//! Net worth tracking: assets, liabilities, investment properties and
//! monthly snapshots.

mod assets_model;
mod liabilities_model;
mod net_worth_model;
mod properties_model;

pub use assets_model::*;
pub use liabilities_model::*;
pub use net_worth_model::*;
pub use properties_model::*;
