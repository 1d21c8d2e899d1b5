mod model;

pub use model::BudgetDB;
