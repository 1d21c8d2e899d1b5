mod model;

pub use model::CategoryDB;
