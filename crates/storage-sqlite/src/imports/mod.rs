mod model;

pub use model::ImportBatchDB;
