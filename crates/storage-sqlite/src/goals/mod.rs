mod model;

pub use model::GoalDB;
