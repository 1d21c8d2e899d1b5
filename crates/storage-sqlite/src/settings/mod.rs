mod model;

pub use model::SettingsDB;
