pub mod app;
pub mod config;

pub use app::App;
pub use app::model;
