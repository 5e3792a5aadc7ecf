pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod scoring;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::TrackerConfig;
pub use state::AppState;
pub use store::{resolve_data_path, EntryStore};
