pub mod config;
pub mod db;
pub mod domain;
pub mod interface;
pub mod messaging;
pub mod service;
pub mod state;
pub mod store;

pub use interface::http::build_router;
pub use state::AppState;
