pub mod app;
pub mod contacts_handler;
pub mod problem;

pub use app::build_router;
