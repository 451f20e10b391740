// Service modules (daemon functionality)
pub mod config;
pub mod database;
pub mod http_server;
pub mod ops;
pub mod process;
pub mod state;
pub mod watcher;

// Re-exports for consumers (CLI, tests)
pub use config::Config;
pub use database::Database;
pub use http_server::{ApiClient, ApiError, ApiRequest};
pub use process::start_service;
pub use state::ServiceState;
pub use watcher::WatcherHandle;
