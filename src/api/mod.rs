//! API module
//!
//! HTTP ingest for chat command events, plus request logging.

pub mod middleware;
pub mod routes;

pub use routes::{create_router, AppState};
