//! # Catalog API
//!
//! HTTP/JSON endpoints over the generic repository.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog API                                     │
//! │                                                                         │
//! │  axum Router ──► handlers::<T> ──► db.context() ──► ctx.set::<T>()     │
//! │       │                                  │                              │
//! │  TraceLayer                     one DataContext per request            │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                   SqlitePool (shared)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `catalog.toml`):
//! - `CATALOG_HOST` - bind address (default: 0.0.0.0)
//! - `CATALOG_PORT` - HTTP port (default: 8080)
//! - `CATALOG_DATABASE_PATH` - SQLite file (default: catalog.db)
//! - `CATALOG_MAX_CONNECTIONS` - pool size (default: 5)
//! - `CATALOG_LOG_FILTER` - tracing filter when `RUST_LOG` is unset

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;

use catalog_db::Database;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use router::{build_router, resource_routes};

/// Shared application state.
///
/// Holds only the pool handle; every request opens its own unit of work.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
