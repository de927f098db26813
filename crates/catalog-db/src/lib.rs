//! # catalog-db: Database Layer for the Catalog
//!
//! SQLite storage behind a generic repository and a unit of work.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (PUT /api/products/7)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   catalog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  DataContext  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │───►│ (context.rs)  │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ staged changes│    │ 001_...sql   │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ set::<T>()                     │   │
//! │  │                        ┌───────▼───────┐    ┌──────────────┐  │   │
//! │  │                        │ Repository<T> │───►│  Table (SQL  │  │   │
//! │  │                        │ SqlRepository │    │   mapping)   │  │   │
//! │  │                        └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (catalog.db)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`context`] - The unit of work (change tracker + save)
//! - [`table`] - Entity to SQL table mapping
//! - [`repository`] - The generic repository contract and implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{Database, DbConfig, Repository};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//!
//! let ctx = db.context();
//! let products = ctx.set::<Product>();
//! let tracked = products.add(Product::new("A", Money::from_cents(100)));
//! products.save().await?;
//! ```

pub mod context;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod table;

pub use context::{ChangeKind, DataContext, SaveSummary, Tracked};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{Repository, SqlRepository};
pub use table::Table;
