//! # Repository Module
//!
//! The generic repository contract and its SQLite implementation.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Generic Repository over a Unit of Work               │
//! │                                                                         │
//! │  Handler                                                               │
//! │       │  ctx.set::<Product>()                                          │
//! │       ▼                                                                 │
//! │  Repository<Product>                                                   │
//! │  ├── all()            ── reads go straight to the pool                 │
//! │  ├── find(id)         ── Ok(None) when absent, never an error          │
//! │  ├── add(entity)      ─┐                                               │
//! │  ├── update(entity)   ─┼─ staged in the DataContext tracker            │
//! │  ├── remove(entity)   ─┘                                               │
//! │  └── save()           ── commits the whole context                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Implementations
//!
//! - [`SqlRepository`] - Delegates to a [`DataContext`](crate::DataContext)

pub mod sql;

use async_trait::async_trait;
use catalog_core::{Entity, EntityId};

use crate::context::{SaveSummary, Tracked};
use crate::error::DbResult;

pub use sql::SqlRepository;

/// Uniform CRUD surface over any entity type.
///
/// Mutations only stage changes; nothing is durable until `save` succeeds.
/// Failures come straight from the store: no retries, no validation.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Every persisted entity of the type, ordered by id.
    async fn all(&self) -> DbResult<Vec<T>>;

    /// The entity with the given id, or `None` if absent.
    async fn find(&self, id: EntityId) -> DbResult<Option<T>>;

    /// Stages an insert. The handle resolves to the persisted entity after
    /// a successful save.
    fn add(&self, entity: T) -> Tracked<T>;

    /// Stages a full replacement of the persisted entity with the same id.
    fn update(&self, entity: T);

    /// Stages a delete of the persisted entity with the same id.
    fn remove(&self, entity: T);

    /// Commits every change staged on the owning context.
    async fn save(&self) -> DbResult<SaveSummary>;
}
