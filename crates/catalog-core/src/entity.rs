//! # Entity Contract
//!
//! Any record that is persisted and retrieved by a unique integer identifier.
//!
//! ## Identity Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product { id: 0, .. }        ← transient, built from a request body   │
//! │       │                                                                 │
//! │       │  repo.add(product)    ← staged, on_added() stamps timestamps   │
//! │       ▼                                                                 │
//! │  ctx.save()                   ← INSERT ... RETURNING assigns the id    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Product { id: 42, .. }       ← persisted                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

/// Identifier type shared by every entity.
pub type EntityId = i64;

/// An id of zero marks an entity the store has not assigned an id to yet.
pub const TRANSIENT_ID: EntityId = 0;

/// The bound required by `Repository<T>`: the type has a unique identifier.
///
/// The lifecycle hooks are called by the data context when a change is
/// staged, so entities can stamp audit fields without the repository
/// knowing about them.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable type name, used in errors and logs.
    const NAME: &'static str;

    /// Returns the unique identifier.
    fn id(&self) -> EntityId;

    /// Whether the store has assigned an identifier yet.
    fn is_transient(&self) -> bool {
        self.id() == TRANSIENT_ID
    }

    /// Called when the entity is staged for insertion.
    fn on_added(&mut self, _at: DateTime<Utc>) {}

    /// Called when the entity is staged for replacement.
    fn on_modified(&mut self, _at: DateTime<Utc>) {}
}
