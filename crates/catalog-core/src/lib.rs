//! # catalog-core: Entity Contract and Domain Types
//!
//! Pure types shared by the storage layer and the HTTP layer. Nothing in
//! this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                catalog-api (axum handlers)                      │   │
//! │  │    GET / POST / PUT / DELETE  /api/products[/{id}]              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              catalog-db (Repository<T>, DataContext)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ catalog-core (THIS CRATE) ★                       │   │
//! │  │   Entity trait • Product • Money • validation                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`entity`] - The identity contract every persisted type satisfies
//! - [`types`] - Domain types (Product)
//! - [`money`] - Money type with integer cents
//! - [`error`] - Domain error types
//! - [`validation`] - Payload validation rules

pub mod entity;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use entity::{Entity, EntityId};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;
