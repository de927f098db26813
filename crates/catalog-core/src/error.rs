//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core (this file)                                              │
//! │  ├── CoreError        - Domain errors                                  │
//! │  └── ValidationError  - Payload validation failures                    │
//! │                                                                         │
//! │  catalog-db                                                            │
//! │  └── DbError          - Store failures, propagated as-is               │
//! │                                                                         │
//! │  catalog-api                                                           │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! │        DbError ─────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::entity::EntityId;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised before anything reaches the store.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The identifier in the request path and in the body disagree.
    #[error("Path id {path_id} does not match body id {body_id}")]
    IdMismatch {
        path_id: EntityId,
        body_id: EntityId,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. a non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
