//! # Table Mapping
//!
//! Maps an [`Entity`] onto one SQLite table so the generic repository can
//! build its statements without knowing the concrete type.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Table::TABLE            "products"                                    │
//! │  Table::INSERT_COLUMNS   name, price_cents, created_at, updated_at     │
//! │  Table::UPDATE_COLUMNS   name, price_cents, updated_at                 │
//! │                                                                         │
//! │  INSERT INTO products (name, price_cents, ...) VALUES (?, ?, ...)      │
//! │      RETURNING *                                  ← bind_insert()      │
//! │  UPDATE products SET name = ?, ... WHERE id = ?                        │
//! │      RETURNING *                                  ← bind_update()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `id` is never part of either column list: SQLite assigns it on insert
//! and it selects the row on update.

use catalog_core::{Entity, Product};
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

/// Insert/update statement with `RETURNING *`, decoded as `T`.
pub type ReturningQuery<'q, T> = QueryAs<'q, Sqlite, T, SqliteArguments<'q>>;

/// SQL mapping for an entity type.
pub trait Table: Entity + for<'r> FromRow<'r, SqliteRow> + Unpin {
    /// Table name.
    const TABLE: &'static str;

    /// Columns written on insert, in bind order.
    const INSERT_COLUMNS: &'static [&'static str];

    /// Columns written on update, in bind order.
    const UPDATE_COLUMNS: &'static [&'static str];

    /// Binds one value per `INSERT_COLUMNS` entry.
    fn bind_insert<'q>(&'q self, query: ReturningQuery<'q, Self>) -> ReturningQuery<'q, Self>;

    /// Binds one value per `UPDATE_COLUMNS` entry. The id is bound after.
    fn bind_update<'q>(&'q self, query: ReturningQuery<'q, Self>) -> ReturningQuery<'q, Self>;
}

// =============================================================================
// Statement Builders
// =============================================================================

pub(crate) fn select_all_sql<T: Table>() -> String {
    format!("SELECT * FROM {} ORDER BY id", T::TABLE)
}

pub(crate) fn select_by_id_sql<T: Table>() -> String {
    format!("SELECT * FROM {} WHERE id = ?", T::TABLE)
}

pub(crate) fn insert_sql<T: Table>() -> String {
    let placeholders = vec!["?"; T::INSERT_COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        T::TABLE,
        T::INSERT_COLUMNS.join(", "),
        placeholders
    )
}

pub(crate) fn update_sql<T: Table>() -> String {
    let assignments = T::UPDATE_COLUMNS
        .iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = ? RETURNING *",
        T::TABLE,
        assignments
    )
}

pub(crate) fn delete_sql<T: Table>() -> String {
    format!("DELETE FROM {} WHERE id = ?", T::TABLE)
}

// =============================================================================
// Product
// =============================================================================

impl Table for Product {
    const TABLE: &'static str = "products";

    const INSERT_COLUMNS: &'static [&'static str] =
        &["name", "price_cents", "created_at", "updated_at"];

    const UPDATE_COLUMNS: &'static [&'static str] = &["name", "price_cents", "updated_at"];

    fn bind_insert<'q>(&'q self, query: ReturningQuery<'q, Self>) -> ReturningQuery<'q, Self> {
        query
            .bind(self.name.as_str())
            .bind(self.price)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn bind_update<'q>(&'q self, query: ReturningQuery<'q, Self>) -> ReturningQuery<'q, Self> {
        query
            .bind(self.name.as_str())
            .bind(self.price)
            .bind(self.updated_at)
    }
}
