//! # SQL Repository
//!
//! [`Repository`] implementation backed by a [`DataContext`].

use async_trait::async_trait;
use catalog_core::EntityId;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

use crate::context::{DataContext, SaveSummary, Tracked};
use crate::error::DbResult;
use crate::repository::Repository;
use crate::table::{self, Table};

/// Repository for one entity type, borrowed from a data context.
///
/// ## Usage
/// ```rust,ignore
/// let ctx = db.context();
/// let products = ctx.set::<Product>();
///
/// let tracked = products.add(Product::new("A", Money::from_cents(100)));
/// products.save().await?;
/// let id = tracked.id();
/// ```
pub struct SqlRepository<'c, T> {
    ctx: &'c DataContext,
    _entity: PhantomData<fn() -> T>,
}

impl<'c, T: Table> SqlRepository<'c, T> {
    /// Creates a repository bound to `ctx`.
    pub fn new(ctx: &'c DataContext) -> Self {
        SqlRepository {
            ctx,
            _entity: PhantomData,
        }
    }

    /// Counts persisted rows.
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(self.ctx.pool())
            .await?;

        Ok(count)
    }
}

impl<T> fmt::Debug for SqlRepository<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlRepository")
            .field("entity", &std::any::type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<'c, T: Table> Repository<T> for SqlRepository<'c, T> {
    async fn all(&self) -> DbResult<Vec<T>> {
        let sql = table::select_all_sql::<T>();
        let rows = sqlx::query_as::<_, T>(&sql)
            .fetch_all(self.ctx.pool())
            .await?;

        debug!(entity = T::NAME, count = rows.len(), "Loaded all rows");
        Ok(rows)
    }

    async fn find(&self, id: EntityId) -> DbResult<Option<T>> {
        let sql = table::select_by_id_sql::<T>();
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.ctx.pool())
            .await?;

        debug!(entity = T::NAME, id = id, found = row.is_some(), "Lookup by id");
        Ok(row)
    }

    fn add(&self, entity: T) -> Tracked<T> {
        self.ctx.stage_insert(entity)
    }

    fn update(&self, entity: T) {
        self.ctx.stage_update(entity)
    }

    fn remove(&self, entity: T) {
        self.ctx.stage_delete(entity)
    }

    async fn save(&self) -> DbResult<SaveSummary> {
        self.ctx.save().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use catalog_core::{Money, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn insert(db: &Database, name: &str, cents: i64) -> Product {
        let ctx = db.context();
        let tracked = ctx.set::<Product>().add(Product::new(name, Money::from_cents(cents)));
        ctx.save().await.unwrap();
        tracked.get().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_added_entity_is_found_after_save() {
        let db = test_db().await;
        let saved = insert(&db, "A", 100).await;

        let ctx = db.context();
        let found = ctx.set::<Product>().find(saved.id).await.unwrap().unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.name, "A");
        assert_eq!(found.price, Money::from_cents(100));
        assert!(found.created_at > chrono::DateTime::<chrono::Utc>::default());
    }

    #[tokio::test]
    async fn test_find_missing_is_absence() {
        let db = test_db().await;
        let ctx = db.context();

        assert!(ctx.set::<Product>().find(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_then_find_is_absence() {
        let db = test_db().await;
        let saved = insert(&db, "A", 100).await;

        let ctx = db.context();
        let products = ctx.set::<Product>();
        products.remove(saved.clone());
        products.save().await.unwrap();

        assert!(products.find(saved.id).await.unwrap().is_none());
        assert_eq!(products.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_replaces_state_and_stamps() {
        let db = test_db().await;
        let saved = insert(&db, "A", 100).await;

        let ctx = db.context();
        let products = ctx.set::<Product>();
        let mut changed = saved.clone();
        changed.name = "B".to_string();
        changed.price = Money::from_cents(250);
        products.update(changed);
        let summary = products.save().await.unwrap();
        assert_eq!(summary.updated, 1);

        let found = products.find(saved.id).await.unwrap().unwrap();
        assert_eq!(found.name, "B");
        assert_eq!(found.price, Money::from_cents(250));
        assert_eq!(found.created_at, saved.created_at);
        assert!(found.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn test_all_orders_by_id() {
        let db = test_db().await;
        let first = insert(&db, "Zeta", 1).await;
        let second = insert(&db, "Alpha", 2).await;

        let ctx = db.context();
        let ids: Vec<i64> = ctx
            .set::<Product>()
            .all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let db = test_db().await;
        let ctx = db.context();
        let repo: &dyn Repository<Product> = &ctx.set::<Product>();

        let tracked = repo.add(Product::new("Dyn", Money::from_cents(5)));
        repo.save().await.unwrap();

        assert_eq!(repo.find(tracked.id().unwrap()).await.unwrap().unwrap().name, "Dyn");
    }

    #[tokio::test]
    async fn test_repositories_share_one_unit_of_work() {
        let db = test_db().await;
        let ctx = db.context();

        ctx.set::<Product>().add(Product::new("A", Money::from_cents(1)));
        ctx.set::<Product>().add(Product::new("B", Money::from_cents(2)));
        assert_eq!(ctx.pending_count(), 2);

        // Saving through either repository commits both
        let summary = ctx.set::<Product>().save().await.unwrap();
        assert_eq!(summary.inserted, 2);
    }
}
