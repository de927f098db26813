//! # Data Context (Unit of Work)
//!
//! Tracks staged changes and commits them as one transaction.
//!
//! ## Change Tracking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Request, One Unit of Work                        │
//! │                                                                         │
//! │  let ctx = db.context();                                               │
//! │  let products = ctx.set::<Product>();                                  │
//! │                                                                         │
//! │  products.add(a)     ──► tracker: [Insert(a)]                           │
//! │  products.update(b)  ──► tracker: [Insert(a), Update(b)]                │
//! │  products.remove(c)  ──► tracker: [Insert(a), Update(b), Delete(c)]     │
//! │                           (nothing has touched SQLite yet)              │
//! │                                                                         │
//! │  ctx.save()                                                            │
//! │    BEGIN                                                               │
//! │      INSERT a  RETURNING *                                             │
//! │      UPDATE b  RETURNING *    ← no row? NotFound, ROLLBACK             │
//! │      DELETE c                 ← no row? NotFound, ROLLBACK             │
//! │    COMMIT                     ← only now is anything durable           │
//! │                                                                         │
//! │  tracker: []   Tracked<a> now holds a with its assigned id             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! A failed save rolls the transaction back and leaves the staged changes in
//! the tracker. The caller may fix the cause and save again, or call
//! [`DataContext::discard_changes`]. The context never retries on its own.
//!
//! ## Conflicts
//! There is no optimistic concurrency check. Updates are last-writer-wins;
//! the only conflict detected is an update or delete that matches no row.

use async_trait::async_trait;
use catalog_core::EntityId;
use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::sql::SqlRepository;
use crate::table::{self, Table};

// =============================================================================
// Staged Changes
// =============================================================================

/// The kind of a staged change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change waiting for `save`.
///
/// `apply` runs inside the save transaction; `commit` runs only after the
/// transaction committed, so a rolled-back insert never resolves its
/// [`Tracked`] handle.
#[async_trait]
trait StagedChange: Send + Sync {
    fn kind(&self) -> ChangeKind;

    fn entity_name(&self) -> &'static str;

    fn entity_id(&self) -> EntityId;

    async fn apply(&self, conn: &mut SqliteConnection) -> DbResult<()>;

    fn commit(&self) {}
}

struct Insert<T: Table> {
    entity: T,
    returned: Mutex<Option<T>>,
    slot: Arc<OnceLock<T>>,
}

#[async_trait]
impl<T: Table> StagedChange for Insert<T> {
    fn kind(&self) -> ChangeKind {
        ChangeKind::Insert
    }

    fn entity_name(&self) -> &'static str {
        T::NAME
    }

    fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    async fn apply(&self, conn: &mut SqliteConnection) -> DbResult<()> {
        let sql = table::insert_sql::<T>();
        let row = self
            .entity
            .bind_insert(sqlx::query_as::<_, T>(&sql))
            .fetch_one(&mut *conn)
            .await?;

        *lock(&self.returned) = Some(row);
        Ok(())
    }

    fn commit(&self) {
        if let Some(row) = lock(&self.returned).take() {
            // A handle is resolved at most once; a change leaves the
            // tracker on its first successful commit.
            let _ = self.slot.set(row);
        }
    }
}

struct Update<T: Table> {
    entity: T,
}

#[async_trait]
impl<T: Table> StagedChange for Update<T> {
    fn kind(&self) -> ChangeKind {
        ChangeKind::Update
    }

    fn entity_name(&self) -> &'static str {
        T::NAME
    }

    fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    async fn apply(&self, conn: &mut SqliteConnection) -> DbResult<()> {
        let sql = table::update_sql::<T>();
        let row = self
            .entity
            .bind_update(sqlx::query_as::<_, T>(&sql))
            .bind(self.entity.id())
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(_) => Ok(()),
            None => Err(DbError::not_found(T::NAME, self.entity.id())),
        }
    }
}

struct Delete<T: Table> {
    entity: T,
}

#[async_trait]
impl<T: Table> StagedChange for Delete<T> {
    fn kind(&self) -> ChangeKind {
        ChangeKind::Delete
    }

    fn entity_name(&self) -> &'static str {
        T::NAME
    }

    fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    async fn apply(&self, conn: &mut SqliteConnection) -> DbResult<()> {
        let sql = table::delete_sql::<T>();
        let result = sqlx::query(&sql)
            .bind(self.entity.id())
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(T::NAME, self.entity.id()));
        }

        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tracked Handle
// =============================================================================

/// Handle to an entity staged for insertion.
///
/// Empty until the owning context saves successfully; afterwards it holds
/// the row as persisted, including the store-assigned id.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    slot: Arc<OnceLock<T>>,
}

impl<T: Table> Tracked<T> {
    /// The persisted entity, once saved.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// The store-assigned id, once saved.
    pub fn id(&self) -> Option<EntityId> {
        self.get().map(|entity| entity.id())
    }

    /// Whether the insert has been committed.
    pub fn is_saved(&self) -> bool {
        self.slot.get().is_some()
    }
}

// =============================================================================
// Save Summary
// =============================================================================

/// What a successful `save` committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    /// Total number of rows written.
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    /// Whether the save wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Insert => self.inserted += 1,
            ChangeKind::Update => self.updated += 1,
            ChangeKind::Delete => self.deleted += 1,
        }
    }
}

// =============================================================================
// Data Context
// =============================================================================

/// Unit of work over a shared connection pool.
///
/// Create one per request with [`Database::context`](crate::Database::context)
/// and borrow repositories from it with [`DataContext::set`].
pub struct DataContext {
    pool: SqlitePool,
    tracker: Mutex<Vec<Box<dyn StagedChange>>>,
}

impl std::fmt::Debug for DataContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataContext")
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl DataContext {
    /// Creates an empty unit of work.
    pub fn new(pool: SqlitePool) -> Self {
        DataContext {
            pool,
            tracker: Mutex::new(Vec::new()),
        }
    }

    /// The repository for entity type `T`, bound to this context.
    pub fn set<T: Table>(&self) -> SqlRepository<'_, T> {
        SqlRepository::new(self)
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of staged changes.
    pub fn pending_count(&self) -> usize {
        lock(&self.tracker).len()
    }

    /// Whether anything is staged.
    pub fn has_changes(&self) -> bool {
        self.pending_count() > 0
    }

    /// Drops every staged change without touching the store.
    pub fn discard_changes(&self) {
        let dropped = mem::take(&mut *lock(&self.tracker));
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Discarded staged changes");
        }
    }

    pub(crate) fn stage_insert<T: Table>(&self, mut entity: T) -> Tracked<T> {
        entity.on_added(Utc::now());
        debug!(entity = T::NAME, "Staging insert");

        let slot = Arc::new(OnceLock::new());
        self.stage(Box::new(Insert {
            entity,
            returned: Mutex::new(None),
            slot: Arc::clone(&slot),
        }));

        Tracked { slot }
    }

    pub(crate) fn stage_update<T: Table>(&self, mut entity: T) {
        entity.on_modified(Utc::now());
        debug!(entity = T::NAME, id = entity.id(), "Staging update");
        self.stage(Box::new(Update { entity }));
    }

    pub(crate) fn stage_delete<T: Table>(&self, entity: T) {
        debug!(entity = T::NAME, id = entity.id(), "Staging delete");
        self.stage(Box::new(Delete { entity }));
    }

    fn stage(&self, change: Box<dyn StagedChange>) {
        lock(&self.tracker).push(change);
    }

    /// Commits every staged change atomically, in staging order.
    ///
    /// ## Returns
    /// * `Ok(SaveSummary)` - All changes committed; tracker is empty
    /// * `Err(DbError)` - Nothing committed; staged changes are kept
    pub async fn save(&self) -> DbResult<SaveSummary> {
        let changes = mem::take(&mut *lock(&self.tracker));

        if changes.is_empty() {
            debug!("Save called with no staged changes");
            return Ok(SaveSummary::default());
        }

        match self.apply_all(&changes).await {
            Ok(summary) => {
                for change in &changes {
                    change.commit();
                }
                info!(
                    inserted = summary.inserted,
                    updated = summary.updated,
                    deleted = summary.deleted,
                    "Unit of work committed"
                );
                Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, pending = changes.len(), "Unit of work rolled back");
                // Keep the failed changes ahead of anything staged meanwhile
                let mut tracker = lock(&self.tracker);
                let staged_since = mem::replace(&mut *tracker, changes);
                tracker.extend(staged_since);
                Err(err)
            }
        }
    }

    async fn apply_all(&self, changes: &[Box<dyn StagedChange>]) -> DbResult<SaveSummary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut summary = SaveSummary::default();

        for change in changes {
            debug!(
                kind = ?change.kind(),
                entity = change.entity_name(),
                id = change.entity_id(),
                "Applying staged change"
            );
            // Dropping `tx` on error rolls the transaction back
            change.apply(&mut *tx).await?;
            summary.record(change.kind());
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
