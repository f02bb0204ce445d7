//! Live query subscriptions.
//!
//! Every write through [`crate::repository::RecipeRepository`] bumps a version
//! counter on a `watch` channel. A [`LiveQuery`] holds a receiver on that
//! channel and re-runs its query whenever the version moves, so the holder is
//! handed a fresh ordered list without asking for one.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Recipe, RecipeQuery};

pub(crate) type SharedDatabase = Arc<Mutex<Database>>;

/// Run a storage call on the blocking pool.
pub(crate) async fn with_db<T, F>(db: &SharedDatabase, f: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || {
        let db = db
            .lock()
            .map_err(|_| Error::Unavailable("database lock poisoned".to_string()))?;
        f(&db)
    })
    .await
    .map_err(|e| Error::Unavailable(e.to_string()))?
}

/// One subscribed query. Dropping it unsubscribes.
pub struct LiveQuery {
    query: RecipeQuery,
    db: SharedDatabase,
    changes: watch::Receiver<u64>,
    // Set until the current table version has been delivered.
    stale: bool,
}

impl LiveQuery {
    pub(crate) fn new(
        query: RecipeQuery,
        db: SharedDatabase,
        changes: watch::Receiver<u64>,
    ) -> Self {
        Self {
            query,
            db,
            changes,
            stale: true,
        }
    }

    #[must_use]
    pub fn query(&self) -> &RecipeQuery {
        &self.query
    }

    /// Wait for the next result list.
    ///
    /// The first call returns the current rows straight away. Later calls
    /// wait until the table changes. Several writes in a row may be folded
    /// into a single delivery of the latest state. Returns `None` once the
    /// repository that produced this subscription is gone.
    ///
    /// Cancel-safe: dropping the future before it resolves loses nothing,
    /// the next call delivers instead.
    pub async fn next(&mut self) -> Result<Option<Vec<Recipe>>> {
        if !self.stale {
            if self.changes.changed().await.is_err() {
                return Ok(None);
            }
            self.stale = true;
        }
        self.changes.borrow_and_update();

        let query = self.query.clone();
        let rows = with_db(&self.db, move |db| db.list_recipes(&query)).await?;
        self.stale = false;
        tracing::debug!(query = %self.query, rows = rows.len(), "live query delivered");
        Ok(Some(rows))
    }
}
