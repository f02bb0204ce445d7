use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::db::Database;
use crate::error::Result;
use crate::live::{LiveQuery, SharedDatabase, with_db};
use crate::models::{Category, ExportData, ImportSummary, NewRecipe, Recipe, RecipeQuery};

/// Async front door to the recipe table.
///
/// Cheap to clone; every clone shares one connection and one change feed.
/// Writes run on the blocking pool, so awaiting them never stalls the calling
/// task. Awaiting writes one after another applies them in that order.
#[derive(Clone)]
pub struct RecipeRepository {
    db: SharedDatabase,
    changes: Arc<watch::Sender<u64>>,
}

impl RecipeRepository {
    pub fn new(db: Database) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(changes),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    // --- Live reads ---

    pub fn all_recipes(&self) -> LiveQuery {
        self.subscribe(RecipeQuery::All)
    }

    pub fn favorite_recipes(&self) -> LiveQuery {
        self.subscribe(RecipeQuery::Favorites)
    }

    pub fn recipes_by_category(&self, category: Category) -> LiveQuery {
        self.subscribe(RecipeQuery::Category(category))
    }

    pub fn search_by_ingredient(&self, ingredient: &str) -> LiveQuery {
        self.subscribe(RecipeQuery::Ingredient(ingredient.to_string()))
    }

    pub fn subscribe(&self, query: RecipeQuery) -> LiveQuery {
        LiveQuery::new(query, Arc::clone(&self.db), self.changes.subscribe())
    }

    /// Number of live subscriptions currently alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }

    // --- Writes ---
    //
    // The change feed is bumped inside the blocking call, right after the row
    // is written. A caller that stops awaiting still gets its write announced.

    pub async fn insert(&self, recipe: NewRecipe) -> Result<Recipe> {
        let changes = Arc::clone(&self.changes);
        with_db(&self.db, move |db| {
            let recipe = db.insert_recipe(&recipe)?;
            notify(&changes);
            Ok(recipe)
        })
        .await
    }

    /// Full-row replace. Fails with [`crate::Error::NotFound`] when the id
    /// no longer exists.
    pub async fn update(&self, recipe: Recipe) -> Result<()> {
        let changes = Arc::clone(&self.changes);
        with_db(&self.db, move |db| {
            db.update_recipe(&recipe)?;
            notify(&changes);
            Ok(())
        })
        .await
    }

    /// Returns whether a row was removed; an absent id is a no-op.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let changes = Arc::clone(&self.changes);
        with_db(&self.db, move |db| {
            let deleted = db.delete_recipe(id)?;
            if deleted {
                notify(&changes);
            }
            Ok(deleted)
        })
        .await
    }

    /// Read the stored row, flip `is_favorite` and write the full row back,
    /// all under one lock.
    pub async fn toggle_favorite(&self, id: i64) -> Result<Recipe> {
        let changes = Arc::clone(&self.changes);
        with_db(&self.db, move |db| {
            let updated = db.get_recipe(id)?.with_favorite_toggled();
            db.update_recipe(&updated)?;
            notify(&changes);
            Ok(updated)
        })
        .await
    }

    // --- One-shot reads ---

    pub async fn get(&self, id: i64) -> Result<Recipe> {
        with_db(&self.db, move |db| db.get_recipe(id)).await
    }

    pub async fn snapshot(&self, query: RecipeQuery) -> Result<Vec<Recipe>> {
        with_db(&self.db, move |db| db.list_recipes(&query)).await
    }

    // --- Export / Import ---

    pub async fn export_all(&self) -> Result<ExportData> {
        with_db(&self.db, Database::export_all).await
    }

    pub async fn import_all(&self, data: ExportData) -> Result<ImportSummary> {
        let changes = Arc::clone(&self.changes);
        with_db(&self.db, move |db| {
            let summary = db.import_all(&data)?;
            if summary.recipes_inserted + summary.recipes_replaced > 0 {
                notify(&changes);
            }
            Ok(summary)
        })
        .await
    }
}

fn notify(changes: &watch::Sender<u64>) {
    changes.send_modify(|version| *version = version.wrapping_add(1));
}
