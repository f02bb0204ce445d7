use std::path::Path;

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{Error, Result};
use crate::models::{
    Category, EXPORT_VERSION, ExportData, ImportSummary, NewRecipe, Recipe, RecipeQuery,
};

const RECIPE_COLUMNS: &str = "id, name, ingredients, description, category, is_favorite";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.migrate()?;
        tracing::debug!("opened recipe database at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            tracing::info!("creating recipe schema (version 1)");
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    ingredients TEXT NOT NULL,
                    description TEXT NOT NULL,
                    category TEXT NOT NULL
                        CHECK (category IN ('Breakfast', 'Main Course', 'Dessert', 'Snack')),
                    is_favorite INTEGER NOT NULL DEFAULT 0 CHECK (is_favorite IN (0, 1))
                );

                CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name);
                CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // Expects columns in RECIPE_COLUMNS order.
    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            ingredients: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            is_favorite: row.get(5)?,
        })
    }

    fn query_recipes(&self, filter: &str, params: impl rusqlite::Params) -> Result<Vec<Recipe>> {
        let sql = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes {filter} ORDER BY name COLLATE BINARY ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let recipes = stmt
            .query_map(params, Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    // --- Writes ---

    pub fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        self.conn.execute(
            "INSERT INTO recipes (name, ingredients, description, category, is_favorite)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![
                recipe.name,
                recipe.ingredients,
                recipe.description,
                recipe.category,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, name = %recipe.name, "inserted recipe");
        Ok(Recipe {
            id,
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.clone(),
            description: recipe.description.clone(),
            category: recipe.category,
            is_favorite: false,
        })
    }

    /// Replace every column of the row with `recipe.id`.
    pub fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE recipes
             SET name = ?1, ingredients = ?2, description = ?3, category = ?4, is_favorite = ?5
             WHERE id = ?6",
            params![
                recipe.name,
                recipe.ingredients,
                recipe.description,
                recipe.category,
                recipe.is_favorite,
                recipe.id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(recipe.id));
        }
        tracing::debug!(id = recipe.id, "updated recipe");
        Ok(())
    }

    /// Returns `false` when there was no such recipe. That is not an error:
    /// deleting twice is fine.
    pub fn delete_recipe(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        tracing::debug!(id, deleted = changed > 0, "delete recipe");
        Ok(changed > 0)
    }

    // --- Reads ---

    pub fn get_recipe(&self, id: i64) -> Result<Recipe> {
        self.conn
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"),
                params![id],
                Self::recipe_from_row,
            )
            .optional()?
            .ok_or(Error::NotFound(id))
    }

    pub fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        self.query_recipes("", [])
    }

    pub fn get_favorite_recipes(&self) -> Result<Vec<Recipe>> {
        self.query_recipes("WHERE is_favorite = 1", [])
    }

    pub fn get_recipes_by_category(&self, category: Category) -> Result<Vec<Recipe>> {
        self.query_recipes("WHERE category = ?1", params![category])
    }

    /// Substring match on the ingredient text. `%` and `_` in `ingredient`
    /// match literally. ASCII letters match case-insensitively (SQLite `LIKE`).
    pub fn search_by_ingredient(&self, ingredient: &str) -> Result<Vec<Recipe>> {
        let escaped = ingredient
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        self.query_recipes("WHERE ingredients LIKE ?1 ESCAPE '\\'", params![pattern])
    }

    pub fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        match query {
            RecipeQuery::All => self.get_all_recipes(),
            RecipeQuery::Favorites => self.get_favorite_recipes(),
            RecipeQuery::Category(category) => self.get_recipes_by_category(*category),
            RecipeQuery::Ingredient(text) => self.search_by_ingredient(text),
        }
    }

    // --- Export / Import ---

    pub fn export_all(&self) -> Result<ExportData> {
        Ok(ExportData {
            version: EXPORT_VERSION,
            exported_at: Local::now().to_rfc3339(),
            recipes: self.get_all_recipes()?,
        })
    }

    /// Rows whose id already exists are replaced, the rest are inserted with
    /// their exported id. Nothing is written unless the format version is
    /// supported and every recipe is valid.
    pub fn import_all(&self, data: &ExportData) -> Result<ImportSummary> {
        if data.version > EXPORT_VERSION {
            return Err(Error::UnsupportedVersion {
                found: data.version,
                supported: EXPORT_VERSION,
            });
        }
        for recipe in &data.recipes {
            recipe.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        let mut summary = ImportSummary::default();
        for recipe in &data.recipes {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM recipes WHERE id = ?1",
                    params![recipe.id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if exists {
                self.update_recipe(recipe)?;
                summary.recipes_replaced += 1;
            } else {
                tx.execute(
                    "INSERT INTO recipes (id, name, ingredients, description, category, is_favorite)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        recipe.id,
                        recipe.name,
                        recipe.ingredients,
                        recipe.description,
                        recipe.category,
                        recipe.is_favorite,
                    ],
                )?;
                summary.recipes_inserted += 1;
            }
        }
        tx.commit()?;

        tracing::info!(
            inserted = summary.recipes_inserted,
            replaced = summary.recipes_replaced,
            "imported recipes"
        );
        Ok(summary)
    }
}
