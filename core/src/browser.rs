//! View state for a recipe list screen.
//!
//! [`RecipeBrowser`] owns what the list is currently showing: one mode and the
//! single live subscription that backs it. Switching modes drops the previous
//! subscription before the new one is read.

use crate::error::{Result, ValidationError};
use crate::live::LiveQuery;
use crate::models::{CategoryFilter, NewRecipe, Recipe, RecipeQuery};
use crate::repository::RecipeRepository;

pub struct RecipeBrowser {
    repo: RecipeRepository,
    current: LiveQuery,
}

impl RecipeBrowser {
    /// Start on the full recipe list.
    pub fn new(repo: RecipeRepository) -> Self {
        let current = repo.all_recipes();
        Self { repo, current }
    }

    #[must_use]
    pub fn mode(&self) -> &RecipeQuery {
        self.current.query()
    }

    #[must_use]
    pub fn repository(&self) -> &RecipeRepository {
        &self.repo
    }

    /// Next list for the current mode. See [`LiveQuery::next`].
    pub async fn next_view(&mut self) -> Result<Option<Vec<Recipe>>> {
        self.current.next().await
    }

    fn switch(&mut self, query: RecipeQuery) {
        tracing::debug!(from = %self.current.query(), to = %query, "switching view");
        // Replacing the field drops the old subscription.
        self.current = self.repo.subscribe(query);
    }

    pub fn show_all(&mut self) {
        self.switch(RecipeQuery::All);
    }

    /// Back to the unfiltered list, as when returning to the list screen.
    pub fn reset(&mut self) {
        self.show_all();
    }

    pub fn show_favorites(&mut self) {
        self.switch(RecipeQuery::Favorites);
    }

    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.switch(filter.into());
    }

    /// Empty input leaves the current view alone.
    pub fn search_ingredient(&mut self, input: &str) -> Result<()> {
        let ingredient = input.trim();
        if ingredient.is_empty() {
            return Err(ValidationError::EmptySearch.into());
        }
        self.switch(RecipeQuery::Ingredient(ingredient.to_string()));
        Ok(())
    }

    /// Flip the favorite flag of the stored row and write the whole row back.
    ///
    /// The view mode does not change; the live query picks up the write.
    pub async fn toggle_favorite(&self, id: i64) -> Result<Recipe> {
        let updated = self.repo.toggle_favorite(id).await?;
        tracing::debug!(id, is_favorite = updated.is_favorite, "toggled favorite");
        Ok(updated)
    }

    pub async fn add_recipe(&mut self, recipe: NewRecipe) -> Result<Recipe> {
        let recipe = self.repo.insert(recipe).await?;
        self.reset();
        Ok(recipe)
    }

    /// Trim, validate, then replace the stored row. Returns what was stored.
    pub async fn edit_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        let recipe = recipe.trimmed();
        recipe.validate()?;
        self.repo.update(recipe.clone()).await?;
        Ok(recipe)
    }

    pub async fn delete_recipe(&mut self, id: i64) -> Result<bool> {
        let deleted = self.repo.delete(id).await?;
        self.reset();
        Ok(deleted)
    }
}
