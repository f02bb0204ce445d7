use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Free-form, comma separated by convention.
    pub ingredients: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Recipe {
    /// Check the text invariants of a full row before it is written back.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("ingredients", &self.ingredients)?;
        require("description", &self.description)?;
        Ok(())
    }

    /// The same recipe with surrounding whitespace removed from its text
    /// fields, as [`NewRecipe::new`] stores them.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ingredients: self.ingredients.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }

    /// The same recipe with the favorite flag flipped.
    #[must_use]
    pub fn with_favorite_toggled(&self) -> Self {
        Self {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

/// A recipe that has not been stored yet.
///
/// Build it with [`NewRecipe::new`] to get trimmed, non-empty fields; storage
/// trusts whatever it is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: String,
    pub description: String,
    pub category: Category,
}

impl NewRecipe {
    pub fn new(
        name: &str,
        ingredients: &str,
        description: &str,
        category: Category,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require("name", name)?.to_string(),
            ingredients: require("ingredients", ingredients)?.to_string(),
            description: require("description", description)?.to_string(),
            category,
        })
    }
}

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed)
}

// --- Categories ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    #[serde(rename = "Main Course")]
    MainCourse,
    Dessert,
    Snack,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 4] = [
        Category::Breakfast,
        Category::MainCourse,
        Category::Dessert,
        Category::Snack,
    ];

    /// The label stored in the `category` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::MainCourse => "Main Course",
            Category::Dessert => "Dessert",
            Category::Snack => "Snack",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient parse for user input: case-insensitive, `-` and `_` count as spaces.
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| ValidationError::UnknownCategory(s.trim().to_string()))
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        Category::from_label(label).ok_or_else(|| {
            FromSqlError::Other(Box::new(ValidationError::UnknownCategory(
                label.to_string(),
            )))
        })
    }
}

/// The category picker value. `All` is only ever used for filtering and is
/// never stored on a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "all" | "all categories" => Ok(CategoryFilter::All),
            _ => s.parse().map(CategoryFilter::Only),
        }
    }
}

// --- Queries ---

/// The four canned reads over the recipe table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecipeQuery {
    #[default]
    All,
    Favorites,
    Category(Category),
    /// Recipes whose ingredient text contains the given substring.
    Ingredient(String),
}

impl From<CategoryFilter> for RecipeQuery {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => RecipeQuery::All,
            CategoryFilter::Only(category) => RecipeQuery::Category(category),
        }
    }
}

impl fmt::Display for RecipeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeQuery::All => f.write_str("all recipes"),
            RecipeQuery::Favorites => f.write_str("favorites"),
            RecipeQuery::Category(category) => write!(f, "category {category}"),
            RecipeQuery::Ingredient(text) => write!(f, "recipes with '{text}'"),
        }
    }
}

// --- Export / Import types ---

pub const EXPORT_VERSION: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub version: i64,
    pub exported_at: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub recipes_inserted: i64,
    pub recipes_replaced: i64,
}
