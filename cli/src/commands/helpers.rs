use anyhow::Result;
use serde::Serialize;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use rezept_core::ValidationError;
use rezept_core::models::{CategoryFilter, Recipe, RecipeQuery};

/// Turn the `list` filter flags into a query. clap already keeps them
/// mutually exclusive.
pub(crate) fn query_from_filters(
    category: Option<&str>,
    favorites: bool,
    ingredient: Option<&str>,
) -> Result<RecipeQuery> {
    if favorites {
        return Ok(RecipeQuery::Favorites);
    }
    if let Some(category) = category {
        let filter: CategoryFilter = category.parse()?;
        return Ok(filter.into());
    }
    if let Some(ingredient) = ingredient {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            return Err(ValidationError::EmptySearch.into());
        }
        return Ok(RecipeQuery::Ingredient(ingredient.to_string()));
    }
    Ok(RecipeQuery::All)
}

/// What to tell the user when a view has nothing in it.
pub(crate) fn empty_notice(query: &RecipeQuery) -> String {
    match query {
        RecipeQuery::All => {
            "No recipes yet. Add one with: rezept add <name> -i <ingredients> -d <description> -c <category>"
                .to_string()
        }
        RecipeQuery::Favorites => "No favorites yet".to_string(),
        RecipeQuery::Category(category) => format!("No {category} recipes"),
        RecipeQuery::Ingredient(text) => format!("No recipes with '{text}' found"),
    }
}

pub(crate) fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Fav")]
        favorite: String,
        #[tabled(rename = "Ingredients")]
        ingredients: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            name: truncate(&r.name, 30),
            category: r.category.to_string(),
            favorite: (if r.is_favorite { "★" } else { "" }).to_string(),
            ingredients: truncate(&r.ingredients, 40),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..1)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_recipe_detail(recipe: &Recipe) {
    let name = &recipe.name;
    let category = recipe.category;
    let favorite = if recipe.is_favorite { "  |  ★ Favorite" } else { "" };
    println!("=== {name} ===");
    println!("  ID: {}  |  Category: {category}{favorite}\n", recipe.id);

    println!("  INGREDIENTS:");
    for ingredient in split_ingredients(&recipe.ingredients) {
        println!("    - {ingredient}");
    }

    println!("\n  PREPARATION:");
    for line in recipe.description.lines() {
        println!("    {line}");
    }
}

/// Ingredients are comma separated by convention; blank pieces are dropped.
pub(crate) fn split_ingredients(ingredients: &str) -> Vec<&str> {
    ingredients
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Report a missing recipe and exit with status 2.
pub(crate) fn exit_not_found(id: i64, json: bool) -> ! {
    let message = format!("Recipe {id} not found");
    if json {
        println!("{}", json_error(&message));
    } else {
        eprintln!("{message}");
    }
    process::exit(2);
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rezept_core::models::Category;

    #[test]
    fn test_query_defaults_to_all() {
        assert_eq!(query_from_filters(None, false, None).unwrap(), RecipeQuery::All);
    }

    #[test]
    fn test_query_from_category() {
        assert_eq!(
            query_from_filters(Some("dessert"), false, None).unwrap(),
            RecipeQuery::Category(Category::Dessert)
        );
        assert_eq!(
            query_from_filters(Some("all"), false, None).unwrap(),
            RecipeQuery::All
        );
        assert!(query_from_filters(Some("brunch"), false, None).is_err());
    }

    #[test]
    fn test_query_from_favorites() {
        assert_eq!(
            query_from_filters(None, true, None).unwrap(),
            RecipeQuery::Favorites
        );
    }

    #[test]
    fn test_query_from_ingredient() {
        assert_eq!(
            query_from_filters(None, false, Some(" egg ")).unwrap(),
            RecipeQuery::Ingredient("egg".to_string())
        );
        assert!(query_from_filters(None, false, Some("  ")).is_err());
    }

    #[test]
    fn test_empty_notice() {
        assert_eq!(empty_notice(&RecipeQuery::Favorites), "No favorites yet");
        assert_eq!(
            empty_notice(&RecipeQuery::Ingredient("saffron".to_string())),
            "No recipes with 'saffron' found"
        );
        assert_eq!(
            empty_notice(&RecipeQuery::Category(Category::MainCourse)),
            "No Main Course recipes"
        );
    }

    #[test]
    fn test_split_ingredients() {
        assert_eq!(
            split_ingredients("flour, milk,,egg ,"),
            vec!["flour", "milk", "egg"]
        );
        assert!(split_ingredients(" , ").is_empty());
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Recipe 3 not found"), r#"{"error":"Recipe 3 not found"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème brûlée", 10), "Crème b...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }
}
