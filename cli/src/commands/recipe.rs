use anyhow::{Result, bail};

use rezept_core::Error;
use rezept_core::models::{Category, NewRecipe, Recipe};
use rezept_core::repository::RecipeRepository;

use super::helpers::{exit_not_found, print_recipe_detail};

pub(crate) async fn cmd_add(
    repo: &RecipeRepository,
    name: &str,
    ingredients: &str,
    description: &str,
    category: &str,
    json: bool,
) -> Result<()> {
    let category: Category = category.parse()?;
    let recipe = NewRecipe::new(name, ingredients, description, category)?;
    let recipe = repo.insert(recipe).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let name = &recipe.name;
        let id = recipe.id;
        println!("Saved recipe: {name} (id: {id})");
    }
    Ok(())
}

async fn fetch(repo: &RecipeRepository, id: i64, json: bool) -> Result<Recipe> {
    match repo.get(id).await {
        Ok(recipe) => Ok(recipe),
        Err(Error::NotFound(_)) => exit_not_found(id, json),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn cmd_show(repo: &RecipeRepository, id: i64, json: bool) -> Result<()> {
    let recipe = fetch(repo, id, json).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        print_recipe_detail(&recipe);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn cmd_edit(
    repo: &RecipeRepository,
    id: i64,
    name: Option<&str>,
    ingredients: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    if name.is_none() && ingredients.is_none() && description.is_none() && category.is_none() {
        bail!(
            "Nothing to update. Provide at least one of --name, --ingredients, --description, or --category"
        );
    }

    let mut recipe = fetch(repo, id, json).await?;
    if let Some(name) = name {
        recipe.name = name.to_string();
    }
    if let Some(ingredients) = ingredients {
        recipe.ingredients = ingredients.to_string();
    }
    if let Some(description) = description {
        recipe.description = description.to_string();
    }
    if let Some(category) = category {
        recipe.category = category.parse()?;
    }
    let recipe = recipe.trimmed();
    recipe.validate()?;

    match repo.update(recipe.clone()).await {
        Ok(()) => {}
        Err(Error::NotFound(_)) => exit_not_found(id, json),
        Err(e) => return Err(e.into()),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let name = &recipe.name;
        println!("Updated recipe {id}: {name}");
    }
    Ok(())
}

pub(crate) async fn cmd_favorite(repo: &RecipeRepository, id: i64, json: bool) -> Result<()> {
    let recipe = match repo.toggle_favorite(id).await {
        Ok(recipe) => recipe,
        Err(Error::NotFound(_)) => exit_not_found(id, json),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let name = &recipe.name;
        if recipe.is_favorite {
            println!("Added {name} to favorites");
        } else {
            println!("Removed {name} from favorites");
        }
    }
    Ok(())
}

pub(crate) async fn cmd_delete(repo: &RecipeRepository, id: i64, json: bool) -> Result<()> {
    if repo.delete(id).await? {
        if json {
            println!("{}", serde_json::json!({ "deleted": id }));
        } else {
            println!("Deleted recipe {id}");
        }
        Ok(())
    } else {
        exit_not_found(id, json)
    }
}
