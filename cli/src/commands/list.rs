use anyhow::Result;
use std::process;

use rezept_core::models::RecipeQuery;
use rezept_core::repository::RecipeRepository;

use super::helpers::{empty_notice, print_recipe_table};

pub(crate) async fn cmd_list(repo: &RecipeRepository, query: RecipeQuery, json: bool) -> Result<()> {
    let recipes = repo.snapshot(query.clone()).await?;

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("{}", empty_notice(&query));
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }

    Ok(())
}
