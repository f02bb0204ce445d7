use anyhow::{Context, Result};
use std::path::Path;

use rezept_core::models::ExportData;
use rezept_core::repository::RecipeRepository;

pub(crate) async fn cmd_export(repo: &RecipeRepository, output: Option<&Path>) -> Result<()> {
    let data = repo.export_all().await?;
    let contents = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            let count = data.recipes.len();
            eprintln!("Exported {count} recipes to {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

pub(crate) async fn cmd_import(repo: &RecipeRepository, file: &Path, json: bool) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let data: ExportData = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid export file: {}", file.display()))?;

    let summary = repo.import_all(data).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let inserted = summary.recipes_inserted;
        let replaced = summary.recipes_replaced;
        println!("Imported {inserted} new recipes, replaced {replaced} existing");
    }
    Ok(())
}
