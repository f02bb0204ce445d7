mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_add, cmd_browse, cmd_delete, cmd_edit, cmd_export, cmd_favorite, cmd_import, cmd_list,
    cmd_show, query_from_filters,
};
use crate::config::Config;
use rezept_core::repository::RecipeRepository;

#[derive(Parser)]
#[command(
    name = "rezept",
    version,
    about = "A small recipe manager",
    long_about = "A small, local-first recipe manager.\n\n\
        Keep your recipes in one place, filter them by category, find them by\n\
        ingredient and mark the ones you cook again and again."
)]
struct Cli {
    /// Path to the recipe database (default: per-user data directory)
    #[arg(long, global = true, env = "REZEPT_DB", value_name = "PATH")]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new recipe
    Add {
        /// Recipe name
        name: String,
        /// Ingredients, comma separated (e.g. "flour, milk, egg")
        #[arg(short, long)]
        ingredients: String,
        /// Preparation steps
        #[arg(short, long)]
        description: String,
        /// Category: breakfast, main-course, dessert, snack
        #[arg(short, long)]
        category: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recipes, optionally filtered
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe in full
    Show {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a recipe (every field not given is kept)
    Edit {
        /// Recipe ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New ingredients
        #[arg(long)]
        ingredients: Option<String>,
        /// New preparation steps
        #[arg(long)]
        description: Option<String>,
        /// New category: breakfast, main-course, dessert, snack
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark or unmark a recipe as favorite
    Favorite {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive recipe list that updates as you change it
    Browse,
    /// Export all recipes as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import recipes from a JSON export
    Import {
        /// Path to the export file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Only recipes in this category ("all" for every category)
    #[arg(long, conflicts_with_all = ["favorites", "ingredient"])]
    category: Option<String>,
    /// Only favorite recipes
    #[arg(long, conflicts_with = "ingredient")]
    favorites: bool,
    /// Only recipes whose ingredients contain this text
    #[arg(long)]
    ingredient: Option<String>,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr so `--json` output on stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("REZEPT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    let repo = RecipeRepository::open(&config.db_path).with_context(|| {
        format!("Failed to open database: {}", config.db_path.display())
    })?;
    tracing::info!(path = %config.db_path.display(), "opened recipe database");

    match cli.command {
        Commands::Add {
            name,
            ingredients,
            description,
            category,
            json,
        } => cmd_add(&repo, &name, &ingredients, &description, &category, json).await,
        Commands::List { filter, json } => {
            let query = query_from_filters(
                filter.category.as_deref(),
                filter.favorites,
                filter.ingredient.as_deref(),
            )?;
            cmd_list(&repo, query, json).await
        }
        Commands::Show { id, json } => cmd_show(&repo, id, json).await,
        Commands::Edit {
            id,
            name,
            ingredients,
            description,
            category,
            json,
        } => {
            cmd_edit(
                &repo,
                id,
                name.as_deref(),
                ingredients.as_deref(),
                description.as_deref(),
                category.as_deref(),
                json,
            )
            .await
        }
        Commands::Favorite { id, json } => cmd_favorite(&repo, id, json).await,
        Commands::Delete { id, json } => cmd_delete(&repo, id, json).await,
        Commands::Browse => cmd_browse(repo).await,
        Commands::Export { output } => cmd_export(&repo, output.as_deref()).await,
        Commands::Import { file, json } => cmd_import(&repo, &file, json).await,
    }
}
