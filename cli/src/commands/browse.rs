use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};

use rezept_core::Error;
use rezept_core::browser::RecipeBrowser;
use rezept_core::models::{CategoryFilter, NewRecipe, Recipe};
use rezept_core::repository::RecipeRepository;

use super::helpers::{empty_notice, print_recipe_detail, print_recipe_table};

/// One line typed at the browse prompt.
#[derive(Debug, PartialEq)]
enum BrowseCommand {
    All,
    Favorites,
    Category(CategoryFilter),
    Search(String),
    Show(i64),
    Toggle(i64),
    Delete(i64),
    Add(NewRecipe),
    Help,
    Quit,
}

fn parse_id(arg: &str) -> Result<i64> {
    arg.parse()
        .with_context(|| format!("Expected a recipe id, got '{arg}'"))
}

impl FromStr for BrowseCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_lowercase().as_str() {
            "all" | "a" => Self::All,
            "favorites" | "fav" | "f" => Self::Favorites,
            "category" | "cat" | "c" => Self::Category(rest.parse()?),
            "search" | "s" => Self::Search(rest.to_string()),
            "show" | "v" => Self::Show(parse_id(rest)?),
            "toggle" | "t" => Self::Toggle(parse_id(rest)?),
            "delete" | "rm" => Self::Delete(parse_id(rest)?),
            "add" => {
                let parts: Vec<&str> = rest.split('|').collect();
                let [name, ingredients, description, category] = parts[..] else {
                    bail!("Usage: add <name> | <ingredients> | <description> | <category>");
                };
                let category = category.parse()?;
                Self::Add(NewRecipe::new(name, ingredients, description, category)?)
            }
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(anyhow!("Unknown command '{other}'. Type 'help' for a list")),
        };
        Ok(command)
    }
}

fn print_help() {
    println!("Commands:");
    println!("  all                    show every recipe");
    println!("  favorites              show favorites only");
    println!("  category <name|all>    filter by category");
    println!("  search <text>          find recipes by ingredient");
    println!("  show <id>              print one recipe in full");
    println!("  toggle <id>            mark or unmark as favorite");
    println!("  delete <id>            delete a recipe");
    println!("  add <name> | <ingredients> | <description> | <category>");
    println!("  quit                   leave");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn render(browser: &RecipeBrowser, recipes: &[Recipe]) {
    let mode = browser.mode();
    println!("\n-- {mode} ({}) --", recipes.len());
    if recipes.is_empty() {
        println!("{}", empty_notice(mode));
    } else {
        print_recipe_table(recipes);
    }
}

enum Event {
    View(Option<Vec<Recipe>>),
    Input(Option<String>),
}

/// Interactive list. The table is redrawn whenever the current view's
/// contents change, including after the user's own edits.
pub(crate) async fn cmd_browse(repo: RecipeRepository) -> Result<()> {
    let mut browser = RecipeBrowser::new(repo);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    loop {
        let event = tokio::select! {
            view = browser.next_view() => Event::View(view?),
            line = lines.next_line() => Event::Input(line?),
        };

        match event {
            Event::View(Some(recipes)) => {
                render(&browser, &recipes);
                prompt();
            }
            Event::View(None) | Event::Input(None) => break,
            Event::Input(Some(line)) => {
                if line.trim().is_empty() {
                    prompt();
                    continue;
                }
                let command = match line.parse::<BrowseCommand>() {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{e:#}");
                        prompt();
                        continue;
                    }
                };
                if command == BrowseCommand::Quit {
                    break;
                }
                if let Err(e) = apply(&mut browser, command).await {
                    eprintln!("{e:#}");
                }
                prompt();
            }
        }
    }

    println!();
    Ok(())
}

async fn apply(browser: &mut RecipeBrowser, command: BrowseCommand) -> Result<()> {
    match command {
        BrowseCommand::All => browser.show_all(),
        BrowseCommand::Favorites => browser.show_favorites(),
        BrowseCommand::Category(filter) => browser.select_category(filter),
        BrowseCommand::Search(text) => browser.search_ingredient(&text)?,
        BrowseCommand::Show(id) => {
            let recipe = browser.repository().get(id).await?;
            print_recipe_detail(&recipe);
            // Leaving the detail view lands back on the full list.
            browser.reset();
        }
        BrowseCommand::Toggle(id) => {
            let recipe = browser.toggle_favorite(id).await?;
            let name = &recipe.name;
            if recipe.is_favorite {
                println!("Added {name} to favorites");
            } else {
                println!("Removed {name} from favorites");
            }
        }
        BrowseCommand::Delete(id) => {
            if !browser.delete_recipe(id).await? {
                return Err(Error::NotFound(id).into());
            }
            println!("Deleted recipe {id}");
        }
        BrowseCommand::Add(recipe) => {
            let recipe = browser.add_recipe(recipe).await?;
            println!("Saved recipe: {} (id: {})", recipe.name, recipe.id);
        }
        BrowseCommand::Help => print_help(),
        BrowseCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rezept_core::ValidationError;
    use rezept_core::models::{Category, RecipeQuery};

    async fn seeded() -> (RecipeBrowser, Recipe) {
        let repo = RecipeRepository::open_in_memory().unwrap();
        let pancakes = repo
            .insert(NewRecipe::new("Pancakes", "flour,milk,egg", "fry", Category::Breakfast).unwrap())
            .await
            .unwrap();
        repo.insert(NewRecipe::new("Tiramisu", "mascarpone,egg", "chill", Category::Dessert).unwrap())
            .await
            .unwrap();
        (RecipeBrowser::new(repo), pancakes)
    }

    fn core_error(err: &anyhow::Error) -> &Error {
        err.downcast_ref::<Error>().expect("not a core error")
    }

    #[test]
    fn test_parse_view_switches() {
        assert_eq!("all".parse::<BrowseCommand>().unwrap(), BrowseCommand::All);
        assert_eq!("  F ".parse::<BrowseCommand>().unwrap(), BrowseCommand::Favorites);
        assert_eq!(
            "category main course".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Category(CategoryFilter::Only(Category::MainCourse))
        );
        assert_eq!(
            "cat all".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Category(CategoryFilter::All)
        );
        assert_eq!(
            "search  goat cheese ".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Search("goat cheese".to_string())
        );
    }

    #[test]
    fn test_parse_id_commands() {
        assert_eq!("show 4".parse::<BrowseCommand>().unwrap(), BrowseCommand::Show(4));
        assert_eq!("t 7".parse::<BrowseCommand>().unwrap(), BrowseCommand::Toggle(7));
        assert_eq!("rm 2".parse::<BrowseCommand>().unwrap(), BrowseCommand::Delete(2));
        assert!("delete pancakes".parse::<BrowseCommand>().is_err());
        assert!("show".parse::<BrowseCommand>().is_err());
    }

    #[test]
    fn test_parse_add() {
        let command = "add Pancakes | flour, milk, egg | Mix and fry | breakfast"
            .parse::<BrowseCommand>()
            .unwrap();
        let expected =
            NewRecipe::new("Pancakes", "flour, milk, egg", "Mix and fry", Category::Breakfast)
                .unwrap();
        assert_eq!(command, BrowseCommand::Add(expected));
    }

    #[test]
    fn test_parse_add_rejects_bad_input() {
        assert!("add Pancakes | flour".parse::<BrowseCommand>().is_err());
        assert!("add Pancakes |  | Mix | breakfast".parse::<BrowseCommand>().is_err());
        assert!("add Pancakes | flour | Mix | brunch".parse::<BrowseCommand>().is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = "cook 3".parse::<BrowseCommand>().unwrap_err();
        assert!(err.to_string().contains("Unknown command 'cook'"));
        assert_eq!("q".parse::<BrowseCommand>().unwrap(), BrowseCommand::Quit);
    }

    #[tokio::test]
    async fn test_show_returns_to_all() {
        let (mut browser, pancakes) = seeded().await;
        browser.search_ingredient("mascarpone").unwrap();

        apply(&mut browser, BrowseCommand::Show(pancakes.id)).await.unwrap();
        assert_eq!(browser.mode(), &RecipeQuery::All);
    }

    #[tokio::test]
    async fn test_show_missing_keeps_view() {
        let (mut browser, _) = seeded().await;
        browser.show_favorites();

        let err = apply(&mut browser, BrowseCommand::Show(999)).await.unwrap_err();
        assert!(matches!(core_error(&err), Error::NotFound(999)));
        assert_eq!(browser.mode(), &RecipeQuery::Favorites);
    }

    #[tokio::test]
    async fn test_delete_missing_is_reported() {
        let (mut browser, _) = seeded().await;
        let err = apply(&mut browser, BrowseCommand::Delete(999)).await.unwrap_err();
        assert!(matches!(core_error(&err), Error::NotFound(999)));
        assert_eq!(browser.mode(), &RecipeQuery::All);
    }

    #[tokio::test]
    async fn test_delete_resets_to_all() {
        let (mut browser, pancakes) = seeded().await;
        browser.select_category(CategoryFilter::Only(Category::Breakfast));

        apply(&mut browser, BrowseCommand::Delete(pancakes.id)).await.unwrap();
        assert_eq!(browser.mode(), &RecipeQuery::All);
        let rows = browser.next_view().await.unwrap().unwrap();
        assert!(rows.iter().all(|r| r.id != pancakes.id));
    }

    #[tokio::test]
    async fn test_toggle_keeps_filter() {
        let (mut browser, pancakes) = seeded().await;
        let breakfast = RecipeQuery::Category(Category::Breakfast);
        browser.select_category(CategoryFilter::Only(Category::Breakfast));

        apply(&mut browser, BrowseCommand::Toggle(pancakes.id)).await.unwrap();
        assert_eq!(browser.mode(), &breakfast);
        assert!(browser.repository().get(pancakes.id).await.unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_empty_search_keeps_view() {
        let (mut browser, _) = seeded().await;
        browser.show_favorites();

        let err = apply(&mut browser, BrowseCommand::Search("  ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(
            core_error(&err),
            Error::Validation(ValidationError::EmptySearch)
        ));
        assert_eq!(browser.mode(), &RecipeQuery::Favorites);
    }

    #[tokio::test]
    async fn test_add_returns_to_all() {
        let (mut browser, _) = seeded().await;
        browser.show_favorites();
        let granola = NewRecipe::new("Granola", "oats,honey", "bake", Category::Snack).unwrap();

        apply(&mut browser, BrowseCommand::Add(granola)).await.unwrap();
        assert_eq!(browser.mode(), &RecipeQuery::All);
        let rows = browser.next_view().await.unwrap().unwrap();
        assert!(rows.iter().any(|r| r.name == "Granola"));
    }
}
