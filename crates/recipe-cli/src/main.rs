//! Recipe catalogue CLI.
//!
//! Provides the `recipes` binary, which runs the same `RecipeService` as the
//! HTTP server directly against a SQLite database file. Results are printed
//! as JSON on stdout; errors go to stderr.
//!
//! Exit codes: 0 = success, 1 = invalid input or storage failure,
//! 2 = the addressed ingredient or recipe does not exist.

use std::process;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use recipe_core::{IngredientChange, IngredientId, RecipeFields, RecipeId, RecipeType, SearchCriteria};
use recipe_server::service::RecipeService;
use recipe_storage::{StorageError, Store};

/// Manage ingredients and recipes.
#[derive(Parser)]
#[command(name = "recipes", about = "Manage ingredients and recipes")]
struct Cli {
    /// Path to the recipe database file.
    #[arg(long, global = true, default_value = "recipes.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingredient operations.
    #[command(subcommand)]
    Ingredient(IngredientCommand),
    /// Recipe operations.
    #[command(subcommand)]
    Recipe(RecipeCommand),
}

#[derive(Subcommand)]
enum IngredientCommand {
    /// Create an ingredient.
    Add { name: String },
    /// List ingredients by id.
    List(PageArgs),
    /// Delete an ingredient, detaching it from every recipe.
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// Create a recipe.
    Add(RecipeArgs),
    /// Show one recipe with its ingredients.
    Show { id: i64 },
    /// List recipes by id.
    List(PageArgs),
    /// Overwrite a recipe. Without --ingredient or --clear-ingredients the
    /// ingredient set is kept.
    Update {
        id: i64,
        #[command(flatten)]
        recipe: RecipeArgs,
        /// Remove every ingredient from the recipe.
        #[arg(long, conflicts_with = "ingredient")]
        clear_ingredients: bool,
    },
    /// Delete a recipe.
    Delete { id: i64 },
    /// Search recipes; results are ordered by name.
    Search(SearchArgs),
}

#[derive(Args)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
}

#[derive(Args)]
struct RecipeArgs {
    #[arg(long)]
    name: String,
    /// VEGETARIAN, NON_VEGETARIAN or OTHER.
    #[arg(long = "type")]
    recipe_type: RecipeType,
    #[arg(long)]
    servings: u32,
    #[arg(long)]
    instructions: String,
    /// Ingredient id to attach; repeat for several.
    #[arg(long)]
    ingredient: Vec<i64>,
}

impl RecipeArgs {
    fn fields(&self) -> RecipeFields {
        RecipeFields {
            name: self.name.clone(),
            recipe_type: self.recipe_type,
            number_of_servings: self.servings,
            instructions: self.instructions.clone(),
        }
    }

    fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredient.iter().copied().map(IngredientId).collect()
    }
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    vegetarian: Option<bool>,
    #[arg(long)]
    servings: Option<u32>,
    #[arg(long)]
    include_ingredient: Option<String>,
    /// Accepted for compatibility with the HTTP API; does not filter.
    #[arg(long)]
    exclude_ingredient: Option<String>,
    #[arg(long)]
    instruction: Option<String>,
    #[command(flatten)]
    page: PageArgs,
}

impl SearchArgs {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            vegetarian: self.vegetarian,
            servings: self.servings,
            instruction: self.instruction.clone(),
            include_ingredient: self.include_ingredient.clone(),
            exclude_ingredient: self.exclude_ingredient.clone(),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut service = match RecipeService::open(&cli.db) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(1);
        }
    };

    match execute(&mut service, cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    }
}

/// Maps a failure to the process exit code.
fn exit_code(err: &StorageError) -> i32 {
    match err {
        StorageError::NotFound { .. } => 2,
        _ => 1,
    }
}

/// Pretty-prints a result. A serialization failure becomes a JSON error
/// object on stdout rather than a storage error.
fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e))
}

/// Runs one subcommand and returns the JSON text to print.
fn execute<S: Store>(service: &mut RecipeService<S>, command: Commands) -> Result<String, StorageError> {
    match command {
        Commands::Ingredient(command) => match command {
            IngredientCommand::Add { name } => {
                let id = service.create_ingredient(&name)?;
                Ok(pretty(&json!({ "id": id })))
            }
            IngredientCommand::List(PageArgs { page, size }) => {
                Ok(pretty(&service.list_ingredients(page, size)?))
            }
            IngredientCommand::Delete { id } => {
                service.delete_ingredient(IngredientId(id))?;
                Ok(pretty(&json!({ "success": true })))
            }
        },
        Commands::Recipe(command) => match command {
            RecipeCommand::Add(recipe) => {
                let ids = recipe.ingredient_ids();
                let id = service.create_recipe(&recipe.fields(), Some(ids.as_slice()))?;
                Ok(pretty(&json!({ "id": id })))
            }
            RecipeCommand::Show { id } => Ok(pretty(&service.get_recipe(RecipeId(id))?)),
            RecipeCommand::List(PageArgs { page, size }) => {
                Ok(pretty(&service.list_recipes(page, size)?))
            }
            RecipeCommand::Update {
                id,
                recipe,
                clear_ingredients,
            } => {
                let change = if clear_ingredients {
                    IngredientChange::Replace(Vec::new())
                } else if recipe.ingredient.is_empty() {
                    IngredientChange::Keep
                } else {
                    IngredientChange::Replace(recipe.ingredient_ids())
                };
                let updated = service.update_recipe(RecipeId(id), &recipe.fields(), &change)?;
                Ok(pretty(&updated))
            }
            RecipeCommand::Delete { id } => {
                service.delete_recipe(RecipeId(id))?;
                Ok(pretty(&json!({ "success": true })))
            }
            RecipeCommand::Search(search) => {
                let found = service.search_recipes(
                    &search.criteria(),
                    search.page.page,
                    search.page.size,
                )?;
                Ok(pretty(&found))
            }
        },
    }
}
