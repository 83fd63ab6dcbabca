//! Larder - recipes from what is in your pantry
//!
//! Runs the HTTP backend or browses the catalog from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use larder::browser::RecipeBrowser;
use larder::catalog::{self, CategoryFilter, MealDbClient, RecipeCatalog};
use larder::config::Config;
use larder::matching::{normalize_name, similarity, IngredientMatcher, NormalizedPantry, ViewKind};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP backend for the mobile app
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Recipes you can start on, fewest missing ingredients first
    Menu(ViewArgs),
    /// Every recipe, annotated with what you already have
    Explore(ViewArgs),
    /// Check whether one ingredient counts as available
    Check {
        ingredient: String,
        /// Pantry ingredients, comma separated
        #[arg(short, long, value_delimiter = ',')]
        pantry: Vec<String>,
    },
    /// Print the similarity score of two ingredient names
    Similarity { a: String, b: String },
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Pantry ingredients, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pantry: Vec<String>,

    /// all, western, healthy, category:<name> or a cuisine area
    #[arg(short, long, default_value = "all")]
    category: String,

    /// Recipe name prefix
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only fetch recipes starting with this letter instead of the whole catalog
    #[arg(long)]
    letter: Option<char>,

    #[arg(short, long, default_value_t = 20)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🥕 Larder v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server_port = port;
            }
            larder::server::run(config).await
        }
        Command::Menu(args) => print_view(&config, args, ViewKind::Menu).await,
        Command::Explore(args) => print_view(&config, args, ViewKind::Explore).await,
        Command::Check { ingredient, pantry } => {
            let matcher = IngredientMatcher::new(config.match_threshold);
            let pantry = NormalizedPantry::from_names(&pantry);
            let available = matcher.is_available(&ingredient, &pantry);
            match matcher.best_match(&ingredient, &pantry) {
                Some((name, score)) => println!(
                    "{}: {} (closest '{}', score {:.3}, threshold {})",
                    normalize_name(&ingredient),
                    if available { "available" } else { "missing" },
                    name,
                    score,
                    matcher.threshold()
                ),
                None => println!("{}: missing (empty pantry)", normalize_name(&ingredient)),
            }
            Ok(())
        }
        Command::Similarity { a, b } => {
            let (a, b) = (normalize_name(&a), normalize_name(&b));
            if a.is_empty() || b.is_empty() {
                anyhow::bail!("Both names must be non-empty after normalization");
            }
            println!("{:.3}", similarity(&a, &b));
            Ok(())
        }
    }
}

async fn print_view(config: &Config, args: ViewArgs, kind: ViewKind) -> Result<()> {
    let client = MealDbClient::new(config)?;
    let recipes = match args.letter {
        Some(letter) => client.list_by_letter(letter).await,
        None => catalog::fetch_all(&client).await,
    };
    info!("📚 {} recipes fetched", recipes.len());

    let filter: CategoryFilter = args.category.parse().unwrap_or_default();
    let selector = filter.resolve(&client, config).await;

    let browser = RecipeBrowser::new(
        recipes,
        args.pantry,
        IngredientMatcher::new(config.match_threshold),
    );
    let view = browser.view(kind, &selector, &args.search);

    if view.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    for recipe in view.iter().take(args.limit) {
        let area = recipe.recipe.area.as_deref().unwrap_or("-");
        match recipe.missing_label() {
            Some(label) => println!("{} [{}] | {}", recipe.recipe.name, area, label),
            None => println!("{} [{}]", recipe.recipe.name, area),
        }
    }
    if view.len() > args.limit {
        println!("... and {} more", view.len() - args.limit);
    }
    Ok(())
}
