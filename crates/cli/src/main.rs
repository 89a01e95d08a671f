//! Amarine CLI - catalog maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog file
//! amarine catalog check crates/storefront/data/catalog.json
//!
//! # List products, cheapest first
//! amarine catalog list crates/storefront/data/catalog.json --sort price-asc
//!
//! # Search beginner flower patterns
//! amarine catalog list catalog.json --q rose --difficulty beginner --category flowers
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use amarine_core::{CategoryId, Difficulty};
use amarine_storefront::catalog::{CatalogQuery, SortOrder};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "amarine")]
#[command(author, version, about = "Amarine storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect catalog files
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate a catalog file and print a summary
    Check {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
    /// List products matching filters
    List {
        /// Path to the catalog JSON file
        path: PathBuf,

        /// Text to find in product names and descriptions
        #[arg(long)]
        q: Option<String>,

        /// Difficulty levels to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        difficulty: Vec<Difficulty>,

        /// Category ids to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        category: Vec<String>,

        /// Result ordering
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Newest,
    PriceAsc,
    PriceDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::PriceAsc => Self::PriceAsc,
            SortArg::PriceDesc => Self::PriceDesc,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amarine_cli=info,amarine_storefront=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(&path)?,
            CatalogAction::List {
                path,
                q,
                difficulty,
                category,
                sort,
            } => {
                let query = CatalogQuery {
                    text: q,
                    difficulties: difficulty,
                    categories: category.into_iter().map(CategoryId::from).collect(),
                    sort: sort.into(),
                };
                commands::catalog::list(&path, &query)?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_list_filters() {
        let cli = Cli::parse_from([
            "amarine",
            "catalog",
            "list",
            "catalog.json",
            "--difficulty",
            "beginner,advanced",
            "--sort",
            "price-desc",
        ]);
        let Commands::Catalog {
            action: CatalogAction::List {
                difficulty, sort, ..
            },
        } = cli.command
        else {
            panic!("expected catalog list");
        };
        assert_eq!(difficulty, [Difficulty::Beginner, Difficulty::Advanced]);
        assert!(matches!(sort, SortArg::PriceDesc));
    }
}
