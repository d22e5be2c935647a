//! Venus Gecko CLI - browse the catalog and run admin actions from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the for-sale tab in English, newest first
//! venus --lang en catalog
//!
//! # Breeders of one morph, re-rendered on every change
//! venus catalog --tab breeder --morph m1 --watch
//!
//! # Open a record and walk up its lineage
//! venus show g42 --step sire --step dam
//!
//! # Admin actions (credentials from VENUS_ADMIN_EMAIL / VENUS_ADMIN_PASSWORD)
//! venus admin gecko add --name Luna --morph m1 --price 350000 --photo luna.jpg
//! venus admin gecko toggle g42
//! venus admin morph add --ko "릴리 화이트" --en "Lilly White"
//! ```
//!
//! # Commands
//!
//! - `catalog` - Render the catalog sections for a selection
//! - `show` - Render the details view of one record
//! - `landing` - Render the landing page summary
//! - `morphs` - List morph definitions in manager order
//! - `admin` - Sign in and mutate records, morphs and settings

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use venus_gecko_core::{Filter, GeckoId, Gender, Language, MorphId, SortOption, Status};

mod commands;

use commands::admin::{AdminArgs, AdminAction};
use commands::browse::Step;

#[derive(Parser)]
#[command(name = "venus")]
#[command(author, version, about = "Venus Gecko catalog tools")]
struct Cli {
    /// Display language (`ko` or `en`); defaults to `VENUS_LANGUAGE`
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the catalog
    Catalog {
        /// Tab to show (`available`, `breeder`, `sold`)
        #[arg(long, default_value = "available")]
        tab: Status,

        /// Morph id, or `All`
        #[arg(long, default_value = "All")]
        morph: Filter<MorphId>,

        /// Sire id, or `All`
        #[arg(long, default_value = "All")]
        sire: Filter<GeckoId>,

        /// Dam id, or `All`
        #[arg(long, default_value = "All")]
        dam: Filter<GeckoId>,

        /// Gender (`male`, `female`, `unknown`), or `All`
        #[arg(long, default_value = "All")]
        gender: Filter<Gender>,

        /// Sort order (`dateDesc`, `dateAsc`, `priceDesc`, `priceAsc`);
        /// anything else leaves the catalog order unchanged
        #[arg(long, default_value = "dateDesc", value_parser = parse_sort)]
        sort: SortOption,

        /// Keep running and re-render on every change
        #[arg(long)]
        watch: bool,
    },
    /// Render the details view of one record
    Show {
        /// Gecko id
        id: String,

        /// Navigation steps applied in order (`sire`, `dam`, `back`, `next`, `prev`)
        #[arg(long = "step", value_enum)]
        steps: Vec<Step>,
    },
    /// Render the landing page summary
    Landing,
    /// List morph definitions
    Morphs,
    /// Admin actions (requires sign-in)
    Admin {
        #[command(flatten)]
        credentials: AdminArgs,

        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Unknown sort literals fall back to `Unsorted`, like a stale stored preference.
#[allow(clippy::unnecessary_wraps)]
fn parse_sort(s: &str) -> Result<SortOption, std::convert::Infallible> {
    Ok(SortOption::from_literal(s))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("venus_gecko_storefront=info,venus_gecko_cli=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut app) = commands::connect(cli.lang).await? else {
        return Ok(());
    };

    match cli.command {
        Commands::Catalog {
            tab,
            morph,
            sire,
            dam,
            gender,
            sort,
            watch,
        } => {
            let selection = app.selection_mut();
            selection.tab = tab;
            selection.morph = morph;
            selection.sire = sire;
            selection.dam = dam;
            selection.gender = gender;
            selection.sort = sort;
            commands::browse::catalog(&mut app, watch).await?;
        }
        Commands::Show { id, steps } => commands::browse::show(&mut app, &id, &steps)?,
        Commands::Landing => commands::browse::landing(&app),
        Commands::Morphs => commands::browse::morphs(&app),
        Commands::Admin {
            credentials,
            action,
        } => {
            commands::admin::sign_in(&app, &credentials).await?;
            commands::admin::run(&mut app, action).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog_sort(args: &[&str]) -> SortOption {
        let cli = Cli::try_parse_from(["venus", "catalog"].iter().chain(args).copied()).unwrap();
        match cli.command {
            Commands::Catalog { sort, .. } => sort,
            _ => panic!("expected the catalog command"),
        }
    }

    #[test]
    fn test_sort_defaults_to_newest_first() {
        assert_eq!(catalog_sort(&[]), SortOption::DateDesc);
        assert_eq!(catalog_sort(&["--sort", "priceAsc"]), SortOption::PriceAsc);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_unsorted() {
        assert_eq!(catalog_sort(&["--sort", "bogus"]), SortOption::Unsorted);
        assert_eq!(catalog_sort(&["--sort", ""]), SortOption::Unsorted);
    }
}
