//! GoMarketplace CLI - inspect and edit the persisted storefront cart.
//!
//! Commands:
//! - `gomarket list` - Show cart contents and totals
//! - `gomarket add` - Add one unit of a product
//! - `gomarket increment` / `decrement` - Adjust an item's quantity
//! - `gomarket remove` - Drop an item
//! - `gomarket clear` - Empty the cart
//! - `gomarket config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AddArgs, ClearArgs, ConfigArgs, ItemArgs};

/// GoMarketplace CLI - manage the storefront cart
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cart contents
    List,

    /// Add one unit of a product to the cart
    Add(AddArgs),

    /// Add one unit to an item in the cart
    Increment(ItemArgs),

    /// Remove one unit from an item in the cart
    Decrement(ItemArgs),

    /// Drop an item from the cart
    Remove(ItemArgs),

    /// Empty the cart
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "gomarket_cart=debug,gomarket_storage=debug,gomarket_cli=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    // Setup output formatting
    let output = output::Output::new(cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::List => commands::cart::list(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Increment(args) => commands::cart::increment(args, &ctx).await,
        Commands::Decrement(args) => commands::cart::decrement(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Clear(args) => commands::cart::clear(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "gomarket", "--json", "add", "--id", "p1", "--title", "Shirt", "--price", "10",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.id, "p1");
                assert_eq!(args.title, "Shirt");
                assert_eq!(args.image_url, "");
                assert_eq!(args.price, 10.0);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_parse_decrement() {
        let cli = Cli::try_parse_from(["gomarket", "decrement", "p1", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Decrement(ItemArgs { ref id }) if id == "p1"));
    }
}
