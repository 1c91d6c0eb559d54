//! Go Marketplace CLI - inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart list
//!
//! # Add a product (quantity starts at one, or grows by one if present)
//! gm-cart add --id 1 --title "Cadeira Rivatti" --image-url https://... --price 1400
//!
//! # Change a line's quantity
//! gm-cart increment 1
//! gm-cart decrement 1
//!
//! # Item count and subtotal
//! gm-cart summary
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_PATH` - Storage file (default: `.go-marketplace/storage.json`)
//! - `CART_STORAGE_KEY` - Cart slot key (default: `@GoMarketplace:cartProducts`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `RUST_LOG` - Log filter (logs go to stderr)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use go_marketplace_cart::CartConfig;
use go_marketplace_core::{Price, ProductId};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(version, about = "Go Marketplace cart tools")]
struct Cli {
    /// Storage file, overrides `CART_STORAGE_PATH`
    #[arg(long, global = true, value_parser = non_blank_path)]
    storage_path: Option<PathBuf>,

    /// Cart slot key, overrides `CART_STORAGE_KEY`
    #[arg(long, global = true, value_parser = non_blank)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Parse a flag value that must not be empty or whitespace.
fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(value.to_string())
}

fn non_blank_path(value: &str) -> Result<PathBuf, String> {
    non_blank(value).map(PathBuf::from)
}

#[derive(Subcommand)]
enum Commands {
    /// List cart lines in the order they were added
    List,
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Display title
        #[arg(long)]
        title: String,

        /// Display image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price, e.g. 19.99
        #[arg(long)]
        price: Price,
    },
    /// Increase a line's quantity by one
    Increment {
        /// Product ID
        id: ProductId,
    },
    /// Decrease a line's quantity by one (never removes the line)
    Decrement {
        /// Product ID
        id: ProductId,
    },
    /// Show item count and subtotal
    Summary,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to warnings only so command output stays readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cli=warn,go_marketplace_cart=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => apply_overrides(config, &cli),
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn apply_overrides(mut config: CartConfig, cli: &Cli) -> CartConfig {
    if let Some(path) = &cli.storage_path {
        config.storage_path.clone_from(path);
    }
    if let Some(key) = &cli.key {
        config.storage_key.clone_from(key);
    }
    config
}

async fn run(command: Commands, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cart = commands::cart::open(config).await?;

    match command {
        Commands::List => commands::cart::list(&cart).await,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let product = go_marketplace_core::Product {
                id,
                title,
                image_url,
                price,
            };
            commands::cart::add(&cart, product).await?;
        }
        Commands::Increment { id } => commands::cart::increment(&cart, &id).await?,
        Commands::Decrement { id } => commands::cart::decrement(&cart, &id).await?,
        Commands::Summary => commands::cart::summary(&cart).await,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "gm-cart", "add", "--id", "1", "--title", "Mug", "--price", "4.50",
        ])
        .unwrap();

        match cli.command {
            Commands::Add {
                id,
                title,
                image_url,
                price,
            } => {
                assert_eq!(id, "1");
                assert_eq!(title, "Mug");
                assert_eq!(image_url, "");
                assert_eq!(price, Price::from_cents(450));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_rejects_negative_price_and_blank_id() {
        assert!(
            Cli::try_parse_from(["gm-cart", "add", "--id", "1", "--title", "x", "--price", "-1"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["gm-cart", "increment", " "]).is_err());
    }

    #[test]
    fn test_overrides_replace_config() {
        let cli = Cli::try_parse_from([
            "gm-cart",
            "--storage-path",
            "/tmp/other.json",
            "--key",
            "@Other:cart",
            "list",
        ])
        .unwrap();

        let config = apply_overrides(CartConfig::default(), &cli);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/other.json"));
        assert_eq!(config.storage_key, "@Other:cart");
    }

    #[test]
    fn test_blank_overrides_rejected() {
        assert!(Cli::try_parse_from(["gm-cart", "--key", "", "list"]).is_err());
        assert!(Cli::try_parse_from(["gm-cart", "--key", "  ", "list"]).is_err());
        assert!(Cli::try_parse_from(["gm-cart", "--storage-path", "", "list"]).is_err());

        let cli = Cli::try_parse_from(["gm-cart", "list"]).unwrap();
        assert_eq!(apply_overrides(CartConfig::default(), &cli), CartConfig::default());
    }
}
