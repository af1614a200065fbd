//! CLI administration tool for link-app.
//!
//! Performs database maintenance and link operations without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection and link counts
//! cargo run --bin admin -- db check
//!
//! # Delete expired links
//! cargo run --bin admin -- purge
//!
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Resolve a short code
//! cargo run --bin admin -- resolve aB3_x9
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `link_app::config`. Caching is always disabled here.

use link_app::application::services::{LinkError, LinkService};
use link_app::config::{self, Config};
use link_app::domain::repositories::LinkRepository;
use link_app::infrastructure::cache::NullCache;
use link_app::infrastructure::persistence::PgLinkRepository;
use link_app::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-app.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Delete expired links
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Create a short link
    Shorten {
        /// Absolute http(s) URL to shorten
        url: String,
    },

    /// Look up the original URL for a short code
    Resolve {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show link counts
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Purge { yes } => purge(&pool, yes).await?,
        Commands::Shorten { url } => shorten(&config, &pool, &url).await?,
        Commands::Resolve { code } => resolve(&config, &pool, &code).await?,
    }

    Ok(())
}

fn repository(pool: &PgPool) -> Arc<PgLinkRepository> {
    Arc::new(PgLinkRepository::new(Arc::new(pool.clone())))
}

/// Builds the same service the server uses, minus the cache.
fn link_service(config: &Config, pool: &PgPool) -> LinkService {
    LinkService::with_policy(
        repository(pool),
        Arc::new(NullCache::new()),
        config.link_policy(),
    )
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => check_database(pool).await,
    }
}

/// Verifies connectivity and prints live and expired link counts.
async fn check_database(pool: &PgPool) -> Result<()> {
    println!("{}", "🔍 Checking database connection...".bright_blue());

    let repo = repository(pool);

    if !repo.health_check().await {
        println!("{}", "❌ Database connection failed".red().bold());
        anyhow::bail!("database is not reachable");
    }

    println!("{}", "✅ Database connection successful!".green().bold());
    println!();

    let (live, expired) = repo
        .count_by_state()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!("  {:<20} {}", "Live links:", live.to_string().cyan());
    println!(
        "  {:<20} {}",
        "Expired (unpurged):",
        expired.to_string().bright_black()
    );
    println!();

    Ok(())
}

/// Deletes expired rows after confirmation.
async fn purge(pool: &PgPool, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Links".bright_blue().bold());
    println!();

    let repo = repository(pool);

    let (_, expired) = repo
        .count_by_state()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    if expired == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!("  Expired links: {}", expired.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .purge_expired()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted".green().bold(),
        format!("{deleted} expired link(s)").bright_white()
    );
    println!();

    Ok(())
}

/// Creates a short link and prints it.
async fn shorten(config: &Config, pool: &PgPool, url: &str) -> Result<()> {
    let service = link_service(config, pool);

    let link = service
        .create_short_url(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    let short_url = format!("{}/{}", config.base_url.trim_end_matches('/'), link.code);

    println!("{}", "✨ Short link created".green().bold());
    println!();
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!("  Short URL: {}", short_url.cyan());
    println!("  Target:    {}", link.long_url.bright_white());
    if let Some(expires_at) = link.expires_at {
        println!(
            "  Expires:   {}",
            expires_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .bright_black()
        );
    }
    println!();

    Ok(())
}

/// Resolves a code and prints the original URL.
async fn resolve(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    let service = link_service(config, pool);

    match service.get_original_url(code).await {
        Ok(long_url) => {
            println!("  {} → {}", code.bright_yellow(), long_url.cyan());
            Ok(())
        }
        Err(LinkError::NotFound(_)) => {
            println!("{}", format!("⚠️  No live link for '{code}'").yellow());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to resolve code: {}", e)),
    }
}
