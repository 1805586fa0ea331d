//! CLI administration tool for link-resolver.
//!
//! Inspects and manages short links directly against the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Visit statistics for one link
//! cargo run --bin admin -- stats aZ3k9Q
//!
//! # Totals across all links
//! cargo run --bin admin -- stats
//!
//! # Stop a link from redirecting (links are never deleted)
//! cargo run --bin admin -- deactivate aZ3k9Q
//!
//! # Re-enable it
//! cargo run --bin admin -- activate aZ3k9Q
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `REDIS_URL` (optional): evicts cached targets on deactivation

use link_resolver::application::services::{LinkService, StatsService};
use link_resolver::config::Config;
use link_resolver::domain::repositories::LinkRepository;
use link_resolver::infrastructure::cache::{CacheStore, NullCache, RedisCache};
use link_resolver::infrastructure::persistence::{PgLinkRepository, PgVisitRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;

/// CLI tool for managing link-resolver.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics for a link, or totals when no key is given
    Stats {
        /// Short key
        key: Option<String>,
    },

    /// Stop a link from redirecting
    Deactivate {
        /// Short key
        key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Re-enable a deactivated link
    Activate {
        /// Short key
        key: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Stats { key: Some(key) } => show_link_stats(&pool, &key).await?,
        Commands::Stats { key: None } => show_totals(&pool).await?,
        Commands::Deactivate { key, yes } => {
            deactivate_link(&pool, &config, &key, yes).await?;
        }
        Commands::Activate { key } => activate_link(&pool, &config, &key).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn link_service(pool: &PgPool, cache: Arc<dyn CacheStore>) -> LinkService<dyn LinkRepository> {
    let repo: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    LinkService::new(repo, cache)
}

/// Connects to Redis when configured so deactivation can evict the cached target.
async fn connect_cache(config: &Config) -> Arc<dyn CacheStore> {
    let Some(redis_url) = &config.redis_url else {
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.redis_settings()).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            println!(
                "{}",
                format!("⚠️  Redis unavailable ({}); cached target expires on its TTL", e).yellow()
            );
            Arc::new(NullCache::new())
        }
    }
}

/// Displays per-link visit statistics.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics for aZ3k9Q
///
///   Target:  https://example.com/
///   Status:  ACTIVE
///   Clicks:  3
///
///   Browsers
///     Chrome 120.0.0.0               2
///     Firefox 121.0                  1
/// ```
async fn show_link_stats(pool: &PgPool, key: &str) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let links = Arc::new(PgLinkRepository::new(pool.clone()));
    let visits = Arc::new(PgVisitRepository::new(pool));

    let link = links
        .find_by_key(key)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short link not found")?;

    let stats = StatsService::new(links, visits)
        .aggregate(key)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to aggregate stats: {}", e))?;

    println!("{}", format!("📊 Statistics for {}", key).bright_blue().bold());
    println!();

    let status = if !link.active {
        "INACTIVE".red()
    } else if link.is_expired() {
        "EXPIRED".yellow()
    } else {
        "ACTIVE".green()
    };

    println!("  Target:  {}", link.target_url.cyan());
    println!("  Status:  {}", status);
    println!(
        "  Created: {}",
        link.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    if let Some(expires_at) = link.expires_at {
        println!(
            "  Expires: {}",
            expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
    println!(
        "  Clicks:  {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();

    print_breakdown("Browsers", &stats.browsers);
    print_breakdown("Countries", &stats.countries);
    print_breakdown("Operating systems", &stats.os);

    Ok(())
}

fn print_breakdown(title: &str, counts: &BTreeMap<String, i64>) {
    println!("  {}", title.bright_white().bold());

    if counts.is_empty() {
        println!("    {}", "no visits recorded".bright_black());
    }

    let mut rows: Vec<_> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (value, count) in rows {
        println!("    {:<30} {}", value, count.to_string().bright_green());
    }
    println!();
}

/// Displays totals across all links.
async fn show_totals(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let active_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM short_links \
         WHERE active AND (expires_at IS NULL OR expires_at > NOW())",
    )
    .fetch_one(pool)
    .await?;

    let visits_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Redirecting:   {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:        {}",
        visits_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Deactivates a link after confirmation and evicts its cached target.
async fn deactivate_link(pool: &PgPool, config: &Config, key: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Deactivate short link".bright_blue().bold());
    println!();
    println!("  Key: {}", key.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Stop redirecting this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let cache = connect_cache(config).await;

    link_service(pool, cache)
        .set_active(key, false)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate {}: {}", key, e))?;

    println!("{}", "✅ Link deactivated".green().bold());
    Ok(())
}

async fn activate_link(pool: &PgPool, config: &Config, key: &str) -> Result<()> {
    let cache = connect_cache(config).await;

    link_service(pool, cache)
        .set_active(key, true)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to activate {}: {}", key, e))?;

    println!("{}", format!("✅ Link {} activated", key).green().bold());
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
