//! CLI administration tool for linkvault.
//!
//! Manages short links directly against the database, without requiring
//! HTTP API access or an API key.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin linkvault-admin -- links list
//!
//! # Create a link (optionally with a custom code)
//! cargo run --bin linkvault-admin -- links create https://example.com --code promo
//!
//! # Show statistics for one link
//! cargo run --bin linkvault-admin -- links stats promo
//!
//! # Delete a link
//! cargo run --bin linkvault-admin -- links delete promo
//!
//! # Check database connection
//! cargo run --bin linkvault-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: SQLite database (default: `sqlite://linkvault.db?mode=rwc`)
//! - `PUBLIC_BASE_URL`: prefix used to print short URLs (default: `http://localhost:3000`)
//! - `RESERVED_CODES`: extra codes refused as custom codes, comma-separated

use linkvault::application::services::LinkService;
use linkvault::config::reserved_codes_from_env;
use linkvault::domain::entities::Link;
use linkvault::domain::reserved_codes::ReservedCodes;
use linkvault::infrastructure::persistence::{self, SqliteLinkRepository};
use linkvault::utils::code_generator::CodeAllocation;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://linkvault.db?mode=rwc";

/// CLI tool for managing linkvault.
#[derive(Parser)]
#[command(name = "linkvault-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links, newest first
    List,

    /// Create a short link
    Create {
        /// Destination URL
        url: String,

        /// Custom short code (random if omitted)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show statistics for a link
    Stats {
        /// Short code
        code: String,
    },

    /// Permanently delete a link
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool = persistence::connect(&database_url, 1, Duration::from_secs(30))
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &SqlitePool) -> Result<()> {
    let repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo, CodeAllocation::default())
        .with_reserved_codes(ReservedCodes::from_routes(reserved_codes_from_env()));

    match action {
        LinkAction::List => list_links(&service).await?,
        LinkAction::Create { url, code } => create_link(&service, url, code).await?,
        LinkAction::Stats { code } => show_stats(&service, &code).await?,
        LinkAction::Delete { code, yes } => delete_link(&service, &code, yes).await?,
    }

    Ok(())
}

/// Lists all links in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Code         Clicks   Created            URL
///   ─────────────────────────────────────────────────────────────────────
///   gohere       3        2025-01-15 10:30   https://example.com/redir
/// ```
async fn list_links(service: &LinkService<SqliteLinkRepository>) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} linkvault-admin links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:<8} {:<18} {}",
            link.short_code.cyan(),
            link.click_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a link, refusing codes that would shadow system routes.
async fn create_link(
    service: &LinkService<SqliteLinkRepository>,
    url: String,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let link = service
        .create_link(url, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link ready".green().bold());
    print_link(&link);

    Ok(())
}

/// Displays statistics for a single link.
async fn show_stats(service: &LinkService<SqliteLinkRepository>, code: &str) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());

    let link = service
        .get_link_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<SqliteLinkRepository>,
    code: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .get_link_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Code: {}", link.short_code.cyan());
    println!("  URL:  {}", link.original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
    }

    Ok(())
}

fn print_link(link: &Link) {
    let base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!();
    println!(
        "  Short URL: {}/{}",
        base_url.trim_end_matches('/'),
        link.short_code.bright_yellow().bold()
    );
    println!("  URL:       {}", link.original_url);
    println!(
        "  Clicks:    {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!("  Created:   {}", link.created_at.to_rfc3339());
    println!("  Updated:   {}", link.updated_at.to_rfc3339());
    println!();
}
