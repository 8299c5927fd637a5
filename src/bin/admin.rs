//! CLI administration tool for short-url.
//!
//! Manages links directly against PostgreSQL through the same service the
//! HTTP API uses, so URL validation and code rules are identical.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (asks for confirmation if the URL looks suspicious)
//! cargo run --bin admin -- link create example.com/docs --title "Docs"
//!
//! # Create a link with a custom code
//! cargo run --bin admin -- link create https://example.com --code launch
//!
//! # Show, list, update
//! cargo run --bin admin -- link show launch
//! cargo run --bin admin -- link list --page 2
//! cargo run --bin admin -- link update launch --url https://example.org --clear-title
//!
//! # Check a URL without storing anything
//! cargo run --bin admin -- check intranet
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` or `DB_*` components, `BASE_URL`,
//! `CODE_LENGTH`. `STORAGE_BACKEND=memory` is rejected.

use short_url::application::services::{CreateLink, LinkService, UpdateLink};
use short_url::config::{self, StorageBackend};
use short_url::domain::entities::Link;
use short_url::domain::repositories::LinkRepository;
use short_url::infrastructure::persistence::PgLinkRepository;
use short_url::server;
use short_url::utils::url_normalizer::{UrlWarning, advise};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing short-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Normalize a URL and report whether it looks valid
    Check {
        /// URL to check
        url: String,
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
    /// Create a new short link
    Create {
        /// Target URL (`https://` is assumed when no scheme is given)
        url: String,

        /// Display title
        #[arg(short, long)]
        title: Option<String>,

        /// Custom short code (generated if not provided)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt for suspicious URLs
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link and its click count
    Show {
        /// Short code (case-sensitive)
        code: String,
    },

    /// List links, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 20)]
        page_size: i64,
    },

    /// Change the target URL and/or title of a link
    Update {
        /// Short code (case-sensitive)
        code: String,

        /// New target URL
        #[arg(short, long)]
        url: Option<String>,

        /// New title
        #[arg(short, long, conflicts_with = "clear_title")]
        title: Option<String>,

        /// Remove the title
        #[arg(long)]
        clear_title: bool,
    },
}

/// Database operation subcommands.
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

    // The advisory check needs no database.
    if let Commands::Check { url } = &cli.command {
        print_check(url);
        return Ok(());
    }

    let config = config::load_from_env().context("Invalid configuration")?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool requires STORAGE_BACKEND=postgres");
    }

    let pool = server::connect_pool(&config).await?;

    match cli.command {
        Commands::Link { action } => {
            let repository: Arc<dyn LinkRepository> =
                Arc::new(PgLinkRepository::new(Arc::new(pool)));
            let service = server::build_link_service(&config, repository);
            handle_link_action(action, &service).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Check { .. } => {}
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(
    action: LinkAction,
    service: &LinkService<dyn LinkRepository>,
) -> Result<()> {
    match action {
        LinkAction::Create {
            url,
            title,
            code,
            yes,
        } => create_link(service, url, title, code, yes).await,
        LinkAction::Show { code } => {
            let link = service.get_link(&code).await?;
            print_link(service, &link);
            Ok(())
        }
        LinkAction::List { page, page_size } => list_links(service, page, page_size).await,
        LinkAction::Update {
            code,
            url,
            title,
            clear_title,
        } => {
            let title = if clear_title { Some(None) } else { title.map(Some) };
            let link = service
                .update_link(
                    &code,
                    UpdateLink {
                        target_url: url,
                        title,
                    },
                )
                .await?;

            println!("{}", "✅ Link updated".green().bold());
            println!();
            print_link(service, &link);
            Ok(())
        }
    }
}

/// Creates a link, asking for confirmation when the advisory check warns.
///
/// # Flow
///
/// 1. Run the advisory check on the raw input
/// 2. On warning, show it and ask to continue (default: No), unless `--yes`
/// 3. Create the link; strict validation still applies
async fn create_link(
    service: &LinkService<dyn LinkRepository>,
    url: String,
    title: Option<String>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let advice = service.check_url(&url);
    println!("  Target: {}", advice.normalized.cyan());

    if let Some(warning) = &advice.warning {
        println!();
        print_warning(warning);
        println!();

        if !skip_confirm {
            let confirmed = Confirm::new()
                .with_prompt("Create the link anyway?")
                .default(false)
                .interact()?;

            if !confirmed {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }
        }
    }

    let link = service
        .create_link(CreateLink {
            target_url: url,
            title,
            code,
        })
        .await?;

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    print_link(service, &link);

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links (page 1, 2 of 2)
///
///   Code       Clicks   Created            Target
///   ─────────────────────────────────────────────────────────────
///   launch     12       2025-01-15 10:30   https://example.com
/// ```
async fn list_links(
    service: &LinkService<dyn LinkRepository>,
    page: i64,
    page_size: i64,
) -> Result<()> {
    let result = service.list_links(page, page_size).await?;

    println!(
        "{}",
        format!(
            "📋 Links (page {}, {} of {})",
            result.page,
            result.items.len(),
            result.total
        )
        .bright_blue()
        .bold()
    );
    println!();

    if result.items.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &result.items {
        println!(
            "  {:<12} {:<8} {:<18} {}",
            link.code.cyan(),
            link.click_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }
    println!();

    Ok(())
}

fn print_link(service: &LinkService<dyn LinkRepository>, link: &Link) {
    println!("  Short URL: {}", service.short_url(&link.code).bright_yellow().bold());
    println!("  Code:      {}", link.code.cyan());
    println!("  Target:    {}", link.target_url);
    if let Some(title) = &link.title {
        println!("  Title:     {title}");
    }
    println!(
        "  Clicks:    {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Created:   {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
    );
    println!();
}

fn print_check(url: &str) {
    let advice = advise(url);

    println!("  Normalized: {}", advice.normalized.cyan());
    match &advice.warning {
        Some(warning) => print_warning(warning),
        None => println!("{}", "✅ URL looks valid".green().bold()),
    }
}

fn print_warning(warning: &UrlWarning) {
    println!("{}", format!("⚠️  {}", warning.title).yellow().bold());
    println!("   {}", warning.message.yellow());
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
            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;
            let clicks: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Links:      {}", links.to_string().bright_green().bold());
            println!("  Clicks:     {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
