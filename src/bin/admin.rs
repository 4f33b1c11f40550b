//! CLI administration tool for url-hasher.
//!
//! Inspects and manipulates the PostgreSQL store without going through the
//! HTTP API. Registrations made here follow exactly the same validation and
//! collision rules as `POST /api/v1/urls`.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Show a record, live or expired
//! cargo run --bin admin -- url show EAaArVRs
//!
//! # Register a URL for one day
//! cargo run --bin admin -- url register https://example.com --ttl 86400
//!
//! # Count live and expired records
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`url_hasher::config`]. `STORE` must be `postgres`.

use url_hasher::application::services::{RegistrationOutcome, UrlService};
use url_hasher::api::dto::register::RegisterUrlRequest;
use url_hasher::config::{self, Config, StoreBackend};
use url_hasher::domain::repositories::UrlRepository;
use url_hasher::infrastructure::persistence::PgUrlRepository;
use url_hasher::server::connect_pool;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing url-hasher.
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
    /// Inspect or register URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UrlAction {
    /// Show the record stored under a short code
    Show { code: String },

    /// Register a URL
    Register {
        url: String,

        /// Expiration as an RFC 3339 timestamp
        #[arg(long, conflicts_with = "ttl", required_unless_present = "ttl")]
        expire_at: Option<DateTime<Utc>>,

        /// Expiration as seconds from now
        #[arg(long)]
        ttl: Option<i64>,
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
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store != StoreBackend::Postgres {
        anyhow::bail!("admin commands operate on PostgreSQL; unset STORE or set STORE=postgres");
    }

    let pool = connect_pool(&config).await?;
    let repo = Arc::new(PgUrlRepository::new(
        Arc::new(pool),
        config.query_timeout(),
    ));

    match cli.command {
        Commands::Url { action } => handle_url_action(action, repo, &config).await?,
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Db { action } => handle_db_action(action, &repo).await?,
    }

    Ok(())
}

async fn handle_url_action(
    action: UrlAction,
    repo: Arc<PgUrlRepository>,
    config: &Config,
) -> Result<()> {
    match action {
        UrlAction::Show { code } => show_url(&repo, &code).await,
        UrlAction::Register {
            url,
            expire_at,
            ttl,
        } => {
            let expire_at = match (expire_at, ttl) {
                (Some(at), _) => at,
                (None, Some(seconds)) => expiration_from_ttl(Utc::now(), seconds)?,
                (None, None) => anyhow::bail!("either --expire-at or --ttl is required"),
            };
            register_url(repo, config, url, expire_at).await
        }
    }
}

/// Adds `seconds` to `now`, rejecting values outside chrono's range.
fn expiration_from_ttl(now: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| anyhow::anyhow!("--ttl {} is out of range", seconds))
}

/// Prints one record.
///
/// # Output Format
///
/// ```text
/// 🔎 Record EAaArVRs
///
///   ID:         1
///   URL:        https://example.com
///   Expires at: 2030-01-01 00:00:00 UTC
///   Status:     LIVE
/// ```
async fn show_url(repo: &PgUrlRepository, code: &str) -> Result<()> {
    let record = repo
        .get(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load record: {}", e))?;

    let Some(record) = record else {
        println!("{} {}", "❌ No record for".red(), code.bright_white());
        return Ok(());
    };

    let status = if record.is_expired() {
        "EXPIRED".red()
    } else {
        "LIVE".green()
    };

    println!("{} {}", "🔎 Record".bright_blue().bold(), code.cyan());
    println!();
    println!("  ID:         {}", record.id.to_string().bright_black());
    println!("  URL:        {}", record.original_url.bright_white());
    println!(
        "  Expires at: {}",
        record.expire_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Status:     {}", status);
    println!();

    Ok(())
}

async fn register_url(
    repo: Arc<PgUrlRepository>,
    config: &Config,
    url: String,
    expire_at: DateTime<Utc>,
) -> Result<()> {
    let request = RegisterUrlRequest { url, expire_at };
    if let Err(errors) = request.validate() {
        println!("{}", "❌ Invalid registration:".red().bold());
        for (_, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                println!("  - {}", message.red());
            }
        }
        anyhow::bail!("validation failed");
    }

    let service = UrlService::new(repo, config.code_lengths()?);
    let registration = service
        .register(&request.url, request.expire_at)
        .await
        .context("Registration failed")?;

    let outcome = match registration.outcome {
        RegistrationOutcome::Created => "created".green(),
        RegistrationOutcome::Reshortened => "created (re-shortened after collision)".yellow(),
        RegistrationOutcome::Extended => "expiration extended".cyan(),
        RegistrationOutcome::Unchanged => "already registered, unchanged".bright_black(),
    };

    println!("{} {}", "✅ Registered:".green().bold(), outcome);
    println!();
    println!("  Code:       {}", registration.code().bright_yellow().bold());
    println!(
        "  Short URL:  http://{}/{}",
        config.public_addr,
        registration.code()
    );
    println!(
        "  Expires at: {}",
        registration.record.expire_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    Ok(())
}

/// Displays live and expired record counts.
async fn handle_stats(repo: &PgUrlRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = repo
        .count_records()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;

    println!("  {} {}", "Live:   ".bright_white(), counts.live.to_string().green().bold());
    println!("  {} {}", "Expired:".bright_white(), counts.expired.to_string().bright_black());
    println!(
        "  {} {}",
        "Total:  ".bright_white(),
        (counts.live + counts.expired).to_string().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, repo: &PgUrlRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            print!("Checking database connection... ");
            if repo.health_check().await {
                println!("{}", "✅ OK".green().bold());
                Ok(())
            } else {
                println!("{}", "❌ FAILED".red().bold());
                anyhow::bail!("database did not answer within the query timeout")
            }
        }
    }
}
