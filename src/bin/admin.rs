//! CLI administration tool for url-shortener.
//!
//! Talks to the configured storage directly, without going through the HTTP
//! API. Uses the same `STORAGE_TYPE` / `FILE_STORAGE_PATH` / `DATABASE_DSN`
//! variables as the server.
//!
//! # Usage
//!
//! ```bash
//! # URL and user counts
//! cargo run --bin admin -- stats
//!
//! # Inspect one short URL
//! cargo run --bin admin -- get DdGYF42
//!
//! # List a user's URLs, deleted ones included
//! cargo run --bin admin -- user 2f1c4f0e-...
//!
//! # Soft-delete URLs on behalf of their owner
//! cargo run --bin admin -- delete 2f1c4f0e-... DdGYF42 yYTQaq-
//!
//! # Check that storage is reachable
//! cargo run --bin admin -- ping
//! ```
//!
//! Do not point it at the file backend of a running server: both processes
//! would rewrite the same file.

use url_shortener::config::Config;
use url_shortener::domain::entities::ShortenedData;
use url_shortener::domain::repositories::UrlStorage;
use url_shortener::infrastructure::persistence::connect_storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing url-shortener storage.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show URL and user counts
    Stats,

    /// Show a single short URL
    Get {
        /// Short code, e.g. DdGYF42
        code: String,
    },

    /// List every URL owned by a user
    User {
        user_id: String,
    },

    /// Soft-delete URLs owned by a user
    Delete {
        user_id: String,

        /// Short codes to delete
        #[arg(required = true)]
        codes: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check storage connection
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let backend = Config::storage_backend_from_env()?;
    let storage = connect_storage(&backend)
        .await
        .with_context(|| format!("Failed to open {} storage", backend.kind()))?;

    let result = match cli.command {
        Commands::Stats => handle_stats(storage.as_ref()).await,
        Commands::Get { code } => handle_get(storage.as_ref(), &code).await,
        Commands::User { user_id } => handle_user(storage.as_ref(), &user_id).await,
        Commands::Delete {
            user_id,
            codes,
            yes,
        } => handle_delete(storage.as_ref(), &user_id, &codes, yes).await,
        Commands::Ping => handle_ping(storage.as_ref(), backend.kind()).await,
    };

    storage.close().await.context("Failed to close storage")?;

    result
}

fn status_label(record: &ShortenedData) -> ColoredString {
    if record.is_deleted {
        "DELETED".red()
    } else {
        "ACTIVE".green()
    }
}

async fn handle_stats(storage: &dyn UrlStorage) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stat = storage
        .get_statistic()
        .await
        .context("Failed to load statistics")?;

    println!(
        "  URLs:  {}",
        stat.urls.to_string().bright_white().bold()
    );
    println!(
        "  Users: {}",
        stat.users.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn handle_get(storage: &dyn UrlStorage, code: &str) -> Result<()> {
    let record = storage
        .get(code)
        .await
        .with_context(|| format!("Failed to load '{code}'"))?;

    println!("{}", "🔗 Short URL".bright_blue().bold());
    println!();
    println!("  Code:     {}", record.short_url.cyan());
    println!("  Original: {}", record.original_url);
    println!("  Owner:    {}", record.user_id.bright_black());
    println!("  UUID:     {}", record.uuid.bright_black());
    println!("  Status:   {}", status_label(&record));
    println!();

    Ok(())
}

/// Lists a user's URLs.
///
/// # Output Format
///
/// ```text
/// 📋 URLs of 2f1c4f0e-...
///
///   Code                     Status    Original
///   ─────────────────────────────────────────────────────────
///   DdGYF42                  ACTIVE    https://practicum.yandex.ru/
/// ```
async fn handle_user(storage: &dyn UrlStorage, user_id: &str) -> Result<()> {
    println!(
        "{} {}",
        "📋 URLs of".bright_blue().bold(),
        user_id.bright_blue().bold()
    );
    println!();

    let mut records = storage
        .get_batch_by_user_id(user_id)
        .await
        .context("Failed to list user urls")?;

    if records.is_empty() {
        println!("{}", "  No URLs found".yellow());
        return Ok(());
    }

    records.sort_by(|a, b| a.short_url.cmp(&b.short_url));

    println!(
        "  {:<24} {:<9} {}",
        "Code".bright_white().bold(),
        "Status".bright_white().bold(),
        "Original".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<24} {:<9} {}",
            record.short_url.cyan(),
            status_label(record),
            record.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Soft-deletes `codes` for `user_id`, one at a time, after confirmation.
///
/// Codes the user does not own are reported and skipped.
async fn handle_delete(
    storage: &dyn UrlStorage,
    user_id: &str,
    codes: &[String],
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete URLs".bright_blue().bold());
    println!();
    println!("  User:  {}", user_id.cyan());
    println!("  Codes: {}", codes.join(", ").bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these URLs?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let mut deleted = 0usize;
    for code in codes {
        match storage.delete_by_user_id_and_short(user_id, code).await {
            Ok(()) => {
                deleted += 1;
                println!("  {} {}", "✅".green(), code);
            }
            Err(e) => println!("  {} {}: {}", "⚠️ ".yellow(), code, e),
        }
    }

    println!();
    println!(
        "  Deleted {} of {}",
        deleted.to_string().bright_white().bold(),
        codes.len()
    );
    println!();

    Ok(())
}

async fn handle_ping(storage: &dyn UrlStorage, kind: &str) -> Result<()> {
    println!("{}", "🔍 Checking storage...".bright_blue().bold());
    println!();

    match storage.ping().await {
        Ok(()) => {
            println!("{} {}", "✅ Storage reachable:".green().bold(), kind);
            Ok(())
        }
        Err(e) => {
            println!("{}", "❌ Storage unreachable".red().bold());
            Err(e).context("Storage ping failed")
        }
    }
}
