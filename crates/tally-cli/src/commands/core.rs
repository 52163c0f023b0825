//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `parse_date` / `resolve_as_of` - Date argument handling
//! - `load_settings` - Config file, environment and flag layering
//! - `cmd_init` - Initialize the database
//! - `cmd_categories` - Show recommended labels

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tally_core::config::Settings;
use tally_core::db::Database;
use tally_core::models::{FlowType, TransactionType};

/// Open the database, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s))
}

/// Explicit as-of date, or today's local date
pub fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate> {
    match as_of {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// Load settings from the config file and environment, then apply flags
pub fn load_settings(
    config_path: Option<&Path>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<Settings> {
    let mut settings = match config_path {
        Some(path) => Settings::load_from(Some(path)),
        None => Settings::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(url) = api_url {
        let url = url.trim().to_string();
        settings.analysis.url = (!url.is_empty()).then_some(url);
    }
    if let Some(secs) = timeout_secs {
        settings.analysis.timeout = Duration::from_secs(secs);
    }

    Ok(settings)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_transactions()?;
    println!("   Database file: {}", db.path());
    println!("   Transactions on record: {}", count);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record revenue: tally transactions add -t revenue -a 1200 -c \"Product Sales\"");
    println!("  2. View dashboard: tally dashboard");
    println!("  3. Analyze a ledger: tally analyze --file ledger.csv");

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Recommended Labels");
    println!("   ─────────────────────────────");

    for kind in [TransactionType::Revenue, TransactionType::Expenditure] {
        println!("   {} categories:", kind);
        for label in kind.recommended_categories() {
            println!("     • {}", label);
        }
    }

    for flow in [FlowType::Inflow, FlowType::Outflow] {
        println!("   {} sources:", flow);
        for label in flow.recommended_sources() {
            println!("     • {}", label);
        }
    }

    println!();
    println!("   Any other label is accepted; blank labels group as \"Uncategorized\".");

    Ok(())
}
