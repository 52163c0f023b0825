//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init, categories and shared utilities (open_db, dates, settings)
//! - `records` - Transaction, cash-flow and budget target commands
//! - `reports` - Summary, category, trend and cash-flow reports, dashboard
//! - `analyze` - Ad-hoc analysis of uploaded CSV or JSON tables

use tally_core::Money;

pub mod analyze;
pub mod core;
pub mod records;
pub mod reports;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use records::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a money amount with thousands separators, e.g. `-1,234.50`
pub fn format_money(amount: Money) -> String {
    let formatted = amount.abs().to_string();
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
