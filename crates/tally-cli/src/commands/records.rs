//! Record command implementations (transactions, cash flows, budget targets)

use anyhow::{Context, Result};
use chrono::Local;
use tally_core::db::Database;
use tally_core::models::{
    FlowType, NewBudgetTarget, NewCashFlowEntry, NewTransaction, TransactionType,
};
use tally_core::Money;

use super::{format_money, parse_date, truncate};

fn date_or_today(date: Option<&str>) -> Result<chrono::NaiveDate> {
    match date {
        Some(d) => parse_date(d),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_transaction_type(s: &str) -> Result<TransactionType> {
    s.parse::<TransactionType>().map_err(anyhow::Error::msg)
}

fn parse_flow_type(s: &str) -> Result<FlowType> {
    s.parse::<FlowType>().map_err(anyhow::Error::msg)
}

/// Print a hint when a label is outside the recommended set
fn hint_unrecognized(label: &str, recommended: &[&str]) {
    if !label.is_empty() && !recommended.contains(&label) {
        println!(
            "   💡 '{}' is not a recommended label (see 'tally categories')",
            label
        );
    }
}

// ========== Transactions ==========

pub fn cmd_transactions_list(db: &Database, limit: usize) -> Result<()> {
    let transactions = db.list_transactions()?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  tally transactions add -t revenue -a 100 -c \"Product Sales\"");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions.iter().take(limit) {
        let amount_str = match tx.kind {
            TransactionType::Revenue => format!("\x1b[32m+${}\x1b[0m", format_money(tx.amount)),
            TransactionType::Expenditure => {
                format!("\x1b[31m-${}\x1b[0m", format_money(tx.amount))
            }
        };

        println!(
            "   [{}] {} │ {:>12} │ {:20} │ {}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.category, 20),
            truncate(tx.description.as_deref().unwrap_or(""), 30)
        );
    }

    if transactions.len() > limit {
        println!();
        println!("   ... and {} more", transactions.len() - limit);
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    kind: &str,
    amount: Money,
    category: &str,
    date: Option<&str>,
    description: Option<String>,
) -> Result<i64> {
    let kind = parse_transaction_type(kind)?;
    let tx = NewTransaction {
        kind,
        category: category.trim().to_string(),
        description,
        amount,
        date: date_or_today(date)?,
    };

    let id = db
        .insert_transaction(&tx)
        .context("Failed to record transaction")?;

    println!(
        "✅ Recorded {} #{}: ${} on {}",
        kind,
        id,
        format_money(tx.amount),
        tx.date
    );
    hint_unrecognized(&tx.category, kind.recommended_categories());

    Ok(id)
}

/// Fields to change on an existing transaction; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct TransactionChanges {
    pub kind: Option<String>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

pub fn cmd_transactions_update(db: &Database, id: i64, changes: TransactionChanges) -> Result<()> {
    let existing = db
        .get_transaction(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction {} not found", id))?;

    let updated = NewTransaction {
        kind: match changes.kind.as_deref() {
            Some(k) => parse_transaction_type(k)?,
            None => existing.kind,
        },
        category: changes
            .category
            .map(|c| c.trim().to_string())
            .unwrap_or(existing.category),
        description: changes.description.or(existing.description),
        amount: changes.amount.unwrap_or(existing.amount),
        date: match changes.date.as_deref() {
            Some(d) => parse_date(d)?,
            None => existing.date,
        },
    };

    db.update_transaction(id, &updated)
        .context("Failed to update transaction")?;

    println!(
        "✅ Updated transaction {}: {} ${} │ {} │ {}",
        id,
        updated.kind,
        format_money(updated.amount),
        updated.date,
        updated.category
    );

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_transaction(id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}

// ========== Cash Flows ==========

pub fn cmd_cash_flows_list(db: &Database, limit: usize) -> Result<()> {
    let entries = db.list_cash_flows()?;

    if entries.is_empty() {
        println!("No cash-flow entries found. Record one with:");
        println!("  tally cash-flows add -t inflow -a 500 -s \"Customer Payments\"");
        return Ok(());
    }

    println!();
    println!("💵 Cash Flow");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries.iter().take(limit) {
        let (arrow, color) = match entry.flow_type {
            FlowType::Inflow => ("↑", "\x1b[32m"),
            FlowType::Outflow => ("↓", "\x1b[31m"),
        };
        println!(
            "   [{}] {} │ {}{} ${:>10}\x1b[0m │ {}",
            entry.id,
            entry.date,
            color,
            arrow,
            format_money(entry.amount),
            truncate(&entry.source, 30)
        );
    }

    Ok(())
}

pub fn cmd_cash_flows_add(
    db: &Database,
    flow_type: &str,
    amount: Money,
    source: &str,
    date: Option<&str>,
    description: Option<String>,
) -> Result<i64> {
    let flow_type = parse_flow_type(flow_type)?;
    let entry = NewCashFlowEntry {
        flow_type,
        source: source.trim().to_string(),
        description,
        amount,
        date: date_or_today(date)?,
    };

    let id = db
        .insert_cash_flow(&entry)
        .context("Failed to record cash-flow entry")?;

    println!(
        "✅ Recorded {} #{}: ${} on {}",
        flow_type,
        id,
        format_money(entry.amount),
        entry.date
    );
    hint_unrecognized(&entry.source, flow_type.recommended_sources());

    Ok(id)
}

pub fn cmd_cash_flows_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_cash_flow(id)
        .with_context(|| format!("Failed to delete cash-flow entry {}", id))?;
    println!("🗑️  Deleted cash-flow entry {}", id);
    Ok(())
}

// ========== Budget Targets ==========

pub fn cmd_budgets_list(db: &Database) -> Result<()> {
    let targets = db.list_budget_targets()?;

    if targets.is_empty() {
        println!("No budget targets. Add one with:");
        println!("  tally budgets add -c Marketing -a 500 -p monthly");
        return Ok(());
    }

    println!();
    println!("🎯 Budget Targets");
    println!("   ─────────────────────────────────────────────");
    for target in targets {
        println!(
            "   [{}] {:25} │ ${:>10} │ {}",
            target.id,
            truncate(&target.category, 25),
            format_money(target.target_amount),
            target.period.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

pub fn cmd_budgets_add(
    db: &Database,
    category: &str,
    amount: Money,
    period: Option<String>,
) -> Result<i64> {
    let target = NewBudgetTarget {
        category: category.trim().to_string(),
        target_amount: amount,
        period,
    };
    let id = db
        .insert_budget_target(&target)
        .context("Failed to add budget target")?;
    println!(
        "✅ Added budget target #{}: {} ${}",
        id,
        target.category,
        format_money(target.target_amount)
    );
    Ok(id)
}

pub fn cmd_budgets_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_budget_target(id)
        .with_context(|| format!("Failed to delete budget target {}", id))?;
    println!("🗑️  Deleted budget target {}", id);
    Ok(())
}
