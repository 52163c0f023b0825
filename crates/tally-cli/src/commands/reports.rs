//! Report and dashboard command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::aggregate::{
    cash_flow_by_source, category_breakdown, monthly_buckets, rank_by_magnitude,
};
use tally_core::cashflow::summarize_cash_flows;
use tally_core::dashboard::load_dashboard;
use tally_core::db::Database;
use tally_core::models::{CategoryTotal, FinancialSummary, FlowType, MonthlyBucket, TransactionType};
use tally_core::summary::summarize_transactions;
use tally_core::Money;

use super::{format_money, truncate};

fn print_summary(summary: &FinancialSummary, as_of: NaiveDate) {
    println!("   {:18} │ {:>14} │ {:>14}", "", "All time", as_of.format("%b %Y").to_string());
    println!("   ───────────────────┼────────────────┼────────────────");
    println!(
        "   {:18} │ {:>14} │ {:>14}",
        "Revenue",
        format_money(summary.total_revenue),
        format_money(summary.monthly_revenue)
    );
    println!(
        "   {:18} │ {:>14} │ {:>14}",
        "Expenditure",
        format_money(summary.total_expenditure),
        format_money(summary.monthly_expenditure)
    );
    println!(
        "   {:18} │ {:>14} │ {:>14}",
        "Profit",
        format_money(summary.total_profit),
        format_money(summary.monthly_profit)
    );
}

fn print_categories(categories: &[CategoryTotal]) {
    let total: Money = categories.iter().map(|c| c.total).sum();
    println!("   {:25} │ {:>12} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼──────────────┼────────");
    for cat in categories {
        let pct = if total.is_zero() {
            0.0
        } else {
            cat.total.to_major() / total.to_major() * 100.0
        };
        println!(
            "   {:25} │ {:>12} │ {:>5.1}%",
            truncate(&cat.name, 25),
            format_money(cat.total),
            pct
        );
    }
}

fn print_trends(buckets: &[MonthlyBucket]) {
    println!("   {:10} │ {:>12} │ {:>12} │ {:>12}", "Month", "Revenue", "Expenses", "Net");
    println!("   ───────────┼──────────────┼──────────────┼──────────────");
    for bucket in buckets {
        println!(
            "   {:10} │ {:>12} │ {:>12} │ {:>12}",
            bucket.month,
            format_money(bucket.revenue),
            format_money(bucket.expenses),
            format_money(bucket.revenue - bucket.expenses)
        );
    }
}

pub async fn cmd_dashboard(db: &Database, as_of: NaiveDate, json: bool) -> Result<()> {
    let dashboard = load_dashboard(db, as_of)
        .await
        .context("Failed to load dashboard")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!();
    println!("📊 Tally Dashboard (as of {})", as_of);
    println!("   ─────────────────────────────────────────────────────");
    print_summary(&dashboard.summary, as_of);

    println!();
    println!("💵 Cash Position");
    println!(
        "   In: ${}  Out: ${}  Net: ${}",
        format_money(dashboard.cash_flow_summary.total_inflow),
        format_money(dashboard.cash_flow_summary.total_outflow),
        format_money(dashboard.cash_flow_summary.net_cash_flow)
    );

    if !dashboard.expense_categories.is_empty() {
        println!();
        println!("🧾 Expenses by Category");
        print_categories(&dashboard.expense_categories);
    }

    if !dashboard.monthly_trends.is_empty() {
        println!();
        println!("📈 Monthly Trends");
        print_trends(&dashboard.monthly_trends);
    }

    println!();
    println!(
        "   {} transactions, {} cash-flow entries",
        dashboard.transactions.len(),
        dashboard.cash_flows.len()
    );

    Ok(())
}

pub fn cmd_report_summary(db: &Database, as_of: NaiveDate) -> Result<()> {
    let transactions = db.list_transactions()?;
    let summary = summarize_transactions(&transactions, as_of);

    println!();
    println!("📊 Profit and Loss");
    println!("   ─────────────────────────────────────────────────────");
    print_summary(&summary, as_of);

    Ok(())
}

pub fn cmd_report_categories(db: &Database, kind: Option<&str>, top: Option<usize>) -> Result<()> {
    let kind = kind
        .map(|k| k.parse::<TransactionType>().map_err(anyhow::Error::msg))
        .transpose()?;

    let transactions = db.list_transactions()?;
    let mut categories = category_breakdown(&transactions, kind);
    if let Some(limit) = top {
        categories = rank_by_magnitude(categories, limit);
    }

    println!();
    match kind {
        Some(k) => println!("🏷️  {} by Category", k),
        None => println!("🏷️  All Transactions by Category"),
    }
    println!("   ─────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    print_categories(&categories);
    Ok(())
}

pub fn cmd_report_trends(db: &Database) -> Result<()> {
    let transactions = db.list_transactions()?;
    let buckets = monthly_buckets(&transactions);

    println!();
    println!("📈 Monthly Trends");
    println!("   ─────────────────────────────────────────────────────");

    if buckets.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    print_trends(&buckets);
    Ok(())
}

pub fn cmd_report_cash_flow(db: &Database) -> Result<()> {
    let entries = db.list_cash_flows()?;
    let summary = summarize_cash_flows(&entries);

    println!();
    println!("💵 Cash Flow Summary");
    println!("   ─────────────────────────────");
    println!("   Total inflow:   ${:>12}", format_money(summary.total_inflow));
    println!("   Total outflow:  ${:>12}", format_money(summary.total_outflow));
    println!("   Net cash flow:  ${:>12}", format_money(summary.net_cash_flow));

    for flow_type in [FlowType::Inflow, FlowType::Outflow] {
        let sources = cash_flow_by_source(&entries, Some(flow_type));
        if sources.is_empty() {
            continue;
        }
        println!();
        println!("   {} by source", flow_type);
        print_categories(&sources);
    }

    Ok(())
}
