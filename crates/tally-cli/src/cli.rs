//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::Money;

/// Tally - Small-business revenue, expense and cash-flow tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track revenue, expenses and cash flow, and analyze uploaded ledgers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage revenue and expenditure transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage cash-flow entries
    CashFlows {
        #[command(subcommand)]
        action: Option<CashFlowsAction>,
    },

    /// Manage budget targets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show dashboard summary
    Dashboard {
        /// Date that selects the "this month" figures (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<String>,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report: ReportType,
    },

    /// Analyze an uploaded CSV or JSON table
    Analyze {
        /// CSV file with a header row, or a .json file of row objects
        #[arg(short, long)]
        file: PathBuf,

        /// Remote analysis endpoint (overrides config and TALLY_ANALYSIS_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// Remote request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Use local analysis if the remote endpoint fails
        #[arg(long)]
        fallback: bool,

        /// Check the remote endpoint is reachable before sending rows
        #[arg(long)]
        check: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recommended category and source labels
    Categories,
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a transaction
    Add {
        /// revenue or expenditure
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Non-negative amount, e.g. 1200 or "$1,200.50"
        #[arg(short, long)]
        amount: Money,

        /// Category label
        #[arg(short, long, default_value = "")]
        category: String,

        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Replace fields of a transaction
    Update {
        /// Transaction ID
        id: i64,

        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        #[arg(short, long)]
        amount: Option<Money>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CashFlowsAction {
    /// List cash-flow entries, newest first
    List {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record a cash-flow entry
    Add {
        /// inflow or outflow
        #[arg(short = 't', long = "type")]
        flow_type: String,

        #[arg(short, long)]
        amount: Money,

        /// Source label, e.g. "Customer Payments"
        #[arg(short, long, default_value = "")]
        source: String,

        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a cash-flow entry
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budget targets
    List,

    /// Add a budget target
    Add {
        /// Category the target applies to
        #[arg(short, long)]
        category: String,

        /// Target amount
        #[arg(short, long)]
        amount: Money,

        /// Period label, e.g. monthly
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Delete a budget target
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Revenue, expenditure and profit, overall and for one month
    Summary {
        /// Date that selects the month (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Totals per category
    Categories {
        /// Restrict to revenue or expenditure
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Show only the largest N categories by magnitude
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Revenue and expenses per month
    Trends,

    /// Net cash position with totals per source
    CashFlow,
}
