//! Tally Core Library
//!
//! Shared functionality for the Tally bookkeeping tool:
//! - Record model for transactions, cash flows and budget targets
//! - Database access and migrations
//! - Exact integer-cent money amounts
//! - Lenient amount coercion for untyped input
//! - Category, monthly, profit-and-loss and cash-flow aggregation
//! - Concurrent dashboard loading
//! - Ad-hoc analysis of uploaded tables, locally or via a remote endpoint

pub mod aggregate;
pub mod analysis;
pub mod cashflow;
pub mod coerce;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod fields;
pub mod ingest;
pub mod models;
pub mod money;
pub mod summary;

/// Test utilities including a mock analysis server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    cash_flow_by_source, category_breakdown, month_label, monthly_buckets, rank_by_magnitude,
    sort_buckets_chronologically, totals_by_category, Categorized,
};
pub use analysis::{
    quick_analysis, AnalysisResult, Analyzer, FallbackOutcome, RemoteAnalyzer, TOP_CATEGORY_LIMIT,
};
pub use cashflow::summarize_cash_flows;
pub use coerce::coerce_amount;
pub use config::{AnalysisSettings, Settings};
pub use dashboard::{load_dashboard, Dashboard, LedgerSource};
pub use db::Database;
pub use error::{Error, Result};
pub use fields::AdHocRow;
pub use money::Money;
pub use summary::summarize_transactions;
