//! Dashboard assembly
//!
//! The dashboard needs four independent reads from the ledger. They are issued
//! concurrently and joined; the first failure aborts the whole load so a
//! partially populated dashboard is never returned.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{category_breakdown, monthly_buckets};
use crate::cashflow::summarize_cash_flows;
use crate::error::{Error, Result};
use crate::models::{
    CashFlowEntry, CashFlowSummary, CategoryTotal, FinancialSummary, MonthlyBucket, Transaction,
    TransactionType,
};
use crate::summary::summarize_transactions;

/// Read access to stored records
///
/// The summary methods have default implementations derived from the lists,
/// so a source only has to provide the two listings.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// All transactions, newest first
    async fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// All cash-flow entries, newest first
    async fn list_cash_flows(&self) -> Result<Vec<CashFlowEntry>>;

    async fn financial_summary(&self, as_of: NaiveDate) -> Result<FinancialSummary> {
        let transactions = self.list_transactions().await?;
        Ok(summarize_transactions(&transactions, as_of))
    }

    async fn cash_flow_summary(&self) -> Result<CashFlowSummary> {
        let entries = self.list_cash_flows().await?;
        Ok(summarize_cash_flows(&entries))
    }
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub summary: FinancialSummary,
    pub transactions: Vec<Transaction>,
    pub cash_flows: Vec<CashFlowEntry>,
    pub cash_flow_summary: CashFlowSummary,
    /// Expenditure totals per category, in encounter order
    pub expense_categories: Vec<CategoryTotal>,
    /// Revenue and expenses per month, chronological
    pub monthly_trends: Vec<MonthlyBucket>,
}

/// Fetch the four dashboard inputs concurrently and derive the views
///
/// Fails fast: if any fetch fails the others are dropped and the error is
/// returned as [`Error::Fetch`] naming the failed input.
pub async fn load_dashboard<S>(source: &S, as_of: NaiveDate) -> Result<Dashboard>
where
    S: LedgerSource + ?Sized,
{
    debug!("Loading dashboard as of {}", as_of);

    let (summary, transactions, cash_flows, cash_flow_summary) = tokio::try_join!(
        labeled("financial summary", source.financial_summary(as_of)),
        labeled("transactions", source.list_transactions()),
        labeled("cash flows", source.list_cash_flows()),
        labeled("cash flow summary", source.cash_flow_summary()),
    )?;

    let expense_categories = category_breakdown(&transactions, Some(TransactionType::Expenditure));
    let monthly_trends = monthly_buckets(&transactions);

    Ok(Dashboard {
        as_of,
        summary,
        transactions,
        cash_flows,
        cash_flow_summary,
        expense_categories,
        monthly_trends,
    })
}

async fn labeled<T, F>(what: &'static str, fetch: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    fetch.await.map_err(|e| {
        warn!("Dashboard fetch of {} failed: {}", what, e);
        match e {
            Error::Fetch(_) => e,
            other => Error::Fetch(format!("{}: {}", what, other)),
        }
    })
}
