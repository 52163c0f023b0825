//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::money::Money;

/// Label used when a record carries no usable category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Recommended revenue categories (not enforced)
pub const REVENUE_CATEGORIES: &[&str] = &[
    "Sales Revenue",
    "Service Revenue",
    "Product Sales",
    "Consulting",
    "Licensing",
    "Interest Income",
    "Other Revenue",
];

/// Recommended expense categories (not enforced)
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Office Supplies",
    "Marketing",
    "Travel",
    "Software/Tools",
    "Rent",
    "Utilities",
    "Insurance",
    "Professional Services",
    "Equipment",
    "Other Expenses",
];

/// Recommended cash inflow sources (not enforced)
pub const INFLOW_SOURCES: &[&str] = &[
    "Customer Payments",
    "Investment Income",
    "Loan Proceeds",
    "Asset Sales",
    "Government Grants",
    "Other Inflows",
];

/// Recommended cash outflow sources (not enforced)
pub const OUTFLOW_SOURCES: &[&str] = &[
    "Supplier Payments",
    "Payroll",
    "Loan Payments",
    "Tax Payments",
    "Equipment Purchase",
    "Rent/Utilities",
    "Other Outflows",
];

/// Whether a ledger transaction earns or spends money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Revenue,
    Expenditure,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expenditure => "expenditure",
        }
    }

    /// Recommended category labels for this type
    pub fn recommended_categories(&self) -> &'static [&'static str] {
        match self {
            Self::Revenue => REVENUE_CATEGORIES,
            Self::Expenditure => EXPENSE_CATEGORIES,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" | "income" => Ok(Self::Revenue),
            "expenditure" | "expense" => Ok(Self::Expenditure),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: revenue, expenditure)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a cash-flow entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Inflow,
    Outflow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }

    /// Recommended source labels for this direction
    pub fn recommended_sources(&self) -> &'static [&'static str] {
        match self {
            Self::Inflow => INFLOW_SOURCES,
            Self::Outflow => OUTFLOW_SOURCES,
        }
    }
}

impl std::str::FromStr for FlowType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inflow" | "in" => Ok(Self::Inflow),
            "outflow" | "out" => Ok(Self::Outflow),
            _ => Err(format!("Unknown flow type: {} (valid: inflow, outflow)", s)),
        }
    }
}

impl std::fmt::Display for FlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reject amounts that would break the non-negative magnitude invariant
fn validate_amount(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(Error::InvalidData(format!(
            "Amount must be non-negative (sign comes from the type), got {}",
            amount
        )));
    }
    Ok(())
}

/// A ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub description: Option<String>,
    /// Magnitude only, sign is implied by `kind`
    pub amount: Money,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A transaction before insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub description: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// A cash-flow entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub id: i64,
    pub flow_type: FlowType,
    pub source: String,
    pub description: Option<String>,
    /// Magnitude only, direction is implied by `flow_type`
    pub amount: Money,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A cash-flow entry before insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCashFlowEntry {
    pub flow_type: FlowType,
    pub source: String,
    pub description: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
}

impl NewCashFlowEntry {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// A budget target. Stored and listed, never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTarget {
    pub id: i64,
    pub category: String,
    pub target_amount: Money,
    /// Free-form period label, e.g. "monthly"
    pub period: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A budget target before insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudgetTarget {
    pub category: String,
    pub target_amount: Money,
    pub period: Option<String>,
}

impl NewBudgetTarget {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.target_amount)
    }
}

// ========== Aggregate Models ==========

/// Summed amount for one category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Money,
}

/// Revenue and expenses accumulated over one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Display label, e.g. "Jan 2024"
    pub month: String,
    pub revenue: Money,
    pub expenses: Money,
}

impl MonthlyBucket {
    /// First day of the month this bucket covers, recovered from the label
    pub fn month_start(&self) -> Option<NaiveDate> {
        crate::aggregate::parse_month_label(&self.month)
    }
}

/// Profit and loss totals, overall and for the as-of month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: Money,
    pub total_expenditure: Money,
    pub total_profit: Money,
    pub monthly_revenue: Money,
    pub monthly_expenditure: Money,
    pub monthly_profit: Money,
}

/// Net cash position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub total_inflow: Money,
    pub total_outflow: Money,
    pub net_cash_flow: Money,
}

/// Result of the local quick analysis over an uploaded table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAnalysis {
    pub inflow: Money,
    pub outflow: Money,
    pub net: Money,
    /// At most eight entries, largest magnitude first
    pub top_categories: Vec<CategoryTotal>,
}
