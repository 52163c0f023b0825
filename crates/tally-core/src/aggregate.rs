//! Category and calendar-month aggregation
//!
//! Groups records by category label and by month for chart-style views.
//! Everything here is a pure function of its input slice.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate};

use crate::fields::{self, AdHocRow};
use crate::models::{
    CashFlowEntry, CategoryTotal, FlowType, MonthlyBucket, Transaction, TransactionType,
    UNCATEGORIZED,
};
use crate::money::Money;

/// chrono format of a bucket label, e.g. "Jan 2024"
pub const MONTH_LABEL_FORMAT: &str = "%b %Y";

/// A record that can be grouped by category
pub trait Categorized {
    fn amount(&self) -> Money;
    fn category(&self) -> Cow<'_, str>;
}

/// Typed records store a single label; an empty one is treated as missing
fn label_or_default(label: &str) -> Cow<'_, str> {
    if label.is_empty() {
        Cow::Borrowed(UNCATEGORIZED)
    } else {
        Cow::Borrowed(label)
    }
}

impl Categorized for Transaction {
    fn amount(&self) -> Money {
        self.amount
    }

    fn category(&self) -> Cow<'_, str> {
        label_or_default(&self.category)
    }
}

/// Cash-flow entries group by their source
impl Categorized for CashFlowEntry {
    fn amount(&self) -> Money {
        self.amount
    }

    fn category(&self) -> Cow<'_, str> {
        label_or_default(&self.source)
    }
}

/// Uploaded rows resolve both fields through candidate keys
impl Categorized for AdHocRow {
    fn amount(&self) -> Money {
        fields::resolve_amount(self)
    }

    fn category(&self) -> Cow<'_, str> {
        Cow::Owned(fields::resolve_category(self))
    }
}

/// Sum amounts per category label
///
/// Labels are compared exactly ("Food" and "food" are separate groups).
/// Groups come back in first-encounter order; callers that need a ranking
/// sort afterwards. The totals always add up to the sum of the inputs.
pub fn totals_by_category<'a, R, I>(records: I) -> Vec<CategoryTotal>
where
    R: Categorized + ?Sized + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for record in records {
        let amount = record.amount();
        let label = record.category();
        let existing = index.get(label.as_ref()).copied();
        match existing {
            Some(i) => totals[i].total += amount,
            None => {
                index.insert(label.to_string(), totals.len());
                totals.push(CategoryTotal {
                    name: label.into_owned(),
                    total: amount,
                });
            }
        }
    }

    totals
}

/// Category totals restricted to one transaction type, or all types when `None`
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: Option<TransactionType>,
) -> Vec<CategoryTotal> {
    totals_by_category(
        transactions
            .iter()
            .filter(|t| kind.map_or(true, |k| t.kind == k)),
    )
}

/// Cash-flow totals per source, restricted to one direction or both when `None`
pub fn cash_flow_by_source(
    entries: &[CashFlowEntry],
    flow_type: Option<FlowType>,
) -> Vec<CategoryTotal> {
    totals_by_category(
        entries
            .iter()
            .filter(|e| flow_type.map_or(true, |f| e.flow_type == f)),
    )
}

/// Order totals by descending magnitude and keep the first `limit`
///
/// The sort is stable: equal magnitudes keep their encounter order.
pub fn rank_by_magnitude(mut totals: Vec<CategoryTotal>, limit: usize) -> Vec<CategoryTotal> {
    totals.sort_by_key(|c| std::cmp::Reverse(c.total.abs()));
    totals.truncate(limit);
    totals
}

/// First day of the date's month
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Render a month as its bucket label
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

/// Recover the first day of the month from a bucket label
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("01 {}", label.trim()), "%d %b %Y").ok()
}

/// Accumulate revenue and expenses per calendar month
///
/// Buckets are ordered by the month they cover, never by label text or by
/// the order records were seen in.
pub fn monthly_buckets<'a, I>(transactions: I) -> Vec<MonthlyBucket>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut months: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for tx in transactions {
        let entry = months.entry(month_start(tx.date)).or_default();
        match tx.kind {
            TransactionType::Revenue => entry.0 += tx.amount,
            TransactionType::Expenditure => entry.1 += tx.amount,
        }
    }

    months
        .into_iter()
        .map(|(month, (revenue, expenses))| MonthlyBucket {
            month: month_label(month),
            revenue,
            expenses,
        })
        .collect()
}

/// Sort buckets chronologically by re-parsing their labels
///
/// Buckets whose label cannot be parsed sort last, in their original order.
pub fn sort_buckets_chronologically(buckets: &mut [MonthlyBucket]) {
    buckets.sort_by_key(|bucket| match bucket.month_start() {
        Some(date) => (0, date),
        None => (1, NaiveDate::MIN),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn tx(kind: TransactionType, category: &str, amount: &str, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            kind,
            category: category.to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn entry(flow_type: FlowType, source: &str, amount: &str) -> CashFlowEntry {
        CashFlowEntry {
            id: 0,
            flow_type,
            source: source.to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date: d(2024, 4, 1),
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn total(name: &str, cents: i64) -> CategoryTotal {
        CategoryTotal {
            name: name.into(),
            total: Money::from_cents(cents),
        }
    }

    fn bucket(month: &str, revenue: i64, expenses: i64) -> MonthlyBucket {
        MonthlyBucket {
            month: month.into(),
            revenue: Money::from_cents(revenue),
            expenses: Money::from_cents(expenses),
        }
    }

    #[test]
    fn test_totals_by_category_groups_and_sums() {
        let txs = vec![
            tx(TransactionType::Expenditure, "Rent", "1000", d(2024, 1, 1)),
            tx(TransactionType::Expenditure, "Travel", "250", d(2024, 1, 5)),
            tx(TransactionType::Expenditure, "Rent", "1000", d(2024, 2, 1)),
        ];

        let totals = totals_by_category(&txs);

        assert_eq!(totals, vec![total("Rent", 200_000), total("Travel", 25_000)]);
    }

    #[test]
    fn test_totals_reconcile_with_summary() {
        let txs = vec![
            tx(TransactionType::Revenue, "Sales", "55.29", d(2024, 1, 1)),
            tx(TransactionType::Revenue, "Consulting", "34.57", d(2024, 1, 2)),
            tx(TransactionType::Expenditure, "Travel", "19.99", d(2024, 1, 3)),
            tx(TransactionType::Revenue, "Sales", "67.68", d(2024, 1, 4)),
            tx(TransactionType::Expenditure, "", "0.07", d(2024, 1, 5)),
            tx(TransactionType::Revenue, "Consulting", "76.09", d(2024, 1, 6)),
            tx(TransactionType::Expenditure, "Travel", "1234.56", d(2024, 1, 7)),
        ];

        let grouped: Money = totals_by_category(&txs).iter().map(|c| c.total).sum();
        let input: Money = txs.iter().map(|t| t.amount).sum();
        assert_eq!(grouped, input);

        let summary = crate::summary::summarize_transactions(&txs, d(2024, 1, 31));
        assert_eq!(grouped, summary.total_revenue + summary.total_expenditure);
        assert_eq!(summary.total_revenue, Money::from_cents(23_363));

        let revenue: Money = category_breakdown(&txs, Some(TransactionType::Revenue))
            .iter()
            .map(|c| c.total)
            .sum();
        assert_eq!(revenue, summary.total_revenue);
    }

    #[test]
    fn test_category_matching_is_exact() {
        let txs = vec![
            tx(TransactionType::Expenditure, "Food", "1", d(2024, 1, 1)),
            tx(TransactionType::Expenditure, "food", "2", d(2024, 1, 1)),
            tx(TransactionType::Expenditure, "Food ", "3", d(2024, 1, 1)),
        ];
        assert_eq!(totals_by_category(&txs).len(), 3);
    }

    #[test]
    fn test_empty_label_groups_as_uncategorized() {
        let txs = vec![tx(TransactionType::Expenditure, "", "5", d(2024, 1, 1))];
        assert_eq!(totals_by_category(&txs)[0].name, UNCATEGORIZED);
    }

    #[test]
    fn test_ad_hoc_rows_group_through_candidate_keys() {
        let rows: Vec<AdHocRow> = vec![
            json!({"category": "Food", "amount": 5}),
            json!({"Category": "Food", "Amount": "2.5"}),
            json!({"amount": -1}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect();

        let totals = totals_by_category(&rows);
        assert_eq!(totals[0], total("Food", 750));
        assert_eq!(totals[1], total(UNCATEGORIZED, -100));
    }

    #[test]
    fn test_category_breakdown_filters_by_type() {
        let txs = vec![
            tx(TransactionType::Revenue, "Consulting", "500", d(2024, 1, 1)),
            tx(TransactionType::Expenditure, "Travel", "80", d(2024, 1, 2)),
        ];

        let expenses = category_breakdown(&txs, Some(TransactionType::Expenditure));
        assert_eq!(expenses, vec![total("Travel", 8_000)]);
        assert_eq!(category_breakdown(&txs, None).len(), 2);
    }

    #[test]
    fn test_cash_flow_by_source() {
        let entries = vec![
            entry(FlowType::Inflow, "Customer Payments", "1000"),
            entry(FlowType::Outflow, "Payroll", "600.10"),
            entry(FlowType::Inflow, "Customer Payments", "250.25"),
            entry(FlowType::Outflow, "", "3"),
        ];

        assert_eq!(
            cash_flow_by_source(&entries, Some(FlowType::Inflow)),
            vec![total("Customer Payments", 125_025)]
        );
        assert_eq!(
            cash_flow_by_source(&entries, Some(FlowType::Outflow)),
            vec![total("Payroll", 60_010), total(UNCATEGORIZED, 300)]
        );
        assert_eq!(cash_flow_by_source(&entries, None).len(), 3);
    }

    #[test]
    fn test_rank_by_magnitude_is_stable() {
        let totals = vec![
            total("a", 500),
            total("b", -1_000),
            total("c", -500),
            total("d", 100),
        ];

        let ranked = rank_by_magnitude(totals, 3);
        let names: Vec<_> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_month_label_round_trip() {
        assert_eq!(month_label(d(2024, 1, 15)), "Jan 2024");
        assert_eq!(parse_month_label("Jan 2024"), Some(d(2024, 1, 1)));
        assert_eq!(parse_month_label("Sep 1999"), Some(d(1999, 9, 1)));
        assert_eq!(parse_month_label("Smarch 2024"), None);
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(d(2024, 2, 29)), d(2024, 2, 1));
        assert_eq!(month_start(d(2024, 3, 1)), d(2024, 3, 1));
    }

    #[test]
    fn test_monthly_buckets_split_revenue_and_expenses() {
        let txs = vec![
            tx(TransactionType::Revenue, "Sales Revenue", "100", d(2024, 1, 15)),
            tx(TransactionType::Expenditure, "Rent", "40", d(2024, 1, 20)),
            tx(TransactionType::Revenue, "Sales Revenue", "50", d(2024, 2, 1)),
        ];

        let buckets = monthly_buckets(&txs);

        assert_eq!(
            buckets,
            vec![
                bucket("Jan 2024", 10_000, 4_000),
                bucket("Feb 2024", 5_000, 0),
            ]
        );
    }

    #[test]
    fn test_monthly_buckets_ordered_across_year_boundary() {
        // Newest first, as the store returns them
        let txs = vec![
            tx(TransactionType::Revenue, "Consulting", "10", d(2024, 1, 3)),
            tx(TransactionType::Revenue, "Consulting", "20", d(2023, 12, 28)),
            tx(TransactionType::Expenditure, "Travel", "5", d(2023, 2, 10)),
        ];

        let months: Vec<_> = monthly_buckets(&txs).into_iter().map(|b| b.month).collect();
        assert_eq!(months, vec!["Feb 2023", "Dec 2023", "Jan 2024"]);
    }

    #[test]
    fn test_sort_buckets_chronologically_uses_dates_not_labels() {
        let mut buckets = vec![
            bucket("Jan 2024", 100, 0),
            bucket("garbage", 0, 0),
            bucket("Dec 2023", 200, 0),
            bucket("Feb 2023", 300, 0),
        ];

        sort_buckets_chronologically(&mut buckets);

        let months: Vec<_> = buckets.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, vec!["Feb 2023", "Dec 2023", "Jan 2024", "garbage"]);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let txs = vec![
            tx(TransactionType::Revenue, "Consulting", "0.1", d(2024, 1, 3)),
            tx(TransactionType::Expenditure, "Travel", "0.2", d(2024, 1, 4)),
            tx(TransactionType::Revenue, "Consulting", "0.3", d(2024, 2, 5)),
        ];
        assert_eq!(monthly_buckets(&txs), monthly_buckets(&txs));
        assert_eq!(totals_by_category(&txs), totals_by_category(&txs));
        assert_eq!(totals_by_category(&txs)[0], total("Consulting", 40));
    }
}
