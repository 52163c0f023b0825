//! Profit and loss summary
//!
//! The monthly figures are scoped to the calendar month of an explicit as-of
//! date. Callers pass "today" at the edge; nothing in here reads the clock.

use chrono::{Datelike, NaiveDate};

use crate::models::{FinancialSummary, Transaction, TransactionType};
use crate::money::Money;

/// Revenue and expenditure sums over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    revenue: Money,
    expenditure: Money,
}

impl Totals {
    fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TransactionType::Revenue => self.revenue += tx.amount,
            TransactionType::Expenditure => self.expenditure += tx.amount,
        }
    }

    fn profit(&self) -> Money {
        self.revenue - self.expenditure
    }
}

/// Whether `date` falls in the same calendar month and year as `as_of`
pub fn in_month_of(date: NaiveDate, as_of: NaiveDate) -> bool {
    date.year() == as_of.year() && date.month() == as_of.month()
}

/// Compute overall and as-of-month revenue, expenditure and profit
pub fn summarize_transactions(transactions: &[Transaction], as_of: NaiveDate) -> FinancialSummary {
    let mut total = Totals::default();
    let mut monthly = Totals::default();

    for tx in transactions {
        total.add(tx);
        if in_month_of(tx.date, as_of) {
            monthly.add(tx);
        }
    }

    FinancialSummary {
        total_revenue: total.revenue,
        total_expenditure: total.expenditure,
        total_profit: total.profit(),
        monthly_revenue: monthly.revenue,
        monthly_expenditure: monthly.expenditure,
        monthly_profit: monthly.profit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(kind: TransactionType, amount: &str, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            kind,
            category: "Other".to_string(),
            description: None,
            amount: amount.parse().unwrap(),
            date,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn usd(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            tx(TransactionType::Revenue, "100", d(2024, 1, 15)),
            tx(TransactionType::Expenditure, "40", d(2024, 1, 20)),
            tx(TransactionType::Revenue, "50", d(2024, 2, 1)),
        ]
    }

    #[test]
    fn test_totals() {
        let summary = summarize_transactions(&scenario(), d(2024, 2, 10));
        assert_eq!(summary.total_revenue, usd(15000));
        assert_eq!(summary.total_expenditure, usd(4000));
        assert_eq!(summary.total_profit, usd(11000));
    }

    #[test]
    fn test_monthly_scope_follows_as_of() {
        let txs = scenario();

        let feb = summarize_transactions(&txs, d(2024, 2, 10));
        assert_eq!(feb.monthly_revenue, usd(5000));
        assert_eq!(feb.monthly_expenditure, Money::ZERO);
        assert_eq!(feb.monthly_profit, usd(5000));

        let jan = summarize_transactions(&txs, d(2024, 1, 31));
        assert_eq!(jan.monthly_revenue, usd(10000));
        assert_eq!(jan.monthly_expenditure, usd(4000));
        assert_eq!(jan.monthly_profit, usd(6000));

        // Totals do not depend on the as-of date
        assert_eq!(jan.total_profit, feb.total_profit);
    }

    #[test]
    fn test_same_month_other_year_is_excluded() {
        let txs = vec![tx(TransactionType::Revenue, "10", d(2023, 2, 5))];
        let summary = summarize_transactions(&txs, d(2024, 2, 5));
        assert_eq!(summary.monthly_revenue, Money::ZERO);
        assert_eq!(summary.total_revenue, usd(1000));
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_transactions(&[], d(2024, 1, 1));
        assert_eq!(summary, FinancialSummary::default());
        assert_eq!(summary.total_profit, Money::ZERO);
    }

    #[test]
    fn test_profit_may_be_negative() {
        let txs = vec![
            tx(TransactionType::Revenue, "10", d(2024, 1, 1)),
            tx(TransactionType::Expenditure, "25.5", d(2024, 1, 2)),
        ];
        let summary = summarize_transactions(&txs, d(2024, 1, 3));
        assert_eq!(summary.total_profit, usd(-1550));
        assert_eq!(
            summary.total_profit,
            summary.total_revenue - summary.total_expenditure
        );
    }

    #[test]
    fn test_recomputation_is_identical() {
        let txs = scenario();
        let as_of = d(2024, 1, 20);
        assert_eq!(
            summarize_transactions(&txs, as_of),
            summarize_transactions(&txs, as_of)
        );
    }
}
