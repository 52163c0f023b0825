//! Budget target operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{BudgetTarget, NewBudgetTarget};
use crate::money::Money;

impl Database {
    pub fn insert_budget_target(&self, target: &NewBudgetTarget) -> Result<i64> {
        target.validate()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budget_targets (category, target_cents, period) VALUES (?, ?, ?)",
            params![target.category, target.target_amount.cents(), target.period],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List budget targets, most recently created first
    pub fn list_budget_targets(&self) -> Result<Vec<BudgetTarget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, category, target_cents, period, created_at
             FROM budget_targets
             ORDER BY created_at DESC, id DESC",
        )?;

        let targets = stmt
            .query_map([], |row| {
                let created_at_str: String = row.get(4)?;
                Ok(BudgetTarget {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    target_amount: Money::from_cents(row.get(2)?),
                    period: row.get(3)?,
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(targets)
    }

    pub fn delete_budget_target(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM budget_targets WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Budget target {} not found", id)));
        }
        Ok(())
    }
}
