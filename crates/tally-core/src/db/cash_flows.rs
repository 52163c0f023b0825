//! Cash-flow entry operations

use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{CashFlowEntry, NewCashFlowEntry};
use crate::money::Money;

const CASH_FLOW_COLUMNS: &str =
    "id, flow_type, source, description, amount_cents, date, created_at";

impl Database {
    /// Insert a cash-flow entry, returning its new ID
    pub fn insert_cash_flow(&self, entry: &NewCashFlowEntry) -> Result<i64> {
        entry.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO cash_flow (flow_type, source, description, amount_cents, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                entry.flow_type.as_str(),
                entry.source,
                entry.description,
                entry.amount.cents(),
                entry.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all cash-flow entries, newest first
    pub fn list_cash_flows(&self) -> Result<Vec<CashFlowEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cash_flow ORDER BY date DESC, id DESC",
            CASH_FLOW_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], |row| Self::row_to_cash_flow(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn get_cash_flow(&self, id: i64) -> Result<Option<CashFlowEntry>> {
        let conn = self.conn()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM cash_flow WHERE id = ?", CASH_FLOW_COLUMNS),
                params![id],
                |row| Self::row_to_cash_flow(row),
            )
            .optional()?;
        Ok(entry)
    }

    pub fn delete_cash_flow(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM cash_flow WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Cash flow entry {} not found", id)));
        }
        Ok(())
    }

    fn row_to_cash_flow(row: &rusqlite::Row) -> rusqlite::Result<CashFlowEntry> {
        let flow_type_str: String = row.get(1)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        Ok(CashFlowEntry {
            id: row.get(0)?,
            flow_type: parse_enum(1, &flow_type_str)?,
            source: row.get(2)?,
            description: row.get(3)?,
            amount: Money::from_cents(row.get(4)?),
            date: parse_date(5, &date_str)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
