//! Transaction operations

use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};
use crate::money::Money;

const TRANSACTION_COLUMNS: &str = "id, type, category, description, amount_cents, date, created_at";

impl Database {
    /// Insert a transaction, returning its new ID
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (type, category, description, amount_cents, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                tx.kind.as_str(),
                tx.category,
                tx.description,
                tx.amount.cents(),
                tx.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all transactions, newest first
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map([], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE id = ?",
            TRANSACTION_COLUMNS
        ))?;

        let transaction = stmt
            .query_row(params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// Replace every editable field of a transaction
    pub fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()> {
        tx.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET type = ?, category = ?, description = ?, amount_cents = ?, date = ?
            WHERE id = ?
            "#,
            params![
                tx.kind.as_str(),
                tx.category,
                tx.description,
                tx.amount.cents(),
                tx.date.to_string(),
                id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// Delete a transaction
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction {} not found", id)));
        }
        Ok(())
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(1)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        Ok(Transaction {
            id: row.get(0)?,
            kind: parse_enum(1, &kind_str)?,
            category: row.get(2)?,
            description: row.get(3)?,
            amount: Money::from_cents(row.get(4)?),
            date: parse_date(5, &date_str)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
