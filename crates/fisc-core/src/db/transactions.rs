//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionType, TransactionUpdate};

/// Filters for listing a user's transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// Half-open `[start, end)` date window
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl TransactionFilter {
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }
}

impl Database {
    /// Insert a transaction for a user
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        if !tx.amount.is_finite() || tx.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Amount must be non-negative: {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, type, amount, category, wallet, date, note)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.kind.as_str(),
                tx.amount,
                tx.category,
                tx.wallet,
                tx.date.to_string(),
                tx.note,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Fetch a single transaction by id
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                r#"
                SELECT id, user_id, type, amount, category, wallet, date, note, created_at
                FROM transactions WHERE id = ?
                "#,
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        // Build dynamic WHERE clause
        let mut conditions = vec!["user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(kind) = filter.kind {
            conditions.push("type = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        if let Some((start, end)) = filter.date_range {
            conditions.push("date >= ? AND date < ?".to_string());
            params.push(Box::new(start.to_string()));
            params.push(Box::new(end.to_string()));
        }

        let sql = format!(
            r#"
            SELECT id, user_id, type, amount, category, wallet, date, note, created_at
            FROM transactions
            WHERE {}
            ORDER BY date DESC, id DESC
            "#,
            conditions.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(params_refs.as_slice(), Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Apply a partial update to a transaction
    ///
    /// The caller is responsible for the ownership check; this operates on
    /// the row id alone.
    pub fn update_transaction(&self, id: i64, update: &TransactionUpdate) -> Result<Transaction> {
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Amount must be non-negative: {}",
                    amount
                )));
            }
        }

        let conn = self.conn()?;

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(kind) = update.kind {
            sets.push("type = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }
        if let Some(amount) = update.amount {
            sets.push("amount = ?".to_string());
            params.push(Box::new(amount));
        }
        if let Some(ref category) = update.category {
            sets.push("category = ?".to_string());
            params.push(Box::new(category.clone()));
        }
        if let Some(ref wallet) = update.wallet {
            sets.push("wallet = ?".to_string());
            params.push(Box::new(wallet.clone()));
        }
        if let Some(date) = update.date {
            sets.push("date = ?".to_string());
            params.push(Box::new(date.to_string()));
        }
        if let Some(ref note) = update.note {
            sets.push("note = ?".to_string());
            params.push(Box::new(note.clone()));
        }

        if !sets.is_empty() {
            let sql = format!("UPDATE transactions SET {} WHERE id = ?", sets.join(", "));
            params.push(Box::new(id));
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            conn.execute(&sql, params_refs.as_slice())?;
        }

        drop(conn);
        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
    }

    /// Delete a transaction by id
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Transaction {}", id)));
        }
        Ok(())
    }

    /// Count all stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
        let kind: String = row.get(2)?;
        let date: String = row.get(6)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            kind: kind.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?,
            amount: row.get(3)?,
            category: row.get(4)?,
            wallet: row.get(5)?,
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
            note: row.get(7)?,
            created_at: parse_datetime(&row.get::<_, String>(8)?),
        })
    }
}
