//! Monthly budget operations
//!
//! Budgets cache a derived `spent` total. Every status read recomputes the
//! sum over the month's expense transactions and writes it back, so the
//! stored row stays consistent for any other reader. Concurrent status reads
//! race on that refresh with last-write-wins semantics; that is accepted.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{AlertLevel, Budget, BudgetStatus};
use crate::month::MonthKey;

impl Database {
    /// Set or update the budget for (user, month)
    ///
    /// Upsert: an existing budget keeps its id, created_at, and cached
    /// `spent`; only the limit changes. A new budget starts with `spent = 0`.
    pub fn set_budget(&self, user_id: i64, month: MonthKey, limit: f64) -> Result<Budget> {
        if !limit.is_finite() || limit <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget limit must be positive: {}",
                limit
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (user_id, month, limit_amount)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, month)
            DO UPDATE SET limit_amount = excluded.limit_amount,
                          updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, month.to_string(), limit],
        )?;
        drop(conn);

        self.find_budget(user_id, month)?
            .ok_or_else(|| Error::NotFound(format!("Budget for {}", month)))
    }

    /// Fetch the stored budget for (user, month) without refreshing `spent`
    pub fn find_budget(&self, user_id: i64, month: MonthKey) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                r#"
                SELECT id, user_id, month, limit_amount, spent, created_at, updated_at
                FROM budgets WHERE user_id = ? AND month = ?
                "#,
                params![user_id, month.to_string()],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// Budget status for (user, month): refreshed `spent` plus alert level
    ///
    /// `NotFound` when no budget has been set for the month. A month with no
    /// expense transactions yields `spent = 0`.
    pub fn get_budget_status(&self, user_id: i64, month: MonthKey) -> Result<BudgetStatus> {
        let mut budget = self
            .find_budget(user_id, month)?
            .ok_or_else(|| Error::NotFound(format!("No budget set for {}", month)))?;

        let (start, end) = month.window();
        let conn = self.conn()?;
        let spent: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ? AND type = 'expense' AND date >= ? AND date < ?
            "#,
            params![user_id, start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;

        // Write-through refresh of the cached projection
        conn.execute(
            "UPDATE budgets SET spent = ? WHERE id = ?",
            params![spent, budget.id],
        )?;
        budget.spent = spent;

        let alert = AlertLevel::classify(budget.spent, budget.limit_amount);
        Ok(BudgetStatus { budget, alert })
    }

    /// Count all stored budgets
    pub fn count_budgets(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?)
    }

    fn row_to_budget(row: &Row<'_>) -> rusqlite::Result<Budget> {
        let month: String = row.get(2)?;
        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            month: month.parse().map_err(|e: Error| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
            limit_amount: row.get(3)?,
            spent: row.get(4)?,
            created_at: parse_datetime(&row.get::<_, String>(5)?),
            updated_at: parse_datetime(&row.get::<_, String>(6)?),
        })
    }
}
