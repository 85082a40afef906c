//! Pure statistics projections
//!
//! Deterministic reductions over an already-fetched transaction list. No I/O
//! and no shared state; callers may invoke these concurrently.

use serde::Serialize;

use crate::models::{Transaction, TransactionType};

/// Income/expense totals for a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub count: usize,
    /// Mean absolute transaction size; 0 for an empty set
    pub average: f64,
}

/// Compute income/expense totals, net balance, count, and average size
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut income = 0.0;
    let mut expense = 0.0;

    for tx in transactions {
        match tx.kind {
            TransactionType::Income => income += tx.amount,
            TransactionType::Expense => expense += tx.amount,
        }
    }

    let count = transactions.len();
    let average = if count > 0 {
        (income + expense) / count as f64
    } else {
        0.0
    };

    Totals {
        income,
        expense,
        net: income - expense,
        count,
        average,
    }
}

/// One category's share of a type's spending or income
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub amount: f64,
    pub count: usize,
    /// Share of the type total across all categories, 0 when the total is 0
    pub percentage: f64,
}

/// Rank categories of the given type by amount, descending
///
/// Ties keep first-encountered order. Percentages are computed against the
/// total over all categories before the list is truncated to `limit`.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionType,
    limit: usize,
) -> Vec<CategorySummary> {
    // Group in first-encountered order so the later stable sort preserves it
    let mut groups: Vec<CategorySummary> = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        match groups.iter_mut().find(|g| g.category == tx.category) {
            Some(group) => {
                group.amount += tx.amount;
                group.count += 1;
            }
            None => groups.push(CategorySummary {
                category: tx.category.clone(),
                amount: tx.amount,
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let total: f64 = groups.iter().map(|g| g.amount).sum();
    for group in &mut groups {
        group.percentage = if total > 0.0 {
            group.amount / total * 100.0
        } else {
            0.0
        };
    }

    // Vec::sort_by is stable
    groups.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    groups.truncate(limit);
    groups
}
