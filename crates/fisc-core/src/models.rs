//! Domain models for fisc

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// A registered user
///
/// The password hash lives only in the database; it is never part of the
/// serialized model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always non-negative; direction comes from `kind`
    pub amount: f64,
    pub category: String,
    pub wallet: String,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A new transaction to be inserted
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub wallet: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Partial update of a transaction; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub wallet: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<Option<String>>,
}

/// A per-user, per-month spending budget
///
/// `spent` is a cached projection of the user's expense transactions for the
/// month; every `get_budget_status` read recomputes and persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub month: MonthKey,
    #[serde(rename = "limit")]
    pub limit_amount: f64,
    pub spent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Alert classification of spent-vs-limit
///
/// Evaluated in strict order: exceeded first, then near_limit, else none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    None,
    NearLimit,
    Exceeded,
}

impl AlertLevel {
    /// Near-limit threshold as a fraction of the limit
    pub const NEAR_LIMIT_RATIO: f64 = 0.8;

    /// Classify `spent` against `limit`
    pub fn classify(spent: f64, limit: f64) -> Self {
        if spent >= limit {
            Self::Exceeded
        } else if spent >= limit * Self::NEAR_LIMIT_RATIO {
            Self::NearLimit
        } else {
            Self::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::NearLimit => "near_limit",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budget with its freshly computed alert level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub alert: AlertLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_thresholds() {
        assert_eq!(AlertLevel::classify(100.0, 100.0), AlertLevel::Exceeded);
        assert_eq!(AlertLevel::classify(150.0, 100.0), AlertLevel::Exceeded);
        assert_eq!(AlertLevel::classify(80.0, 100.0), AlertLevel::NearLimit);
        assert_eq!(AlertLevel::classify(99.99, 100.0), AlertLevel::NearLimit);
        assert_eq!(AlertLevel::classify(79.99, 100.0), AlertLevel::None);
        assert_eq!(AlertLevel::classify(0.0, 100.0), AlertLevel::None);
    }

    #[test]
    fn alert_order_is_exceeded_first() {
        // A zero limit makes both thresholds true; exceeded must win
        assert_eq!(AlertLevel::classify(0.0, 0.0), AlertLevel::Exceeded);
    }

    #[test]
    fn transaction_type_round_trip() {
        assert_eq!("income".parse::<TransactionType>().unwrap().as_str(), "income");
        assert_eq!("Expense".parse::<TransactionType>().unwrap().as_str(), "expense");
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
