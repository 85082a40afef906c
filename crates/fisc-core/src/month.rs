//! Calendar-month keys
//!
//! Budgets are keyed by the fixed `YYYY-MM` pattern. A key parses to the
//! first day of its month and yields the half-open date window
//! `[month-01, next-month-01)` used to filter transactions.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A calendar month (`YYYY-MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "Month out of range: {}",
                month
            )));
        }
        // Reject years chrono cannot represent as dates
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidData(format!("Year out of range: {}", year)));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of this month
    pub fn first_day(&self) -> NaiveDate {
        // Validated in the constructor
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| unreachable!("MonthKey holds a valid year/month"))
    }

    /// The following month, rolling over December into the next year
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Half-open date window covering this month: `[first, next_first)`
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next().first_day())
    }
}

impl std::str::FromStr for MonthKey {
    type Err = Error;

    /// Parse exactly `YYYY-MM`; anything else is invalid
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::InvalidData(format!("Invalid month key (use YYYY-MM): {:?}", s));

        let (year_str, month_str) = s.split_once('-').ok_or_else(|| malformed())?;
        if year_str.len() != 4
            || month_str.len() != 2
            || !year_str.bytes().all(|b| b.is_ascii_digit())
            || !month_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let year: i32 = year_str.parse().map_err(|_| malformed())?;
        let month: u32 = month_str.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_keys() {
        let key: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2025-03");
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in [
            "", "2025", "2025-", "2025-3", "2025-13", "2025-00", "25-03", "2025/03",
            "2025-03-01", "abcd-ef", " 2025-03",
        ] {
            assert!(bad.parse::<MonthKey>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn window_is_half_open() {
        let key: MonthKey = "2025-03".parse().unwrap();
        let (start, end) = key.window();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());

        // Last day of the month is inside the window
        let last = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert!(last >= start && last < end);
    }

    #[test]
    fn december_rolls_over_the_year() {
        let key: MonthKey = "2024-12".parse().unwrap();
        let (start, end) = key.window();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn serde_round_trip() {
        let key: MonthKey = "2025-11".parse().unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-11\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
