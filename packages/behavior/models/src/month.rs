//! Calendar month keys.
//!
//! Source tables spell months either as `YYYY-MM` or as a full date
//! (`YYYY-MM-DD`, optionally with a time part). Both normalise to the same
//! [`YearMonth`], which orders chronologically regardless of how the
//! original string was padded.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Error returned when a month string cannot be normalised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month '{input}': expected YYYY-MM or YYYY-MM-DD")]
pub struct MonthParseError {
    /// The string that failed to parse.
    pub input: String,
}

impl YearMonth {
    /// Creates a month from its components. Returns `None` when `month` is
    /// outside `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month of year, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month.
    #[must_use]
    pub const fn succ(self) -> Self {
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

    /// Returns the `count` consecutive months following `self`.
    #[must_use]
    pub fn following(self, count: usize) -> Vec<Self> {
        std::iter::successors(Some(self.succ()), |m| Some(m.succ()))
            .take(count)
            .collect()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || MonthParseError {
            input: s.to_string(),
        };

        // Full dates may carry a time suffix ("2023-05-31 00:00:00").
        let date_part = trimmed
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .unwrap_or(trimmed);

        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        NaiveDate::parse_from_str(&format!("{date_part}-01"), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| err())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = MonthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
