//! Reporting period model.
//!
//! A [`Period`] is one calendar month, written as a six character
//! `YYYYMM` label wherever it crosses a table or file boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month used as the unit of time-series aggregation.
///
/// # Example
///
/// ```
/// use allocation_engine::models::Period;
///
/// let period: Period = "202512".parse().unwrap();
/// assert_eq!(period.next().to_string(), "202601");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Last year a `YYYYMM` label can carry.
    pub const MAX_YEAR: i32 = 9999;

    /// Creates a period, rejecting months outside 1..=12 and years that
    /// cannot be written with four digits.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::invalid_request(
                "month",
                format!("{} is not between 1 and 12", month),
            ));
        }
        if !(0..=Self::MAX_YEAR).contains(&year) {
            return Err(EngineError::invalid_request(
                "year",
                format!("{} cannot be written as YYYY", year),
            ));
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the following month, rolling December into January.
    pub fn next(&self) -> Self {
        let following = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|date| date.checked_add_months(Months::new(1)));
        match following {
            Some(date) => Self {
                year: date.year(),
                month: date.month(),
            },
            None if self.month == 12 => Self {
                year: self.year + 1,
                month: 1,
            },
            None => Self {
                year: self.year,
                month: self.month + 1,
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.len() != 6 || !label.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::invalid_request(
                "period",
                format!("'{}' is not a YYYYMM label", s),
            ));
        }
        let year = label[..4].parse::<i32>().map_err(|e| {
            EngineError::invalid_request("period", format!("'{}': {}", s, e))
        })?;
        let month = label[4..].parse::<u32>().map_err(|e| {
            EngineError::invalid_request("period", format!("'{}': {}", s, e))
        })?;
        Self::new(year, month)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_display_zero_pads_month() {
        let period = Period::new(2025, 7).unwrap();
        assert_eq!(period.to_string(), "202507");
    }

    #[test]
    fn test_parse_label() {
        let period: Period = "202311".parse().unwrap();
        assert_eq!(period.year(), 2023);
        assert_eq!(period.month(), 11);
    }

    #[test]
    fn test_parse_rejects_short_label() {
        let result = "20231".parse::<Period>();
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_parse_rejects_month_thirteen() {
        assert!("202313".parse::<Period>().is_err());
        assert!("202300".parse::<Period>().is_err());
    }

    #[test]
    fn test_next_rolls_over_year() {
        let december = Period::new(2023, 12).unwrap();
        assert_eq!(december.next(), Period::new(2024, 1).unwrap());
    }

    #[test]
    fn test_periods_order_chronologically() {
        let mut periods = vec![
            Period::new(2024, 1).unwrap(),
            Period::new(2023, 12).unwrap(),
            Period::new(2023, 2).unwrap(),
        ];
        periods.sort();
        let labels: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
        assert_eq!(labels, vec!["202302", "202312", "202401"]);
    }

    #[test]
    fn test_serializes_as_label() {
        let period = Period::new(2025, 3).unwrap();
        assert_eq!(serde_json::to_string(&period).unwrap(), "\"202503\"");
        let parsed: Period = serde_json::from_str("\"202503\"").unwrap();
        assert_eq!(parsed, period);
    }
}
