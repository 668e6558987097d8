//! Trend report windows.

use serde::Serialize;

use super::Period;
use crate::config::WindowConfig;
use crate::error::{EngineError, EngineResult};

/// A run of consecutive months requested for a trend report.
///
/// Construction validates the request, so a window that exists is always
/// in domain.
///
/// # Example
///
/// ```
/// use allocation_engine::config::WindowConfig;
/// use allocation_engine::models::PeriodWindow;
///
/// let window = PeriodWindow::new(2024, 11, 3, &WindowConfig::default()).unwrap();
/// let labels: Vec<String> = window.periods().iter().map(|p| p.to_string()).collect();
/// assert_eq!(labels, vec!["202411", "202412", "202501"]);
/// assert_eq!(window.title_suffix(), "2024/2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    start: Period,
    months: u32,
}

impl PeriodWindow {
    /// Validates and creates a window.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the month is outside 1–12, the month count is
    /// outside `1..=max_months`, the year is outside `[min_year, max_year]`,
    /// or the window would run past [`Period::MAX_YEAR`].
    pub fn new(
        start_year: i32,
        start_month: u32,
        months: u32,
        limits: &WindowConfig,
    ) -> EngineResult<Self> {
        if !(1..=12).contains(&start_month) {
            return Err(EngineError::invalid_request(
                "start_month",
                format!("{} is not between 1 and 12", start_month),
            ));
        }
        if months == 0 || months > limits.max_months {
            return Err(EngineError::invalid_request(
                "months",
                format!("{} is not between 1 and {}", months, limits.max_months),
            ));
        }
        if start_year < limits.min_year || start_year > limits.max_year {
            return Err(EngineError::invalid_request(
                "start_year",
                format!(
                    "{} is not between {} and {}",
                    start_year, limits.min_year, limits.max_year
                ),
            ));
        }

        let start = Period::new(start_year, start_month)?;
        let last_year = start_year + ((start_month - 1 + months - 1) / 12) as i32;
        if last_year > Period::MAX_YEAR {
            return Err(EngineError::invalid_request(
                "months",
                format!("window starting {} runs past year {}", start, Period::MAX_YEAR),
            ));
        }

        Ok(Self { start, months })
    }

    /// The first month of the window.
    pub fn start(&self) -> Period {
        self.start
    }

    /// Number of months in the window.
    pub fn months(&self) -> u32 {
        self.months
    }

    /// Every month of the window, in order.
    pub fn periods(&self) -> Vec<Period> {
        std::iter::successors(Some(self.start), |period| Some(period.next()))
            .take(self.months as usize)
            .collect()
    }

    /// Returns true if `period` falls inside the window.
    pub fn contains(&self, period: Period) -> bool {
        self.periods().contains(&period)
    }

    /// The window's months that appear in `available`, in chronological order.
    ///
    /// Months without data are skipped.
    ///
    /// # Errors
    ///
    /// `NoPeriodsAvailable` if none of the window's months are available.
    pub fn select<'a, I>(&self, available: I) -> EngineResult<Vec<Period>>
    where
        I: IntoIterator<Item = &'a Period>,
    {
        let available: Vec<Period> = available.into_iter().copied().collect();
        let selected: Vec<Period> = self
            .periods()
            .into_iter()
            .filter(|period| available.contains(period))
            .collect();

        if selected.is_empty() {
            return Err(EngineError::NoPeriodsAvailable {
                start: self.start.to_string(),
                months: self.months,
            });
        }
        Ok(selected)
    }

    /// Year label for report titles: `YYYY` for a window starting in
    /// January, `YYYY/YYYY+1` otherwise.
    pub fn title_suffix(&self) -> String {
        let year = self.start.year();
        if self.start.month() == 1 {
            year.to_string()
        } else {
            format!("{}/{}", year, year + 1)
        }
    }
}
