use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::time::days_in_month;

/// The month the calendar is currently showing.
///
/// `month` is zero-indexed (0 = January) so quarter arithmetic is a plain
/// `month / 3 * 3`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewedMonth {
    pub year: i32,
    pub month: u32,
}

impl ViewedMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month: month.min(11) }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month0() }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.days())
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Moves by whole months in either direction. Saturates at the ends of `i32` years.
    pub fn shift(&self, months: i32) -> Self {
        let total = self.year as i64 * 12 + self.month as i64 + months as i64;
        let year = total.div_euclid(12);
        let month = total.rem_euclid(12) as u32;
        match i32::try_from(year) {
            Ok(year) => Self { year, month },
            Err(_) if year < 0 => Self { year: i32::MIN, month: 0 },
            Err(_) => Self { year: i32::MAX, month: 11 },
        }
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    /// Calendar quarters: Jan-Mar, Apr-Jun, Jul-Sep, Oct-Dec.
    pub fn quarter_start_month(&self) -> u32 {
        self.month / 3 * 3
    }

    /// First day of the quarter and last day of its third month.
    pub fn quarter_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start_month = Self { year: self.year, month: self.quarter_start_month() };
        let end_month = Self { year: self.year, month: start_month.month + 2 };
        Some((start_month.first_day()?, end_month.last_day()?))
    }

    /// Header text such as `May 2024`.
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for ViewedMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

/// Parses `YYYY-MM` (1-based month on the wire).
pub fn parse_month(input: &str) -> Result<ViewedMonth, ParseError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d")
        .map(ViewedMonth::containing)
        .map_err(|_| ParseError::Month(input.to_string()))
}
