use chrono::{Datelike, NaiveDate};

use crate::model::goal::WeekdayMask;
use crate::model::month::ViewedMonth;
use crate::time::{end_of_day, start_of_day};

/// Working days in `[start, end]` inclusive.
///
/// Both bounds are required: a half-open range has no finite count, so a
/// missing bound yields 0, as does a reversed range.
pub fn count_in_range(start: Option<NaiveDate>, end: Option<NaiveDate>, mask: &WeekdayMask) -> u32 {
    let (Some(start), Some(end)) = (start, end) else {
        return 0;
    };
    if end_of_day(end) < start_of_day(start) {
        return 0;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| mask.is_working(day.weekday()))
        .count() as u32
}

/// Working days in the calendar month `month` belongs to.
pub fn count_in_month(month: ViewedMonth, mask: &WeekdayMask) -> u32 {
    (1..=month.days())
        .filter_map(|day| NaiveDate::from_ymd_opt(month.year, month.month + 1, day))
        .filter(|date| mask.is_working(date.weekday()))
        .count() as u32
}
