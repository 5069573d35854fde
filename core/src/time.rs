use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::ParseError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of days in a month, `month` being zero-indexed (0 = January).
///
/// Computed as the day before the first of the following month. Years
/// outside chrono's representable range yield 0, which downstream code
/// treats as "no working days".
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month > 11 {
        return 0;
    }
    let (next_year, next_month) = if month == 11 {
        match year.checked_add(1) {
            Some(y) => (y, 1),
            None => return 0,
        }
    } else {
        (year, month + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| chrono::Datelike::day(&last))
        .unwrap_or(0)
}

/// 00:00:00.000 on the given day.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on the given day, used as an inclusive upper bound.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_milli)
}

/// Canonical `YYYY-MM-DD` key. Sorts lexicographically in date order for
/// four-digit years.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).map_err(|_| ParseError::Date(key.to_string()))
}

/// Blank means "unset", which is how the settings record stores a missing bound.
pub fn parse_optional_date(input: &str) -> Result<Option<NaiveDate>, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date_key(input).map(Some)
}

/// Accepts keywords, relative offsets (`+3d`, `-1w`, `+2m`) and `YYYY-MM-DD`,
/// resolved against `today`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return today.succ_opt().ok_or_else(|| ParseError::Date(input.to_string())),
        "yesterday" | "yest" => return today.pred_opt().ok_or_else(|| ParseError::Date(input.to_string())),
        _ => {}
    }

    if let Some(date) = parse_relative(trimmed, today) {
        return Ok(date);
    }

    parse_date_key(trimmed)
}

fn parse_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (negative, rest) = match input.chars().next()? {
        '+' => (false, &input[1..]),
        '-' => (true, &input[1..]),
        _ => return None,
    };
    let (unit_index, _) = rest.char_indices().last()?;
    if unit_index == 0 {
        return None;
    }
    let (num_str, unit) = rest.split_at(unit_index);
    let count: u32 = num_str.parse().ok()?;

    match unit.to_lowercase().as_str() {
        "d" | "w" => {
            let days = if unit.eq_ignore_ascii_case("w") { count as i64 * 7 } else { count as i64 };
            let delta = Duration::days(days);
            if negative {
                today.checked_sub_signed(delta)
            } else {
                today.checked_add_signed(delta)
            }
        }
        "m" => {
            if negative {
                today.checked_sub_months(Months::new(count))
            } else {
                today.checked_add_months(Months::new(count))
            }
        }
        _ => None,
    }
}

pub fn parse_weekday(s: &str) -> Result<Weekday, ParseError> {
    match s.trim().to_lowercase().as_str() {
        "sun" | "sunday" => Ok(Weekday::Sun),
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        _ => Err(ParseError::Weekday(s.to_string())),
    }
}
