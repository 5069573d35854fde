use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ParseError;
use crate::format::money;
use crate::model::lenient;
use crate::time::{date_key, parse_weekday};

pub const DEFAULT_GOAL_NAME: &str = "Goal";
pub const DEFAULT_GOAL_AMOUNT: f64 = 500_000.0;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Which weekdays count as working days, indexed Sunday = 0 .. Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayMask([bool; 7]);

impl WeekdayMask {
    pub const NONE: WeekdayMask = WeekdayMask([false; 7]);
    pub const ALL: WeekdayMask = WeekdayMask([true; 7]);
    pub const MON_TO_FRI: WeekdayMask = WeekdayMask([false, true, true, true, true, true, false]);
    pub const MON_TO_SAT: WeekdayMask = WeekdayMask([false, true, true, true, true, true, true]);

    pub fn from_flags(flags: [bool; 7]) -> Self {
        Self(flags)
    }

    pub fn flags(&self) -> [bool; 7] {
        self.0
    }

    pub fn is_working(&self, weekday: Weekday) -> bool {
        self.0[weekday.num_days_from_sunday() as usize]
    }

    pub fn set(&mut self, weekday: Weekday, working: bool) {
        self.0[weekday.num_days_from_sunday() as usize] = working;
    }

    /// Working days in one calendar week.
    pub fn working_count(&self) -> u32 {
        self.0.iter().filter(|&&w| w).count() as u32
    }

    /// Sunday first, Saturday last.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, bool)> + '_ {
        ALL_WEEKDAYS.iter().map(move |&wd| (wd, self.is_working(wd)))
    }
}

impl Default for WeekdayMask {
    fn default() -> Self {
        WeekdayMask::MON_TO_SAT
    }
}

impl fmt::Display for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .iter()
            .filter(|(_, working)| *working)
            .map(|(wd, _)| wd.to_string())
            .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

// Persisted as {"0": bool, ..., "6": bool}.
impl Serialize for WeekdayMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<String, bool> = self
            .0
            .iter()
            .enumerate()
            .map(|(i, &working)| (i.to_string(), working))
            .collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WeekdayMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let mut flags = [false; 7];
        match value {
            Value::Object(map) => {
                for (key, flag) in map {
                    if let Ok(i) = key.trim().parse::<usize>() {
                        if i < 7 {
                            flags[i] = lenient::truthy(&flag);
                        }
                    }
                }
            }
            Value::Array(items) => {
                for (i, flag) in items.iter().take(7).enumerate() {
                    flags[i] = lenient::truthy(flag);
                }
            }
            _ => return Ok(WeekdayMask::default()),
        }
        Ok(WeekdayMask(flags))
    }
}

/// Parses lists such as `mon,tue,fri`, `mon-fri`, `weekdays`, `all` or `none`.
/// Digits 0-6 are accepted as Sunday-based indices.
pub fn parse_weekdays(input: &str) -> Result<WeekdayMask, ParseError> {
    let tokens: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(ParseError::Weekday(input.to_string()));
    }

    let mut mask = WeekdayMask::NONE;
    for token in tokens {
        match token.to_lowercase().as_str() {
            "all" | "every" => mask = WeekdayMask::ALL,
            "none" => mask = WeekdayMask::NONE,
            "weekdays" => {
                for (wd, working) in WeekdayMask::MON_TO_FRI.iter() {
                    if working {
                        mask.set(wd, true);
                    }
                }
            }
            "weekends" => {
                mask.set(Weekday::Sat, true);
                mask.set(Weekday::Sun, true);
            }
            _ => {
                if let Some((from, to)) = token.split_once('-') {
                    let mut day = weekday_token(from)?;
                    let last = weekday_token(to)?;
                    mask.set(day, true);
                    while day != last {
                        day = day.succ();
                        mask.set(day, true);
                    }
                } else {
                    mask.set(weekday_token(token)?, true);
                }
            }
        }
    }
    Ok(mask)
}

fn weekday_token(token: &str) -> Result<Weekday, ParseError> {
    if let Ok(i) = token.trim().parse::<usize>() {
        return ALL_WEEKDAYS
            .get(i)
            .copied()
            .ok_or_else(|| ParseError::Weekday(token.to_string()));
    }
    parse_weekday(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

/// Only `"light"` selects the light palette; any other stored value,
/// including `null` or a number, reads as dark.
impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Theme::from(s),
            _ => Theme::Dark,
        })
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

pub fn parse_theme(input: &str) -> Result<Theme, ParseError> {
    match input.trim().to_lowercase().as_str() {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        _ => Err(ParseError::Theme(input.to_string())),
    }
}

/// Goal settings as persisted in `settings.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GoalConfig {
    #[serde(rename = "goalName", deserialize_with = "lenient::deserialize_string")]
    pub name: String,

    #[serde(rename = "goalAmount", deserialize_with = "lenient::deserialize_number")]
    pub amount: f64,

    #[serde(rename = "goalStart", with = "optional_date")]
    pub start_date: Option<NaiveDate>,

    #[serde(rename = "goalEnd", with = "optional_date")]
    pub end_date: Option<NaiveDate>,

    pub theme: Theme,

    #[serde(rename = "weekdays")]
    pub weekday_mask: WeekdayMask,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_GOAL_NAME.to_string(),
            amount: DEFAULT_GOAL_AMOUNT,
            start_date: None,
            end_date: None,
            theme: Theme::default(),
            weekday_mask: WeekdayMask::default(),
        }
    }
}

impl GoalConfig {
    /// Cleans a settings record at the boundary so the pacing math can
    /// assume a trimmed name and a finite, non-negative amount.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_GOAL_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        if !self.amount.is_finite() || self.amount < 0.0 {
            self.amount = 0.0;
        }
        self
    }

    pub fn range_label(&self) -> String {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => format!("{} → {}", date_key(start), date_key(end)),
            (Some(start), None) => format!("from {}", date_key(start)),
            (None, Some(end)) => format!("until {}", date_key(end)),
            (None, None) => "no range".to_string(),
        }
    }

    /// One-line header text, e.g. `Q3 Sales — $90,000 (2024-07-01 → 2024-09-30)`.
    pub fn summary(&self) -> String {
        let name = if self.name.is_empty() { DEFAULT_GOAL_NAME } else { self.name.as_str() };
        format!("{} — {} ({})", name, money(self.amount), self.range_label())
    }
}

/// `None` <-> `""`, matching how unset date inputs were always stored.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    use crate::time::{date_key, parse_optional_date};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&date_key(*d)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => match parse_optional_date(&s) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!("ignoring stored goal date: {}", e);
                    None
                }
            },
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_mask_is_monday_to_saturday() {
        let mask = WeekdayMask::default();
        assert!(!mask.is_working(Weekday::Sun));
        assert!(mask.is_working(Weekday::Mon));
        assert!(mask.is_working(Weekday::Sat));
        assert_eq!(mask.working_count(), 6);
    }

    #[test]
    fn test_mask_iterates_sunday_first() {
        let order: Vec<Weekday> = WeekdayMask::ALL.iter().map(|(wd, _)| wd).collect();
        assert_eq!(order.first(), Some(&Weekday::Sun));
        assert_eq!(order.last(), Some(&Weekday::Sat));
        assert_eq!(order.len(), 7);
    }

    #[test]
    fn test_parse_weekdays() {
        assert_eq!(parse_weekdays("mon-fri").unwrap(), WeekdayMask::MON_TO_FRI);
        assert_eq!(parse_weekdays("weekdays,sat").unwrap(), WeekdayMask::MON_TO_SAT);
        assert_eq!(parse_weekdays("none").unwrap(), WeekdayMask::NONE);
        assert_eq!(parse_weekdays("all").unwrap(), WeekdayMask::ALL);

        let wrapped = parse_weekdays("fri-mon").unwrap();
        assert_eq!(wrapped.flags(), [true, true, false, false, false, true, true]);

        let digits = parse_weekdays("1 3 5").unwrap();
        assert_eq!(digits.flags(), [false, true, false, true, false, true, false]);

        assert!(parse_weekdays("").is_err());
        assert!(parse_weekdays("mon,funday").is_err());
        assert!(parse_weekdays("9").is_err());
    }

    #[test]
    fn test_settings_record_round_trips_in_persisted_shape() {
        let goal = GoalConfig {
            name: "Q1".to_string(),
            amount: 10_000.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: None,
            theme: Theme::Light,
            weekday_mask: WeekdayMask::MON_TO_FRI,
        };
        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(
            value,
            json!({
                "goalName": "Q1",
                "goalAmount": 10000.0,
                "goalStart": "2024-01-01",
                "goalEnd": "",
                "theme": "light",
                "weekdays": {"0": false, "1": true, "2": true, "3": true, "4": true, "5": true, "6": false}
            })
        );
        let back: GoalConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, goal);
    }

    #[test]
    fn test_settings_record_tolerates_legacy_values() {
        let goal: GoalConfig = serde_json::from_value(json!({
            "goalName": "Legacy",
            "goalAmount": "2500",
            "goalStart": "not a date",
            "theme": "solarized",
            "weekdays": {"1": true, "2": 1, "3": 0}
        }))
        .unwrap();
        let null_theme: GoalConfig = serde_json::from_value(json!({
            "goalName": "Mine",
            "goalAmount": 1234,
            "goalStart": "2024-01-01",
            "theme": null
        }))
        .unwrap();
        assert_eq!(null_theme.name, "Mine");
        assert_eq!(null_theme.amount, 1234.0);
        assert_eq!(null_theme.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(null_theme.theme, Theme::Dark);
        let numeric: GoalConfig = serde_json::from_value(json!({"theme": 1})).unwrap();
        assert_eq!(numeric.theme, Theme::Dark);

        assert_eq!(goal.amount, 2500.0);
        assert_eq!(goal.start_date, None);
        assert_eq!(goal.end_date, None);
        assert_eq!(goal.theme, Theme::Dark);
        assert_eq!(goal.weekday_mask.flags(), [false, true, true, false, false, false, false]);
    }

    #[test]
    fn test_missing_weekdays_uses_default_mask() {
        let goal: GoalConfig = serde_json::from_value(json!({"goalName": "X"})).unwrap();
        assert_eq!(goal.weekday_mask, WeekdayMask::default());
        assert_eq!(goal.amount, DEFAULT_GOAL_AMOUNT);
    }

    #[test]
    fn test_normalized() {
        let goal = GoalConfig {
            name: "   ".to_string(),
            amount: -5.0,
            ..GoalConfig::default()
        }
        .normalized();
        assert_eq!(goal.name, "Goal");
        assert_eq!(goal.amount, 0.0);

        let goal = GoalConfig { amount: f64::NAN, ..GoalConfig::default() }.normalized();
        assert_eq!(goal.amount, 0.0);
    }

    #[test]
    fn test_summary() {
        let mut goal = GoalConfig {
            name: "Q3 Sales".to_string(),
            amount: 90_000.0,
            ..GoalConfig::default()
        };
        assert_eq!(goal.summary(), "Q3 Sales — $90,000 (no range)");

        goal.start_date = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert_eq!(goal.summary(), "Q3 Sales — $90,000 (from 2024-07-01)");

        goal.end_date = NaiveDate::from_ymd_opt(2024, 9, 30);
        assert_eq!(goal.summary(), "Q3 Sales — $90,000 (2024-07-01 → 2024-09-30)");

        goal.start_date = None;
        assert_eq!(goal.summary(), "Q3 Sales — $90,000 (until 2024-09-30)");
    }
}
