use std::collections::HashMap;

use crate::error::ParseError;
use crate::model::entry::RawEntry;
use crate::model::goal::{parse_theme, parse_weekdays, GoalConfig};
use crate::time::parse_optional_date;

pub const GOAL_KEYS: [&str; 6] = ["name", "amount", "start", "end", "weekdays", "theme"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` tokens from free text.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

/// Resolves an exact key or an unambiguous prefix of one.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, ParseError> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(ParseError::UnknownKey(key.to_string())),
        _ => Err(ParseError::AmbiguousKey {
            key: key.to_string(),
            candidates: matches.into_iter().map(String::from).collect(),
        }),
    }
}

/// Builds a replacement settings record from `key:value` arguments.
/// Keys not mentioned keep their current value; free words become the name.
pub fn apply_goal_args(current: &GoalConfig, args: &[String]) -> Result<GoalConfig, ParseError> {
    let parsed = parse_args(args);
    let mut goal = current.clone();

    if !parsed.name.is_empty() {
        goal.name = parsed.name;
    }

    for (key, value) in parsed.metadata {
        match expand_key(&key, &GOAL_KEYS)?.as_str() {
            "name" => goal.name = value,
            "amount" => goal.amount = parse_amount(&value)?,
            "start" => goal.start_date = parse_optional_date(&value)?,
            "end" => goal.end_date = parse_optional_date(&value)?,
            "weekdays" => goal.weekday_mask = parse_weekdays(&value)?,
            "theme" => goal.theme = parse_theme(&value)?,
            _ => {}
        }
    }

    Ok(goal.normalized())
}

pub fn parse_amount(input: &str) -> Result<f64, ParseError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && *c != '_')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::Amount(input.to_string())),
    }
}

/// `label:amount`, or a bare amount with the default label. The last colon
/// separates the amount so labels may contain colons.
pub fn parse_entry_token(token: &str) -> Result<RawEntry, ParseError> {
    let token = token.trim();
    match token.rsplit_once(':') {
        Some((label, amount)) => Ok(RawEntry::new(label.trim(), parse_amount(amount)?)),
        None => Ok(RawEntry::new("", parse_amount(token)?)),
    }
}

/// A day-editor line: comma-separated when it contains commas (so labels
/// may contain spaces), whitespace-separated otherwise.
pub fn parse_entry_line(line: &str) -> Result<Vec<RawEntry>, ParseError> {
    let tokens: Vec<&str> = if line.contains(',') {
        line.split(',').collect()
    } else {
        line.split_whitespace().collect()
    };
    tokens
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .map(parse_entry_token)
        .collect()
}
