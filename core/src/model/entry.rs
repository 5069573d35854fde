use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::format::round_half_up;
use crate::model::lenient;
use crate::time::{date_key, parse_date_key};

pub const DEFAULT_ENTRY_LABEL: &str = "Entry";
pub const MAX_LABEL_CHARS: usize = 64;

/// One logged sale on a day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    pub amount: u64,
}

impl Entry {
    /// Applies the label and amount rules. Returns `None` when the amount
    /// rounds to zero or below, since such an entry carries nothing.
    pub fn normalize(raw: RawEntry) -> Option<Entry> {
        let rounded = round_half_up(raw.amount);
        if rounded <= 0 {
            return None;
        }

        let trimmed = raw.label.trim();
        let label = if trimmed.is_empty() {
            DEFAULT_ENTRY_LABEL.to_string()
        } else {
            trimmed.chars().take(MAX_LABEL_CHARS).collect()
        };

        Some(Entry { label, amount: rounded as u64 })
    }
}

/// Unvalidated entry as typed by the user or read from disk.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RawEntry {
    #[serde(deserialize_with = "lenient::deserialize_string")]
    pub label: String,
    #[serde(deserialize_with = "lenient::deserialize_number")]
    pub amount: f64,
}

impl RawEntry {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self { label: label.into(), amount }
    }
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        RawEntry { label: entry.label, amount: entry.amount as f64 }
    }
}

/// Per-day entries keyed by `YYYY-MM-DD`.
///
/// A key is present only while the day has at least one entry; `set` is the
/// only way in, and it removes the key when nothing survives normalization.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct EntryStore {
    days: BTreeMap<String, Vec<Entry>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> &[Entry] {
        self.days.get(&date_key(date)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replaces the day's entries wholesale.
    pub fn set<I>(&mut self, date: NaiveDate, raw_entries: I)
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let key = date_key(date);
        let clean: Vec<Entry> = raw_entries.into_iter().filter_map(Entry::normalize).collect();
        if clean.is_empty() {
            self.days.remove(&key);
        } else {
            self.days.insert(key, clean);
        }
    }

    pub fn total_for_day(&self, date: NaiveDate) -> u64 {
        sum_amounts(self.get(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date_key(date))
    }

    /// Days in ascending date order. Keys that fail to parse are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[Entry])> + '_ {
        self.days
            .iter()
            .filter_map(|(key, entries)| parse_date_key(key).ok().map(|d| (d, entries.as_slice())))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

pub fn sum_amounts(entries: &[Entry]) -> u64 {
    entries.iter().fold(0u64, |acc, e| acc.saturating_add(e.amount))
}

// Every stored day is re-validated through `set`, so a hand-edited file
// cannot smuggle in bad keys, empty days, or negative amounts.
impl<'de> Deserialize<'de> for EntryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, Value> = BTreeMap::deserialize(deserializer)?;
        let mut store = EntryStore::new();
        for (key, value) in raw {
            let date = match parse_date_key(&key) {
                Ok(date) => date,
                Err(e) => {
                    tracing::warn!("dropping stored day: {}", e);
                    continue;
                }
            };
            let entries: Vec<RawEntry> = match value {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
                _ => Vec::new(),
            };
            store.set(date, entries);
        }
        Ok(store)
    }
}
