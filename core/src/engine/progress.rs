use chrono::NaiveDate;

use crate::model::entry::{sum_amounts, EntryStore};
use crate::time::{end_of_day, start_of_day};

/// Everything logged inside the goal range.
///
/// Unlike the working-day count, a missing bound leaves that side open:
/// progress is still meaningful for a half-set or unset range.
pub fn sum_in_range(store: &EntryStore, start: Option<NaiveDate>, end: Option<NaiveDate>) -> u64 {
    let lower = start.map(start_of_day);
    let upper = end.map(end_of_day);

    store
        .iter()
        .filter(|(date, _)| {
            let at = start_of_day(*date);
            lower.map_or(true, |lo| at >= lo) && upper.map_or(true, |hi| at <= hi)
        })
        .fold(0u64, |acc, (_, entries)| acc.saturating_add(sum_amounts(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::RawEntry;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_store() -> EntryStore {
        let mut store = EntryStore::new();
        store.set(ymd(2024, 1, 5), vec![RawEntry::new("Jan", 100.0)]);
        store.set(ymd(2024, 2, 10), vec![RawEntry::new("Feb", 50.0)]);
        store
    }

    #[test]
    fn test_bounded_range_excludes_outside_days() {
        let store = sample_store();
        let total = sum_in_range(&store, Some(ymd(2024, 1, 1)), Some(ymd(2024, 1, 31)));
        assert_eq!(total, 100);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let store = sample_store();
        assert_eq!(sum_in_range(&store, Some(ymd(2024, 1, 5)), Some(ymd(2024, 2, 10))), 150);
        assert_eq!(sum_in_range(&store, Some(ymd(2024, 2, 10)), Some(ymd(2024, 2, 10))), 50);
    }

    #[test]
    fn test_open_sides_are_unbounded() {
        let store = sample_store();
        assert_eq!(sum_in_range(&store, None, None), 150);
        assert_eq!(sum_in_range(&store, Some(ymd(2024, 2, 1)), None), 50);
        assert_eq!(sum_in_range(&store, None, Some(ymd(2024, 1, 31))), 100);
    }

    #[test]
    fn test_reversed_range_sums_nothing() {
        let store = sample_store();
        assert_eq!(sum_in_range(&store, Some(ymd(2024, 3, 1)), Some(ymd(2024, 1, 1))), 0);
    }

    #[test]
    fn test_multiple_entries_per_day() {
        let mut store = EntryStore::new();
        store.set(ymd(2024, 1, 5), vec![RawEntry::new("a", 10.0), RawEntry::new("b", 15.0)]);
        assert_eq!(sum_in_range(&store, None, None), 25);
    }
}
