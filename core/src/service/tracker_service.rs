use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::model::entry::{Entry, EntryStore, RawEntry};
use crate::model::goal::GoalConfig;
use crate::model::month::ViewedMonth;
use crate::repository::{EntryRepository, SettingsRepository};
use crate::service::dashboard::{build_month_view, Kpis, MonthView};

/// Both persisted records, in the shape they are stored in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub settings: GoalConfig,
    pub entries: EntryStore,
}

/// Owns the goal and the entries for the running application and writes
/// them back after every change.
pub struct TrackerService<S: SettingsRepository, E: EntryRepository> {
    settings_repo: S,
    entry_repo: E,
    defaults: AppConfig,
    goal: GoalConfig,
    store: EntryStore,
}

impl<S: SettingsRepository, E: EntryRepository> TrackerService<S, E> {
    pub fn open(settings_repo: S, entry_repo: E, defaults: AppConfig) -> Result<Self> {
        let goal = match settings_repo.load()? {
            Some(goal) => goal,
            None => defaults.default_goal(),
        };
        let store = entry_repo.load()?;
        tracing::debug!("opened tracker with {} logged days", store.len());

        Ok(Self { settings_repo, entry_repo, defaults, goal, store })
    }

    pub fn goal(&self) -> &GoalConfig {
        &self.goal
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn entries(&self, date: NaiveDate) -> &[Entry] {
        self.store.get(date)
    }

    pub fn total_for_day(&self, date: NaiveDate) -> u64 {
        self.store.total_for_day(date)
    }

    /// Replaces the whole settings record. Nothing changes if the write fails.
    pub fn save_settings(&mut self, goal: GoalConfig) -> Result<()> {
        let goal = goal.normalized();
        self.settings_repo.save(&goal)?;
        self.goal = goal;
        Ok(())
    }

    /// Replaces one day's entries; an empty result clears the day. The
    /// in-memory store only changes once the write succeeded.
    pub fn set_entries<I>(&mut self, date: NaiveDate, raw_entries: I) -> Result<&[Entry]>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut next = self.store.clone();
        next.set(date, raw_entries);
        self.entry_repo.save(&next)?;
        self.store = next;
        Ok(self.store.get(date))
    }

    pub fn clear_day(&mut self, date: NaiveDate) -> Result<()> {
        self.set_entries(date, Vec::new()).map(|_| ())
    }

    /// Drops all saved data and starts over from the configured defaults.
    pub fn reset(&mut self) -> Result<()> {
        self.settings_repo.clear()?;
        self.entry_repo.clear()?;
        self.goal = self.defaults.default_goal();
        self.store.clear();
        self.settings_repo.save(&self.goal)?;
        self.entry_repo.save(&self.store)?;
        tracing::info!("reset all goal settings and entries");
        Ok(())
    }

    pub fn kpis(&self, viewed: ViewedMonth) -> Kpis {
        Kpis::compute(&self.goal, &self.store, viewed)
    }

    pub fn month_view(&self, viewed: ViewedMonth) -> MonthView {
        build_month_view(&self.goal, &self.store, viewed)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { settings: self.goal.clone(), entries: self.store.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::goal::WeekdayMask;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockSettingsRepo {
        saved: RefCell<Option<GoalConfig>>,
        saves: RefCell<usize>,
        fail: RefCell<bool>,
    }

    impl SettingsRepository for &MockSettingsRepo {
        fn load(&self) -> Result<Option<GoalConfig>> { Ok(self.saved.borrow().clone()) }
        fn save(&self, goal: &GoalConfig) -> Result<()> {
            if *self.fail.borrow() {
                anyhow::bail!("disk full");
            }
            *self.saved.borrow_mut() = Some(goal.clone());
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
        fn clear(&self) -> Result<()> {
            *self.saved.borrow_mut() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockEntryRepo {
        saved: RefCell<EntryStore>,
        saves: RefCell<usize>,
        fail: RefCell<bool>,
    }

    impl EntryRepository for &MockEntryRepo {
        fn load(&self) -> Result<EntryStore> { Ok(self.saved.borrow().clone()) }
        fn save(&self, store: &EntryStore) -> Result<()> {
            if *self.fail.borrow() {
                anyhow::bail!("disk full");
            }
            *self.saved.borrow_mut() = store.clone();
            *self.saves.borrow_mut() += 1;
            Ok(())
        }
        fn clear(&self) -> Result<()> {
            self.saved.borrow_mut().clear();
            Ok(())
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_fresh_uses_config_defaults() {
        let settings = MockSettingsRepo::default();
        let entries = MockEntryRepo::default();
        let config = AppConfig { default_goal_name: "Fresh".to_string(), ..AppConfig::default() };

        let service = TrackerService::open(&settings, &entries, config).unwrap();
        assert_eq!(service.goal().name, "Fresh");
        assert!(service.store().is_empty());
        assert_eq!(*settings.saves.borrow(), 0);
    }

    #[test]
    fn test_every_mutation_persists() {
        let settings = MockSettingsRepo::default();
        let entries = MockEntryRepo::default();
        let mut service = TrackerService::open(&settings, &entries, AppConfig::default()).unwrap();

        let day = ymd(2024, 1, 5);
        let stored = service.set_entries(day, vec![RawEntry::new("Sale", 99.5)]).unwrap().to_vec();
        assert_eq!(stored, vec![Entry { label: "Sale".to_string(), amount: 100 }]);
        assert_eq!(entries.saved.borrow().total_for_day(day), 100);

        service.clear_day(day).unwrap();
        assert!(!entries.saved.borrow().contains(day));
        assert_eq!(*entries.saves.borrow(), 2);

        service
            .save_settings(GoalConfig { name: "  New  ".to_string(), amount: -1.0, ..GoalConfig::default() })
            .unwrap();
        let saved = settings.saved.borrow().clone().unwrap();
        assert_eq!(saved.name, "New");
        assert_eq!(saved.amount, 0.0);
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let settings = MockSettingsRepo::default();
        let entries = MockEntryRepo::default();
        let mut service = TrackerService::open(&settings, &entries, AppConfig::default()).unwrap();

        let day = ymd(2024, 1, 5);
        service.set_entries(day, vec![RawEntry::new("Sale", 10.0)]).unwrap();

        *entries.fail.borrow_mut() = true;
        assert!(service.set_entries(day, vec![RawEntry::new("Bigger", 500.0)]).is_err());
        assert!(service.clear_day(day).is_err());
        assert_eq!(service.total_for_day(day), 10);
        assert_eq!(service.store(), &*entries.saved.borrow());

        *settings.fail.borrow_mut() = true;
        let before = service.goal().clone();
        assert!(service
            .save_settings(GoalConfig { name: "Unsaved".to_string(), ..GoalConfig::default() })
            .is_err());
        assert_eq!(service.goal(), &before);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let settings = MockSettingsRepo::default();
        let entries = MockEntryRepo::default();
        let mut service = TrackerService::open(&settings, &entries, AppConfig::default()).unwrap();

        service.set_entries(ymd(2024, 1, 5), vec![RawEntry::new("Sale", 10.0)]).unwrap();
        service
            .save_settings(GoalConfig { name: "Custom".to_string(), weekday_mask: WeekdayMask::ALL, ..GoalConfig::default() })
            .unwrap();

        service.reset().unwrap();
        assert_eq!(service.goal(), &GoalConfig::default());
        assert!(service.store().is_empty());
        assert_eq!(settings.saved.borrow().clone(), Some(GoalConfig::default()));
        assert!(entries.saved.borrow().is_empty());
    }

    #[test]
    fn test_views_follow_state() {
        let settings = MockSettingsRepo::default();
        let entries = MockEntryRepo::default();
        let mut service = TrackerService::open(&settings, &entries, AppConfig::default()).unwrap();
        service
            .save_settings(GoalConfig {
                amount: 10_000.0,
                start_date: Some(ymd(2024, 1, 1)),
                end_date: Some(ymd(2024, 1, 12)),
                weekday_mask: WeekdayMask::MON_TO_FRI,
                ..GoalConfig::default()
            })
            .unwrap();
        service.set_entries(ymd(2024, 1, 3), vec![RawEntry::new("a", 400.0)]).unwrap();

        let jan = ViewedMonth::new(2024, 0);
        let kpis = service.kpis(jan);
        assert_eq!(kpis.daily_target, 1000.0);
        assert_eq!(kpis.progress_to_date, 400);

        let view = service.month_view(jan);
        assert_eq!(view.day(ymd(2024, 1, 3)).map(|c| c.total), Some(400));

        let snapshot = service.snapshot();
        assert_eq!(snapshot.entries.total_for_day(ymd(2024, 1, 3)), 400);
        assert_eq!(snapshot.settings.amount, 10_000.0);
    }
}
