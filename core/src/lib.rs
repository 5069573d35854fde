pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use config::{resolve_data_dir, AppConfig};
pub use engine::{compute_targets, count_in_month, count_in_range, sum_in_range, Targets};
pub use error::ParseError;
pub use format::money;
pub use input::{apply_goal_args, expand_key, parse_args, parse_entry_line, parse_entry_token, ParsedInput};
pub use model::entry::{Entry, EntryStore, RawEntry};
pub use model::goal::{GoalConfig, Theme, WeekdayMask};
pub use model::month::{parse_month, ViewedMonth};
pub use repository::{EntryRepository, FileEntryRepository, FileSettingsRepository, SettingsRepository};
pub use service::dashboard::{build_month_view, DayCell, Kpis, MonthView, WeekRow};
pub use service::tracker_service::{Snapshot, TrackerService};
pub use time::{date_key, days_in_month, end_of_day, parse_date_key, parse_human_date, start_of_day};
