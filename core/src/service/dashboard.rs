use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::engine::{compute_targets, sum_in_range, Targets};
use crate::model::entry::{sum_amounts, Entry, EntryStore};
use crate::model::goal::GoalConfig;
use crate::model::month::ViewedMonth;
use crate::time::date_key;

/// Headline figures shown above the calendar.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    pub daily_target: f64,
    pub weekly_target: f64,
    pub monthly_target: f64,
    pub quarterly_target: f64,
    pub progress_to_date: u64,
}

impl Kpis {
    pub fn compute(goal: &GoalConfig, store: &EntryStore, viewed: ViewedMonth) -> Self {
        let Targets { daily, weekly, monthly, quarterly } = compute_targets(goal, viewed);
        Self {
            daily_target: daily,
            weekly_target: weekly,
            monthly_target: monthly,
            quarterly_target: quarterly,
            progress_to_date: sum_in_range(store, goal.start_date, goal.end_date),
        }
    }

    /// Share of the goal reached so far, 0 when the goal amount is 0.
    pub fn progress_ratio(&self, goal: &GoalConfig) -> f64 {
        if goal.amount > 0.0 {
            self.progress_to_date as f64 / goal.amount
        } else {
            0.0
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub key: String,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub is_working_day: bool,
    /// The daily pace on working days, `None` otherwise.
    pub target: Option<f64>,
    pub entries: Vec<Entry>,
    pub total: u64,
}

impl DayCell {
    /// Whether a pace badge is worth drawing.
    pub fn shows_pace(&self) -> bool {
        matches!(self.target, Some(t) if t.is_finite() && t > 0.0)
    }
}

fn serialize_weekday<S: serde::Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u32(weekday.num_days_from_sunday())
}

/// A calendar row, Sunday..Saturday, clipped to the month.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeekRow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Sum over working days only.
    pub subtotal: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthView {
    pub month: ViewedMonth,
    pub goal_summary: String,
    pub kpis: Kpis,
    /// Blank cells before day 1 (its Sunday-based weekday index).
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub weeks: Vec<WeekRow>,
}

impl MonthView {
    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.days.iter().find(|c| c.date == date)
    }

    pub fn cells_in<'a>(&'a self, week: &'a WeekRow) -> impl Iterator<Item = &'a DayCell> + 'a {
        self.days.iter().filter(move |c| c.date >= week.start && c.date <= week.end)
    }
}

/// Everything one render of the calendar needs, recomputed from scratch.
pub fn build_month_view(goal: &GoalConfig, store: &EntryStore, viewed: ViewedMonth) -> MonthView {
    let kpis = Kpis::compute(goal, store, viewed);
    let mask = &goal.weekday_mask;

    let dates: Vec<NaiveDate> = (1..=viewed.days())
        .filter_map(|day| NaiveDate::from_ymd_opt(viewed.year, viewed.month + 1, day))
        .collect();

    let leading_blanks = dates.first().map(|d| d.weekday().num_days_from_sunday()).unwrap_or(0);

    let mut days = Vec::with_capacity(dates.len());
    let mut weeks = Vec::new();
    let mut week_start: Option<NaiveDate> = None;
    let mut week_sum = 0u64;

    for (i, &date) in dates.iter().enumerate() {
        let weekday = date.weekday();
        let is_working_day = mask.is_working(weekday);
        let entries = store.get(date).to_vec();
        let total = sum_amounts(&entries);

        if is_working_day {
            week_sum = week_sum.saturating_add(total);
        }
        let start = *week_start.get_or_insert(date);

        days.push(DayCell {
            date,
            key: date_key(date),
            weekday,
            is_working_day,
            target: is_working_day.then_some(kpis.daily_target),
            entries,
            total,
        });

        if weekday == Weekday::Sat || i + 1 == dates.len() {
            weeks.push(WeekRow { start, end: date, subtotal: week_sum });
            week_start = None;
            week_sum = 0;
        }
    }

    MonthView {
        month: viewed,
        goal_summary: goal.summary(),
        kpis,
        leading_blanks,
        days,
        weeks,
    }
}
