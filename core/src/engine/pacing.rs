use serde::Serialize;

use crate::engine::working_days::{count_in_month, count_in_range};
use crate::model::goal::GoalConfig;
use crate::model::month::ViewedMonth;

/// Target rates for the viewed month.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Targets {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub quarterly: f64,
}

/// Spreads the goal evenly across the working days of its range and scales
/// that daily pace to a week, the viewed month and its calendar quarter.
///
/// Without a closed range (or with no working days in it) the daily pace is
/// 0 and everything derived from it is 0 too.
pub fn compute_targets(goal: &GoalConfig, viewed: ViewedMonth) -> Targets {
    let mask = &goal.weekday_mask;
    let working_in_goal = count_in_range(goal.start_date, goal.end_date, mask);

    let daily = if working_in_goal > 0 {
        goal.amount / working_in_goal as f64
    } else {
        0.0
    };
    let daily = if daily.is_finite() { daily } else { 0.0 };

    let weekly = daily * mask.working_count() as f64;
    let monthly = daily * count_in_month(viewed, mask) as f64;

    let quarter_days = viewed
        .quarter_bounds()
        .map(|(start, end)| count_in_range(Some(start), Some(end), mask))
        .unwrap_or(0);
    let quarterly = daily * quarter_days as f64;

    Targets { daily, weekly, monthly, quarterly }
}
