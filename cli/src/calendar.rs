use chrono::NaiveDate;
use goalpace_core::{money, DayCell, Entry, GoalConfig, MonthView};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CELL_WIDTH: usize = 14;
const ENTRIES_PER_CELL: usize = 2;
const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Tabled)]
struct KpiRow {
    #[tabled(rename = "Target")]
    name: &'static str,
    #[tabled(rename = "Amount")]
    value: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Truncates to a display width, marking the cut with an ellipsis.
pub(crate) fn fit_width(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

pub fn print_goal(goal: &GoalConfig) {
    println!("\x1b[1;36m{}\x1b[0m", goal.summary());
    println!("  Working days: {}", goal.weekday_mask);
    println!("  Theme: {}", goal.theme);
}

pub fn print_overview(view: &MonthView, goal: &GoalConfig) {
    println!("\x1b[1;36m{}\x1b[0m", view.goal_summary);
    println!("\x1b[1m{}\x1b[0m", view.month.label());

    let k = &view.kpis;
    let rows = vec![
        KpiRow { name: "Daily", value: money(k.daily_target) },
        KpiRow { name: "Weekly", value: money(k.weekly_target) },
        KpiRow { name: "Monthly", value: money(k.monthly_target) },
        KpiRow { name: "Quarterly", value: money(k.quarterly_target) },
        KpiRow {
            name: "Progress",
            value: format!("{} ({:.1}%)", money(k.progress_to_date as f64), k.progress_ratio(goal) * 100.0),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);

    if k.daily_target == 0.0 {
        println!("  (set a start date, an end date and at least one working day to get a pace)");
    }
}

pub(crate) fn day_cell_text(cell: &DayCell, today: NaiveDate) -> String {
    let day = cell.date.format("%e").to_string();
    let day = if cell.date == today { format!("[{}]", day.trim()) } else { day };

    let mut lines = Vec::new();
    match cell.target {
        Some(pace) if cell.shows_pace() => lines.push(format!("{} ◆{}", day, money(pace))),
        _ => lines.push(day),
    }

    for entry in cell.entries.iter().take(ENTRIES_PER_CELL) {
        let amount = money(entry.amount as f64);
        let room = CELL_WIDTH.saturating_sub(UnicodeWidthStr::width(amount.as_str()) + 1);
        lines.push(format!("{} {}", fit_width(&entry.label, room), amount));
    }
    if cell.entries.len() > ENTRIES_PER_CELL {
        lines.push(format!("+{} more", cell.entries.len() - ENTRIES_PER_CELL));
    }

    if cell.is_working_day {
        lines.push(format!("Σ {}", money(cell.total as f64)));
    }
    lines.join("\n")
}

pub fn print_month(view: &MonthView, today: NaiveDate) {
    let mut builder = Builder::default();
    let mut header: Vec<String> = WEEKDAY_HEADERS.iter().map(|h| h.to_string()).collect();
    header.push("Week".to_string());
    builder.push_record(header);

    for (i, week) in view.weeks.iter().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(8);
        if i == 0 {
            row.extend((0..view.leading_blanks).map(|_| String::new()));
        }
        row.extend(view.cells_in(week).map(|cell| day_cell_text(cell, today)));
        while row.len() < 7 {
            row.push(String::new());
        }
        row.push(money(week.subtotal as f64));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Columns::last()).with(Color::FG_GREEN));
    println!("{}", table);
}

pub fn print_day(date: NaiveDate, entries: &[Entry], goal: &GoalConfig) {
    let working = goal.weekday_mask.is_working(chrono::Datelike::weekday(&date));
    println!(
        "\n\x1b[1;36m{} ({})\x1b[0m{}",
        date.format("%Y-%m-%d"),
        date.format("%a"),
        if working { "" } else { "  not a working day" }
    );

    if entries.is_empty() {
        println!("No entries.");
        return;
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| EntryRow { index: i + 1, label: e.label.clone(), amount: money(e.amount as f64) })
        .collect();
    let total = goalpace_core::model::entry::sum_amounts(entries);

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    println!("Total: {}", money(total as f64));
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalpace_core::{build_month_view, EntryStore, RawEntry, ViewedMonth, WeekdayMask};

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("a much longer label", 8), "a much …");
        assert_eq!(UnicodeWidthStr::width(fit_width("漢字漢字漢字", 7).as_str()), 7);
    }

    #[test]
    fn test_day_cell_text() {
        let goal = GoalConfig {
            amount: 10_000.0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 12),
            weekday_mask: WeekdayMask::MON_TO_FRI,
            ..GoalConfig::default()
        };
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut store = EntryStore::new();
        store.set(
            monday,
            vec![RawEntry::new("One", 10.0), RawEntry::new("Two", 20.0), RawEntry::new("Three", 30.0)],
        );

        let view = build_month_view(&goal, &store, ViewedMonth::new(2024, 0));
        let text = day_cell_text(view.day(monday).unwrap(), monday);
        assert_eq!(text, "[1] ◆$1,000\nOne $10\nTwo $20\n+1 more\nΣ $60");

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(day_cell_text(view.day(sunday).unwrap(), monday), " 7");
    }
}
