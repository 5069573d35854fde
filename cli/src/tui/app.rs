use chrono::{Datelike, Duration, NaiveDate};
use goalpace_core::{parse_entry_line, Entry, MonthView, ViewedMonth};

use crate::Tracker;

pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    pub tracker: Tracker,
    pub today: NaiveDate,
    pub viewed: ViewedMonth,
    pub selected: NaiveDate,
    pub view: MonthView,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(tracker: Tracker, today: NaiveDate) -> App {
        let viewed = ViewedMonth::containing(today);
        let view = tracker.month_view(viewed);
        App {
            tracker,
            today,
            viewed,
            selected: today,
            view,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        }
    }

    fn refresh(&mut self) {
        self.view = self.tracker.month_view(self.viewed);
    }

    fn show_month(&mut self, month: ViewedMonth) {
        self.viewed = month;
        if let Some(day) = clamp_to_month(month, self.selected.day()) {
            self.selected = day;
        }
        self.refresh();
    }

    pub fn next_month(&mut self) {
        self.show_month(self.viewed.next());
    }

    pub fn previous_month(&mut self) {
        self.show_month(self.viewed.previous());
    }

    pub fn jump_to_today(&mut self) {
        self.selected = self.today;
        self.viewed = ViewedMonth::containing(self.today);
        self.refresh();
    }

    pub fn move_selection(&mut self, days: i64) {
        let Some(next) = self.selected.checked_add_signed(Duration::days(days)) else {
            return;
        };
        self.selected = next;
        let month = ViewedMonth::containing(next);
        if month != self.viewed {
            self.viewed = month;
            self.refresh();
        }
    }

    pub fn selected_entries(&self) -> &[Entry] {
        self.tracker.entries(self.selected)
    }

    pub fn enter_edit_mode(&mut self) {
        self.input = format_entry_line(self.selected_entries());
        self.cursor_position = self.input.chars().count();
        self.input_mode = InputMode::Editing;
        self.status = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Saves the editor line as the selected day's entries. A bad token keeps
    /// the editor open so the line can be fixed.
    pub fn submit_entries(&mut self) {
        let raw = match parse_entry_line(&self.input) {
            Ok(raw) => raw,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        };

        match self.tracker.set_entries(self.selected, raw) {
            Ok(stored) => {
                self.status = Some(format!("Saved {} entries for {}", stored.len(), self.selected));
            }
            Err(e) => {
                tracing::warn!("could not save entries: {:#}", e);
                self.status = Some(format!("Save failed: {}", e));
            }
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
        self.refresh();
    }

    pub fn clear_selected_day(&mut self) {
        match self.tracker.clear_day(self.selected) {
            Ok(()) => self.status = Some(format!("Cleared {}", self.selected)),
            Err(e) => {
                tracing::warn!("could not clear day: {:#}", e);
                self.status = Some(format!("Clear failed: {}", e));
            }
        }
        self.refresh();
    }
}

/// Same day of month in another month, pulled back to its last day if needed.
fn clamp_to_month(month: ViewedMonth, day: u32) -> Option<NaiveDate> {
    let last = month.days();
    if last == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(month.year, month.month + 1, day.min(last))
}

/// Inverse of the editor parser, so an existing day opens pre-filled. The
/// trailing comma keeps the line in comma mode, since labels may hold spaces.
fn format_entry_line(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}:{},", e.label.replace(',', " "), e.amount))
        .collect::<Vec<_>>()
        .join(" ")
}
