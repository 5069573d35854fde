use goalpace_core::{money, DayCell, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::calendar::fit_width;
use crate::tui::app::{App, InputMode};

struct Palette {
    primary: Color,
    muted: Color,
    text: Color,
    pace: Color,
    total: Color,
    selected_bg: Color,
}

const DARK: Palette = Palette {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    pace: Color::Yellow,
    total: Color::Green,
    selected_bg: Color::Rgb(40, 44, 52),
};

const LIGHT: Palette = Palette {
    primary: Color::Blue,
    muted: Color::Gray,
    text: Color::Black,
    pace: Color::Magenta,
    total: Color::Green,
    selected_bg: Color::Rgb(220, 225, 235),
};

fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

const CELL_LABEL_WIDTH: usize = 12;

pub fn draw(f: &mut Frame, app: &App) {
    let theme = palette(app.tracker.goal().theme);
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // KPIs
            Constraint::Length(3), // Progress
            Constraint::Min(10),   // Calendar + detail
            Constraint::Length(3), // Editor / status
            Constraint::Length(1), // Help
        ])
        .split(size);

    draw_header(f, app, theme, main_chunks[0]);
    draw_kpis(f, app, theme, main_chunks[1]);
    draw_progress(f, app, theme, main_chunks[2]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(main_chunks[3]);
    draw_calendar(f, app, theme, content_chunks[0]);
    draw_day_detail(f, app, theme, content_chunks[1]);

    draw_editor(f, app, theme, main_chunks[4]);

    let help = match app.input_mode {
        InputMode::Normal => "h/l: Month | arrows: Day | e: Edit | x: Clear | t: Today | q: Quit",
        InputMode::Editing => "label:amount, label:amount | Enter: Save | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[5]);
}

fn draw_header(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let title = Line::from(vec![
        Span::styled(app.view.goal_summary.clone(), Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(" < ", Style::default().fg(theme.muted)),
        Span::styled(app.viewed.label(), Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(theme.muted)),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

fn draw_kpis(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let k = &app.view.kpis;
    let figures = [
        ("Daily", money(k.daily_target)),
        ("Weekly", money(k.weekly_target)),
        ("Monthly", money(k.monthly_target)),
        ("Quarterly", money(k.quarterly_target)),
        ("Progress", money(k.progress_to_date as f64)),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for ((name, value), chunk) in figures.iter().zip(chunks.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted))
                .title(format!(" {} ", name)),
        );
        f.render_widget(card, *chunk);
    }
}

fn draw_progress(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let ratio = app.view.kpis.progress_ratio(app.tracker.goal());
    let label = format!(
        "{} of {} ({:.1}%)",
        money(app.view.kpis.progress_to_date as f64),
        money(app.tracker.goal().amount),
        ratio * 100.0
    );
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Progress to date ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted)),
        )
        .gauge_style(Style::default().fg(theme.total))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, area);
}

fn day_cell<'a>(cell: &DayCell, app: &App, theme: &Palette) -> Cell<'a> {
    let mut lines = Vec::new();

    let day_style = if cell.date == app.today {
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if cell.is_working_day {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.muted)
    };
    let mut first = vec![Span::styled(cell.date.format("%e").to_string(), day_style)];
    if let Some(pace) = cell.target.filter(|_| cell.shows_pace()) {
        first.push(Span::styled(format!(" ◆{}", money(pace)), Style::default().fg(theme.pace)));
    }
    lines.push(Line::from(first));

    if let Some(entry) = cell.entries.first() {
        lines.push(Line::from(Span::raw(fit_width(&entry.label, CELL_LABEL_WIDTH))));
    }
    if cell.is_working_day {
        lines.push(Line::from(Span::styled(
            format!("Σ {}", money(cell.total as f64)),
            Style::default().fg(theme.total),
        )));
    }

    let mut out = Cell::from(Text::from(lines));
    if cell.date == app.selected {
        out = out.style(Style::default().bg(theme.selected_bg).add_modifier(Modifier::BOLD));
    }
    out
}

fn draw_calendar(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let header = Row::new(vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Week"])
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .view
        .weeks
        .iter()
        .enumerate()
        .map(|(i, week)| {
            let mut cells: Vec<Cell> = Vec::with_capacity(8);
            if i == 0 {
                cells.extend((0..app.view.leading_blanks).map(|_| Cell::from("")));
            }
            cells.extend(app.view.cells_in(week).map(|c| day_cell(c, app, theme)));
            while cells.len() < 7 {
                cells.push(Cell::from(""));
            }
            cells.push(Cell::from(Span::styled(
                money(week.subtotal as f64),
                Style::default().fg(theme.total).add_modifier(Modifier::BOLD),
            )));
            Row::new(cells).height(3)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Ratio(1, 8); 8])
        .header(header)
        .block(
            Block::default()
                .title(" Calendar ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted)),
        );
    f.render_widget(table, area);
}

fn draw_day_detail(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    let entries = app.selected_entries();
    let working = app.view.day(app.selected).map(|c| c.is_working_day);

    let mut text = vec![
        Line::from(Span::styled(
            app.selected.format("%a %Y-%m-%d").to_string(),
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            match working {
                Some(true) => "Working day",
                Some(false) => "Day off",
                None => "",
            },
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
    ];

    if entries.is_empty() {
        text.push(Line::from(Span::styled("No entries", Style::default().fg(theme.muted))));
    }
    for entry in entries {
        text.push(Line::from(vec![
            Span::raw(entry.label.clone()),
            Span::raw("  "),
            Span::styled(money(entry.amount as f64), Style::default().fg(theme.total)),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("Total: ", Style::default().fg(theme.muted)),
        Span::styled(
            money(app.tracker.total_for_day(app.selected) as f64),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]));

    let detail = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Day ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.muted)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(detail, area);
}

fn draw_editor(f: &mut Frame, app: &App, theme: &Palette, area: Rect) {
    match app.input_mode {
        InputMode::Editing => {
            let editor = Paragraph::new(app.input.as_str())
                .style(Style::default().fg(theme.pace))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .title(format!(" Entries for {} ", app.selected)),
                );
            f.render_widget(editor, area);

            let prefix_width: u16 = app
                .input
                .chars()
                .take(app.cursor_position)
                .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(0) as u16)
                .sum();
            f.set_cursor_position((area.x + 1 + prefix_width, area.y + 1));
        }
        InputMode::Normal => {
            let status = app.status.clone().unwrap_or_default();
            let bar = Paragraph::new(status)
                .style(Style::default().fg(theme.muted))
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(bar, area);
        }
    }
}
