pub mod app;
pub mod ui;

use std::io;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, InputMode};
use crate::Tracker;

pub fn run(tracker: Tracker, today: NaiveDate) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker, today);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(std::time::Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('h') | KeyCode::PageUp => app.previous_month(),
                        KeyCode::Char('l') | KeyCode::PageDown => app.next_month(),
                        KeyCode::Left => app.move_selection(-1),
                        KeyCode::Right => app.move_selection(1),
                        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-7),
                        KeyCode::Down | KeyCode::Char('j') => app.move_selection(7),
                        KeyCode::Char('t') => app.jump_to_today(),
                        KeyCode::Char('e') | KeyCode::Enter => app.enter_edit_mode(),
                        KeyCode::Char('x') | KeyCode::Delete => app.clear_selected_day(),
                        _ => {}
                    },
                    InputMode::Editing => match key.code {
                        KeyCode::Enter => app.submit_entries(),
                        KeyCode::Esc => app.exit_input_mode(),
                        KeyCode::Char(c) => app.input_char(c),
                        KeyCode::Backspace => app.delete_char(),
                        KeyCode::Left => app.move_cursor_left(),
                        KeyCode::Right => app.move_cursor_right(),
                        _ => {}
                    },
                }
            }
        }
    }
}
