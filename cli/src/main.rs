mod calendar;
mod tui;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use goalpace_core::{
    apply_goal_args, parse_entry_token, parse_human_date, parse_month, resolve_data_dir, AppConfig,
    FileEntryRepository, FileSettingsRepository, RawEntry, TrackerService, ViewedMonth,
};
use tracing_subscriber::EnvFilter;

pub type Tracker = TrackerService<FileSettingsRepository, FileEntryRepository>;

const LOG_ENV: &str = "GOALPACE_LOG";

#[derive(Parser)]
#[command(name = "goalpace")]
#[command(about = "Sales goal pacing calendar", long_about = None)]
struct Cli {
    /// Directory holding settings.json and entries.json (default: $GOALPACE_HOME or ~/.goalpace)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the goal, pacing targets and the month calendar
    Show {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List the entries logged on a day (usage: day 2024-01-05 | today | -1d)
    Day {
        #[arg(allow_hyphen_values = true)]
        date: String,
    },
    /// Replace a day's entries (usage: set today Widget:120 "Big deal:500" 75)
    Set {
        #[arg(allow_hyphen_values = true)]
        date: String,
        /// label:amount tokens; a bare number uses the default label
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        entries: Vec<String>,
    },
    /// Remove every entry on a day
    Clear {
        #[arg(allow_hyphen_values = true)]
        date: String,
    },
    /// Show or replace the goal (usage: goal name:Q3 amount:90000 start:2024-07-01 end:2024-09-30 weekdays:mon-fri)
    Goal {
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Print settings and entries as JSON
    Export,
    /// Delete all saved settings and entries
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Open the calendar in the terminal
    Tui,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_day(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    Ok(parse_human_date(input, today)?)
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = AppConfig::load(&data_dir)?;
    let settings_repo = FileSettingsRepository::new(&data_dir)?;
    let entry_repo = FileEntryRepository::new(&data_dir)?;
    let mut tracker = TrackerService::open(settings_repo, entry_repo, config)
        .with_context(|| format!("Could not open data in {}", data_dir.display()))?;

    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Show { month }) => {
            let viewed = match month {
                Some(m) => parse_month(&m)?,
                None => ViewedMonth::containing(today),
            };
            let view = tracker.month_view(viewed);
            calendar::print_overview(&view, tracker.goal());
            calendar::print_month(&view, today);
        }
        Some(Commands::Day { date }) => {
            let date = parse_day(&date, today)?;
            calendar::print_day(date, tracker.entries(date), tracker.goal());
        }
        Some(Commands::Set { date, entries }) => {
            let date = parse_day(&date, today)?;
            let raw = entries
                .iter()
                .map(|t| parse_entry_token(t))
                .collect::<Result<Vec<RawEntry>, _>>()?;
            let stored = tracker.set_entries(date, raw)?.to_vec();
            if stored.is_empty() {
                println!("Cleared {}.", date);
            } else {
                calendar::print_day(date, &stored, tracker.goal());
            }
        }
        Some(Commands::Clear { date }) => {
            let date = parse_day(&date, today)?;
            tracker.clear_day(date)?;
            println!("Cleared {}.", date);
        }
        Some(Commands::Goal { args }) => {
            if !args.is_empty() {
                let goal = apply_goal_args(tracker.goal(), &args)?;
                tracker.save_settings(goal)?;
                println!("Goal saved.");
            }
            calendar::print_goal(tracker.goal());
        }
        Some(Commands::Export) => {
            println!("{}", serde_json::to_string_pretty(&tracker.snapshot())?);
        }
        Some(Commands::Reset { yes }) => {
            if !yes {
                bail!("This clears all saved data and settings. Re-run with --yes to confirm.");
            }
            tracker.reset()?;
            println!("All data and settings cleared.");
        }
        Some(Commands::Tui) | None => {
            tui::run(tracker, today)?;
        }
    }
    Ok(())
}
