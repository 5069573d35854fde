use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::goal::{optional_date, GoalConfig, Theme, WeekdayMask, DEFAULT_GOAL_AMOUNT, DEFAULT_GOAL_NAME};

/// Overrides the data directory when no explicit path is given.
pub const DATA_DIR_ENV: &str = "GOALPACE_HOME";
const DEFAULT_DIR_NAME: &str = ".goalpace";
const CONFIG_FILE_NAME: &str = "config.json";

/// Picks the data directory: explicit path, then `$GOALPACE_HOME`, then
/// `~/.goalpace`. The directory is created if missing.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(dir) => dir,
        None => match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        },
    };
    fs::create_dir_all(&path)
        .with_context(|| format!("Could not create data directory {}", path.display()))?;
    Ok(path)
}

/// Install-wide defaults, read from `config.json` in the data directory.
/// They seed the goal on first run and after a reset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub default_goal_name: String,
    pub default_goal_amount: f64,
    #[serde(with = "optional_date")]
    pub default_goal_start: Option<NaiveDate>,
    #[serde(with = "optional_date")]
    pub default_goal_end: Option<NaiveDate>,
    pub default_theme: Theme,
    pub default_weekdays: WeekdayMask,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_goal_name: DEFAULT_GOAL_NAME.to_string(),
            default_goal_amount: DEFAULT_GOAL_AMOUNT,
            default_goal_start: None,
            default_goal_end: None,
            default_theme: Theme::default(),
            default_weekdays: WeekdayMask::default(),
        }
    }
}

impl AppConfig {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn default_goal(&self) -> GoalConfig {
        GoalConfig {
            name: self.default_goal_name.clone(),
            amount: self.default_goal_amount,
            start_date: self.default_goal_start,
            end_date: self.default_goal_end,
            theme: self.default_theme,
            weekday_mask: self.default_weekdays,
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_goal(), GoalConfig::default());
    }

    #[test]
    fn test_partial_config_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"defaultGoalName": "FY25", "defaultGoalAmount": 1200000, "defaultGoalStart": "2025-01-01", "defaultTheme": "light"}"#,
        )
        .unwrap();

        let goal = AppConfig::load(dir.path()).unwrap().default_goal();
        assert_eq!(goal.name, "FY25");
        assert_eq!(goal.amount, 1_200_000.0);
        assert_eq!(goal.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(goal.end_date, None);
        assert_eq!(goal.theme, Theme::Light);
        assert_eq!(goal.weekday_mask, WeekdayMask::default());
    }

    #[test]
    fn test_blank_default_dates_mean_unset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"defaultGoalStart": "", "defaultGoalEnd": "2025-12-31"}"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.default_goal_start, None);
        assert_eq!(config.default_goal_end, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert!(AppConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_explicit_data_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let resolved = resolve_data_dir(Some(nested.clone())).unwrap();
        assert_eq!(resolved, nested);
        assert!(nested.is_dir());
    }
}
