use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::goal::GoalConfig;
use crate::repository::traits::SettingsRepository;

const SETTINGS_FILE_NAME: &str = "settings.json";

/// Reads a JSON record. A missing file is `None`. A corrupt one is moved
/// aside to `<name>.bak` and also read as `None`, so the caller can start
/// from defaults without the next save destroying what was there.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("could not open {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Some(value),
        Err(e) => {
            let backup = sibling(path, "bak");
            match fs::rename(path, &backup) {
                Ok(()) => tracing::warn!(
                    "ignoring corrupt {} ({}); kept it as {}",
                    path.display(),
                    e,
                    backup.display()
                ),
                Err(rename_err) => tracing::warn!(
                    "ignoring corrupt {} ({}); could not back it up: {}",
                    path.display(),
                    e,
                    rename_err
                ),
            }
            None
        }
    }
}

/// `entries.json` -> `entries.json.<suffix>` in the same directory.
pub(crate) fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Writes to a temporary sibling, then renames it over the target.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = sibling(path, "tmp");
    let file = File::create(&tmp).with_context(|| format!("Could not write {}", tmp.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .sync_all()?;
    fs::rename(&tmp, path).with_context(|| format!("Could not replace {}", path.display()))?;
    tracing::debug!("saved {}", path.display());
    Ok(())
}

pub(crate) fn remove_file(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Could not remove {}", path.display()))?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct FileSettingsRepository {
    file_path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(FileSettingsRepository { file_path: data_dir.join(SETTINGS_FILE_NAME) })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> Result<Option<GoalConfig>> {
        Ok(read_json::<GoalConfig>(&self.file_path).map(GoalConfig::normalized))
    }

    fn save(&self, goal: &GoalConfig) -> Result<()> {
        write_json(&self.file_path, goal)
    }

    fn clear(&self) -> Result<()> {
        remove_file(&self.file_path)
    }
}
