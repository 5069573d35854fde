use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::entry::EntryStore;
use crate::repository::file::{read_json, remove_file, write_json};
use crate::repository::traits::EntryRepository;

const ENTRIES_FILE_NAME: &str = "entries.json";

#[derive(Clone)]
pub struct FileEntryRepository {
    file_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(FileEntryRepository { file_path: data_dir.join(ENTRIES_FILE_NAME) })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl EntryRepository for FileEntryRepository {
    fn load(&self) -> Result<EntryStore> {
        Ok(read_json(&self.file_path).unwrap_or_default())
    }

    fn save(&self, store: &EntryStore) -> Result<()> {
        write_json(&self.file_path, store)
    }

    fn clear(&self) -> Result<()> {
        remove_file(&self.file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::RawEntry;
    use crate::repository::file::sibling;
    use chrono::NaiveDate;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        assert!(repo.load().unwrap().is_empty());

        let mut store = EntryStore::new();
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        store.set(day, vec![RawEntry::new("Widget", 120.0), RawEntry::new("Gadget", 30.0)]);
        repo.save(&store).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.total_for_day(day), 150);
    }

    #[test]
    fn test_reads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        fs::write(
            repo.path(),
            r#"{"2024-03-01": [{"label": "Sale", "amount": 250}], "2024-03-02": []}"#,
        )
        .unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.total_for_day(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), 250);
    }

    #[test]
    fn test_corrupt_file_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        fs::write(repo.path(), "[1, 2").unwrap();
        assert!(repo.load().unwrap().is_empty());

        let mut store = EntryStore::new();
        store.set(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), vec![RawEntry::new("New", 10.0)]);
        repo.save(&store).unwrap();

        let backup = sibling(repo.path(), "bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "[1, 2");
        assert_eq!(repo.load().unwrap(), store);
    }
}
