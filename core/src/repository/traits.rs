use crate::model::entry::EntryStore;
use crate::model::goal::GoalConfig;
use anyhow::Result;

pub trait SettingsRepository {
    /// `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<GoalConfig>>;
    fn save(&self, goal: &GoalConfig) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub trait EntryRepository {
    fn load(&self) -> Result<EntryStore>;
    fn save(&self, store: &EntryStore) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
