pub mod entries;
pub mod file;
pub mod traits;

// Re-export
pub use entries::FileEntryRepository;
pub use file::FileSettingsRepository;
pub use traits::{EntryRepository, SettingsRepository};
