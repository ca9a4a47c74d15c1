use super::storage::{JsonFileStorage, StoragePort};
use super::{FileRef, HistoryStore};
use crate::config::{AliasConfig, ConfigProvider, StorageConfig};
use crate::error::{ConfigError, HistoryError};
use crate::io::Fs;
use crate::util::paths::normalize_dir;
use serde::Serialize;

/// Result of recording a successful file open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opened {
    pub history: Vec<FileRef>,
    /// The entry now at the front, or `None` when the request was skipped.
    pub entry: Option<FileRef>,
}

/// Operations the edge layer calls after reading or failing to read a file.
pub struct HistoryService<S: StoragePort> {
    store: HistoryStore<S>,
}

impl<F: Fs + Clone> HistoryService<JsonFileStorage<F>> {
    /// Loads the configuration (creating it if absent) and wires a store over
    /// the JSON history file in `storage.data_dir`.
    pub fn open(fs: F, storage: &StorageConfig) -> Result<Self, ConfigError> {
        let config = ConfigProvider::new(fs.clone(), storage.config_path()).load()?;
        log::debug!(
            "history limit {}, {} aliases, {} path aliases",
            config.history_limit,
            config.aliases.len(),
            config.path_aliases.len()
        );
        Ok(Self::new(JsonFileStorage::new(fs, storage.history_path()), config))
    }
}

impl<S: StoragePort> HistoryService<S> {
    pub fn new(storage: S, config: AliasConfig) -> Self {
        Self {
            store: HistoryStore::new(storage, config),
        }
    }

    pub fn config(&self) -> &AliasConfig {
        self.store.config()
    }

    pub fn get_history(&self) -> Result<Vec<FileRef>, HistoryError> {
        self.store.load()
    }

    pub fn open_file(&self, directory_path: &str, name: &str) -> Result<Opened, HistoryError> {
        let history = self.store.touch(directory_path, name)?;
        let key = normalize_dir(directory_path);
        let entry = history
            .first()
            .filter(|e| e.matches(&key, name))
            .cloned();
        Ok(Opened { history, entry })
    }

    pub fn report_missing(
        &self,
        directory_path: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, HistoryError> {
        self.store.mark_missing(directory_path, name)
    }

    pub fn replace_history(&self, history: &[FileRef]) -> Result<(), HistoryError> {
        self.store.replace_all(history)
    }

    /// Drops the entry at `index` and stores the rest. An index past the end
    /// leaves history untouched.
    pub fn remove(&self, index: usize) -> Result<Vec<FileRef>, HistoryError> {
        self.store.remove_at(index)
    }

    pub fn relabel(&self) -> Result<Vec<FileRef>, HistoryError> {
        self.store.relabel()
    }
}
