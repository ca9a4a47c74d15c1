pub mod service;
pub mod storage;

use crate::config::AliasConfig;
use crate::error::HistoryError;
use crate::resolver;
use crate::util::paths::normalize_dir;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use storage::StoragePort;

/// One recently opened file. Identity is `(directory_path, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(rename = "$path", alias = "directoryPath")]
    pub directory_path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub missing: bool,
}

impl FileRef {
    pub fn new(directory_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            directory_path: directory_path.into(),
            name: name.into(),
            alias: None,
            missing: false,
        }
    }

    pub fn matches(&self, directory_path: &str, name: &str) -> bool {
        self.directory_path == directory_path && self.name == name
    }

    /// The alias if one was resolved, else the bare file name.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// What `apply_touch` did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// An existing entry moved to the front.
    Promoted,
    /// A new entry was inserted at the front; `evicted` entries were dropped
    /// from the back first.
    Inserted { evicted: usize },
    /// Empty key fields, or a zero capacity that only trimmed the list.
    Skipped { evicted: usize },
}

impl TouchOutcome {
    pub fn changed(&self) -> bool {
        match self {
            TouchOutcome::Promoted | TouchOutcome::Inserted { .. } => true,
            TouchOutcome::Skipped { evicted } => *evicted > 0,
        }
    }
}

/// Records an access to `(directory_path, name)` in `history`.
///
/// `directory_path` must already be normalized. Only the first matching entry
/// is promoted; its alias is left as is. New entries are resolved against
/// `config` and the list is trimmed from the back to make room.
pub fn apply_touch(
    history: &mut Vec<FileRef>,
    directory_path: &str,
    name: &str,
    config: &AliasConfig,
) -> TouchOutcome {
    if directory_path.is_empty() || name.is_empty() {
        return TouchOutcome::Skipped { evicted: 0 };
    }

    if let Some(index) = history.iter().position(|e| e.matches(directory_path, name)) {
        let mut entry = history.remove(index);
        entry.missing = false;
        history.insert(0, entry);
        return TouchOutcome::Promoted;
    }

    let limit = config.history_limit;
    let keep = limit.saturating_sub(1);
    let evicted = history.len().saturating_sub(keep);
    history.truncate(keep);

    if limit == 0 {
        return TouchOutcome::Skipped { evicted };
    }

    let entry = resolver::resolve(FileRef::new(directory_path, name), config);
    history.insert(0, entry);
    TouchOutcome::Inserted { evicted }
}

/// Flags every entry with the given key as missing. Returns how many matched.
pub fn apply_missing(history: &mut [FileRef], directory_path: &str, name: &str) -> usize {
    let mut found = 0;
    for entry in history.iter_mut().filter(|e| e.matches(directory_path, name)) {
        entry.missing = true;
        found += 1;
    }
    found
}

/// Recent-file registry over a [`StoragePort`].
///
/// Every operation reloads from storage, mutates, and writes back. Mutations
/// within one process are serialized so concurrent callers cannot lose each
/// other's updates.
pub struct HistoryStore<S: StoragePort> {
    storage: S,
    config: AliasConfig,
    writer: Mutex<()>,
}

impl<S: StoragePort> HistoryStore<S> {
    pub fn new(storage: S, config: AliasConfig) -> Self {
        Self {
            storage,
            config,
            writer: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &AliasConfig {
        &self.config
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn load(&self) -> Result<Vec<FileRef>, HistoryError> {
        Ok(self.storage.read_history()?.unwrap_or_default())
    }

    pub fn touch(&self, directory_path: &str, name: &str) -> Result<Vec<FileRef>, HistoryError> {
        let _guard = self.lock_writer();
        let mut history = self.load()?;
        let directory_path = normalize_dir(directory_path);

        let outcome = apply_touch(&mut history, &directory_path, name, &self.config);
        log::debug!("touch {}/{}: {:?}", directory_path, name, outcome);
        if outcome.changed() {
            self.storage.write_history(&history)?;
        }
        Ok(history)
    }

    pub fn mark_missing(
        &self,
        directory_path: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, HistoryError> {
        let _guard = self.lock_writer();
        let mut history = self.load()?;
        let directory_path = normalize_dir(directory_path);

        let found = apply_missing(&mut history, &directory_path, name);
        if found > 0 {
            log::info!("Marked {}/{} missing ({} entries)", directory_path, name, found);
            self.storage.write_history(&history)?;
        }
        Ok(history)
    }

    /// Stores `history` exactly as given. Capacity and duplicates are the
    /// caller's business.
    pub fn replace_all(&self, history: &[FileRef]) -> Result<(), HistoryError> {
        let _guard = self.lock_writer();
        self.storage.write_history(history)
    }

    /// Drops the entry at `index` and stores the rest. An index past the end
    /// leaves history untouched and writes nothing.
    pub fn remove_at(&self, index: usize) -> Result<Vec<FileRef>, HistoryError> {
        let _guard = self.lock_writer();
        let mut history = self.load()?;
        if index >= history.len() {
            log::warn!(
                "Ignoring removal of index {} from history of {}",
                index,
                history.len()
            );
            return Ok(history);
        }
        let removed = history.remove(index);
        log::info!("Removing {}/{} from history", removed.directory_path, removed.name);
        self.storage.write_history(&history)?;
        Ok(history)
    }

    /// Re-runs alias resolution over every stored entry and persists the result.
    pub fn relabel(&self) -> Result<Vec<FileRef>, HistoryError> {
        let _guard = self.lock_writer();
        let mut history = self.load()?;
        let resolved = resolver::resolve_all(&mut history, &self.config);
        log::info!("Relabeled {} of {} entries", resolved, history.len());
        self.storage.write_history(&history)?;
        Ok(history)
    }
}
