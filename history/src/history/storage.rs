use super::FileRef;
use crate::error::HistoryError;
use crate::io::Fs;
use std::io;
use std::path::PathBuf;

/// Durable home of the history list.
pub trait StoragePort: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn read_history(&self) -> Result<Option<Vec<FileRef>>, HistoryError>;
    fn write_history(&self, history: &[FileRef]) -> Result<(), HistoryError>;
}

/// Stores history as a pretty-printed JSON array in a single file.
pub struct JsonFileStorage<F: Fs> {
    fs: F,
    path: PathBuf,
}

impl<F: Fs> JsonFileStorage<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl<F: Fs> StoragePort for JsonFileStorage<F> {
    fn read_history(&self) -> Result<Option<Vec<FileRef>>, HistoryError> {
        let raw = match self.fs.read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(HistoryError::Load {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| HistoryError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    fn write_history(&self, history: &[FileRef]) -> Result<(), HistoryError> {
        let body = serde_json::to_string_pretty(history).map_err(HistoryError::Encode)?;
        self.fs
            .write_atomic(&self.path, body.as_bytes())
            .map_err(|source| HistoryError::Persist {
                path: self.path.clone(),
                unsaved: history.to_vec(),
                source,
            })?;
        log::info!(
            "Persisted {} history entries to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}
