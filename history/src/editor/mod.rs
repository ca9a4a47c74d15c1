use crate::error::{HistoryError, OpenError, SaveError};
use crate::history::service::HistoryService;
use crate::history::storage::StoragePort;
use crate::history::FileRef;
use crate::io::Fs;
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

/// A loaded JSON document together with the history after recording it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub filename: String,
    pub editable: bool,
    pub file_data: Value,
    pub file_history: Vec<FileRef>,
}

/// Reads and writes the JSON files being edited, keeping history in step.
pub struct Editor<F: Fs, S: StoragePort> {
    fs: F,
    history: HistoryService<S>,
}

/// Where an open request points: the file to read and its history key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    filename: PathBuf,
    directory_path: String,
    name: String,
}

impl<F: Fs, S: StoragePort> Editor<F, S> {
    pub fn new(fs: F, history: HistoryService<S>) -> Self {
        Self { fs, history }
    }

    pub fn history(&self) -> &HistoryService<S> {
        &self.history
    }

    /// Opens a document. `path` is either the containing directory (the
    /// history case) or the file itself. A path that does not exist is
    /// treated as a directory.
    pub fn open(&self, path: &str, name: &str) -> Result<Document, OpenError> {
        let target = self.target(path, name);

        let data = match self.read_json(&target.filename) {
            Ok(data) => data,
            Err(failure) => {
                log::warn!("Could not open {}: {:?}", target.filename.display(), failure);
                let history = self
                    .history
                    .report_missing(&target.directory_path, &target.name)
                    .or_else(keep_unsaved)?;
                return Err(match failure {
                    ReadFailure::Io(source) => OpenError::Read {
                        filename: target.filename,
                        history,
                        source,
                    },
                    ReadFailure::Json(source) => OpenError::Parse {
                        filename: target.filename,
                        history,
                        source,
                    },
                });
            }
        };

        let opened = self.history.open_file(&target.directory_path, &target.name)?;
        Ok(Document {
            filename: target.filename.to_string_lossy().to_string(),
            editable: true,
            file_data: data,
            file_history: opened.history,
        })
    }

    /// Writes `data` to `filename` as 2-space indented JSON.
    pub fn save(&self, filename: &str, data: &Value) -> Result<(), SaveError> {
        if filename.is_empty() {
            return Err(SaveError::EmptyFilename);
        }
        let body = serde_json::to_string_pretty(data).map_err(SaveError::Encode)?;
        let path = PathBuf::from(filename);
        self.fs
            .write_atomic(&path, body.as_bytes())
            .map_err(|source| SaveError::Write {
                filename: path.clone(),
                source,
            })?;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    fn target(&self, path: &str, name: &str) -> Target {
        let as_path = Path::new(path);
        if self.fs.exists(as_path) && !self.fs.is_dir(as_path) {
            let directory_path = as_path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            let name = if name.is_empty() {
                as_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            } else {
                name.to_string()
            };
            return Target {
                filename: as_path.to_path_buf(),
                directory_path,
                name,
            };
        }
        Target {
            filename: as_path.join(name),
            directory_path: path.to_string(),
            name: name.to_string(),
        }
    }

    fn read_json(&self, filename: &Path) -> Result<Value, ReadFailure> {
        let raw = self.fs.read_to_string(filename).map_err(ReadFailure::Io)?;
        serde_json::from_str(&raw).map_err(ReadFailure::Json)
    }
}

#[derive(Debug)]
enum ReadFailure {
    Io(io::Error),
    Json(serde_json::Error),
}

/// A failed write while flagging the entry still yields the flagged list.
fn keep_unsaved(err: HistoryError) -> Result<Vec<FileRef>, HistoryError> {
    match err {
        HistoryError::Persist { unsaved, source, .. } => {
            log::warn!("History not saved after failed open: {}", source);
            Ok(unsaved)
        }
        other => Err(other),
    }
}
