use crate::history::FileRef;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to access configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the history store. A missing history file is never one of
/// these; it reads as an empty list.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("malformed history data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read history from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The mutation was computed but could not be written. `unsaved` holds
    /// the list the caller would have seen had the write succeeded.
    #[error("failed to persist history to {path}: {source}")]
    Persist {
        path: PathBuf,
        unsaved: Vec<FileRef>,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),
}

impl HistoryError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, HistoryError::Malformed { .. })
    }

    pub fn unsaved_history(&self) -> Option<&[FileRef]> {
        match self {
            HistoryError::Persist { unsaved, .. } => Some(unsaved),
            _ => None,
        }
    }
}

/// A document could not be opened. The entry has already been flagged
/// missing; `history` is the list after that update.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to read {filename}: {source}")]
    Read {
        filename: PathBuf,
        history: Vec<FileRef>,
        #[source]
        source: io::Error,
    },
    #[error("{filename} is not valid JSON: {source}")]
    Parse {
        filename: PathBuf,
        history: Vec<FileRef>,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl OpenError {
    pub fn history(&self) -> Option<&[FileRef]> {
        match self {
            OpenError::Read { history, .. } | OpenError::Parse { history, .. } => Some(history),
            OpenError::History(e) => e.unsaved_history(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no filename given")]
    EmptyFilename,
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write {filename}: {source}")]
    Write {
        filename: PathBuf,
        #[source]
        source: io::Error,
    },
}
