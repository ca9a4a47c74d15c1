//! Recent-file history for the JSON editor.
//!
//! A bounded, most-recent-first list of opened files, each labeled by
//! configurable alias rules, persisted as JSON next to the editor's config.

pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod io;
pub mod resolver;
pub mod router;
pub mod util;

pub use config::{AliasConfig, PathAliasRule, StorageConfig};
pub use error::{ConfigError, HistoryError, OpenError, SaveError};
pub use history::service::HistoryService;
pub use history::{FileRef, HistoryStore};
