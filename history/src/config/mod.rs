// Config helpers
use crate::error::ConfigError;
use crate::io::Fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

pub const HISTORY_FILE_NAME: &str = "json-file-history.json";
pub const CONFIG_FILE_NAME: &str = "editor.config.json";
pub const DATA_DIR_ENV: &str = "JSONEDIT_DATA_DIR";
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Rule deriving an alias from a folder in the file's directory path.
/// `level` 1 is the immediate parent folder, 2 the one above it, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathAliasRule {
    pub level: i64,
    pub regex: String,
}

impl Default for PathAliasRule {
    fn default() -> Self {
        Self {
            level: 1,
            regex: String::new(),
        }
    }
}

/// Editor configuration. Fields missing from storage take their defaults;
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliasConfig {
    pub history_limit: usize,
    // Deterministic order via BTreeMap.
    pub path_aliases: BTreeMap<String, PathAliasRule>,
    pub aliases: BTreeMap<String, String>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            path_aliases: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Where history and configuration live on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `JSONEDIT_DATA_DIR` if set, else the default location.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".jsonedit");
        Self { data_dir }
    }
}

/// Loads `editor.config.json`, writing the defaults first when the file does
/// not exist yet.
pub struct ConfigProvider<F: Fs> {
    fs: F,
    path: PathBuf,
}

impl<F: Fs> ConfigProvider<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn load(&self) -> Result<AliasConfig, ConfigError> {
        let raw = match self.fs.read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No configuration at {}, creating defaults",
                    self.path.display()
                );
                self.materialize_default()?;
                self.fs
                    .read_to_string(&self.path)
                    .map_err(|source| self.io_error(source))?
            }
            Err(source) => return Err(self.io_error(source)),
        };
        parse_config(&raw).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn materialize_default(&self) -> Result<(), ConfigError> {
        let body = serde_json::to_string_pretty(&AliasConfig::default()).map_err(|source| {
            ConfigError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        self.fs
            .write_atomic(&self.path, body.as_bytes())
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parses stored configuration over the defaults. Top-level fields present in
/// `raw` replace the default value wholesale.
pub fn parse_config(raw: &str) -> Result<AliasConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memfs::MemFs;
    use std::sync::Arc;

    #[test]
    fn test_missing_config_is_written_once_then_read_back() {
        let fs = Arc::new(MemFs::new());
        let provider = ConfigProvider::new(fs.clone(), "/data/editor.config.json");

        let config = provider.load().unwrap();
        assert_eq!(config, AliasConfig::default());
        assert_eq!(fs.write_count(), 1);

        let stored = fs.contents("/data/editor.config.json").unwrap();
        assert!(stored.contains("\"historyLimit\": 30"));

        // Second load finds the file and does not write again.
        provider.load().unwrap();
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn test_partial_config_merges_with_defaults() {
        let fs = MemFs::new();
        fs.add_file(
            "/data/editor.config.json",
            r#"{ "aliases": { "cfg.json": "Config" }, "theme": "dark" }"#,
        );
        let config = ConfigProvider::new(fs, "/data/editor.config.json")
            .load()
            .unwrap();

        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.aliases.get("cfg.json").map(String::as_str), Some("Config"));
        assert!(config.path_aliases.is_empty());
    }

    #[test]
    fn test_path_alias_rule_defaults() {
        let config = parse_config(
            r#"{ "pathAliases": { "a.json": {}, "b.json": { "level": 3 }, "c.json": { "regex": "^v(\\d+)" } } }"#,
        )
        .unwrap();
        assert_eq!(config.path_aliases["a.json"], PathAliasRule::default());
        assert_eq!(config.path_aliases["b.json"].level, 3);
        assert_eq!(config.path_aliases["b.json"].regex, "");
        assert_eq!(config.path_aliases["c.json"].level, 1);
        assert_eq!(config.path_aliases["c.json"].regex, "^v(\\d+)");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let fs = MemFs::new();
        fs.add_file("/data/editor.config.json", "{ historyLimit: ");
        let err = ConfigProvider::new(fs, "/data/editor.config.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        assert!(parse_config(r#"{ "historyLimit": "thirty" }"#).is_err());
        assert!(parse_config("42").is_err());
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig::new("/tmp/je");
        assert_eq!(storage.history_path(), PathBuf::from("/tmp/je/json-file-history.json"));
        assert_eq!(storage.config_path(), PathBuf::from("/tmp/je/editor.config.json"));
    }
}
