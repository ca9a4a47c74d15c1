use super::Fs;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory filesystem. Counts writes so tests can assert that an
/// operation did not persist anything, and can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemFs {
    pub files: Mutex<HashMap<PathBuf, String>>,
    pub dirs: Mutex<HashSet<PathBuf>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        self.ensure_parent(&path);
        lock(&self.files).insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.ensure_parent(&path);
        lock(&self.dirs).insert(path);
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.files).get(path.as_ref()).cloned()
    }

    /// Number of successful `write_atomic` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn ensure_parent(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if parent != Path::new("") && parent != Path::new("/") {
                let mut dirs = lock(&self.dirs);
                if !dirs.contains(parent) {
                    dirs.insert(parent.to_path_buf());
                    drop(dirs); // drop lock before recursing
                    self.ensure_parent(parent);
                }
            }
        }
    }
}

impl Fs for MemFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = lock(&self.files);
        files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write refused: {}", path.display()),
            ));
        }
        let text = String::from_utf8(contents.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.add_file(path, text);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).contains_key(path) || lock(&self.dirs).contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        lock(&self.dirs).contains(path)
    }
}
