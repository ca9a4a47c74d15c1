pub mod fs;
pub mod memfs;

use std::io;
use std::path::Path;

/// Abstract filesystem trait for deterministic testing.
///
/// Reads return `io::ErrorKind::NotFound` for absent files so callers can
/// tell "nothing stored yet" apart from real failures.
pub trait Fs: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    /// Replaces the file at `path` in one step, creating parent directories.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

impl<F: Fs + ?Sized> Fs for std::sync::Arc<F> {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write_atomic(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }
}
