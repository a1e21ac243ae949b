//! The storage directory.
//!
//! Every stored file lives directly under one root. Caller-supplied names are
//! cut down to their final segment before they touch the filesystem, so
//! `a/b/report.txt` and `..\report.txt` both land on `<root>/report.txt`.
//!
//! Access is unsynchronised: two uploads of the same name race and the last
//! write to finish wins; a download may see a file mid-write.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::StorageError;

/// A storage root handed to the handlers.
#[derive(Clone, Debug)]
pub struct Storage {
    root: PathBuf,
}

/// Final path segment of `name`, treating both `/` and `\` as separators.
///
/// Returns `None` when nothing usable is left: an empty name, a trailing
/// separator, or the special entries `.` and `..`.
pub fn base_name(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    match base {
        "" | "." | ".." => None,
        other => Some(other),
    }
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory (and parents) if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Maps a caller-supplied name onto a path under the root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let base = base_name(name).ok_or_else(|| StorageError::InvalidName(name.to_owned()))?;
        Ok(self.root.join(base))
    }

    /// Writes `data` under the base name of `name`, creating or truncating
    /// the file. Returns the path written.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.resolve(name)?;
        fs::write(&path, data).await?;
        Ok(path)
    }

    /// Reads the whole file stored under `name`.
    ///
    /// Directories are reported as `NotFound`: only regular files are ever
    /// served.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        if fs::metadata(&path).await?.is_dir() {
            return Err(std::io::Error::from(std::io::ErrorKind::NotFound).into());
        }
        Ok(fs::read(&path).await?)
    }
}
