//! Filesystem entries as seen by the walker

use std::ffi::OsString;
use std::fs::{self, FileType};
use std::path::{Path, PathBuf};

use crate::error::{Result, WalkerError};

/// One entry produced by listing a directory
///
/// `is_dir` reflects the entry itself, not its target: a symlink to a
/// directory has `is_dir == false` and `is_symlink == true`, so it is never
/// listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path as built from the walk root
    pub path: PathBuf,

    /// Bare file name (lossy UTF-8)
    pub name: String,

    /// True for real directories
    pub is_dir: bool,

    /// True for symbolic links
    pub is_symlink: bool,
}

impl Entry {
    /// Create an entry from its parts
    pub fn new(path: PathBuf, name: impl Into<String>, is_dir: bool, is_symlink: bool) -> Self {
        Self {
            path,
            name: name.into(),
            is_dir,
            is_symlink,
        }
    }

    /// The walk root, already checked to be a directory
    pub fn root(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self::new(path.to_path_buf(), name, true, false)
    }

    fn from_parts(path: PathBuf, name: OsString, file_type: FileType) -> Self {
        Self {
            path,
            name: name.to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
        }
    }

    /// True if this directory may be listed
    pub fn is_listable(&self) -> bool {
        self.is_dir && !self.is_symlink
    }

    /// List the children of directory `dir`
    ///
    /// Child types come from the directory entry (no symlink following).
    pub fn list(dir: &Path) -> Result<Vec<Entry>> {
        let read_dir = fs::read_dir(dir).map_err(|source| WalkerError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        read_dir
            .map(|item| {
                let item = item.map_err(|source| WalkerError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
                let path = item.path();
                let file_type = item
                    .file_type()
                    .map_err(|source| WalkerError::Stat {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Entry::from_parts(path, item.file_name(), file_type))
            })
            .collect()
    }
}
