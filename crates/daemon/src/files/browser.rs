//! Directory listing with classification.
//!
//! This module lists the immediate children of a confined directory, splitting
//! them into directories and classified files.

use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use protocol::Entry;
use tracing::{debug, warn};

use super::classify::{classify, extension_of, mime_type};
use super::error::FileError;
use super::guard::PathGuard;
use super::tags::extract_tags;

/// Children of a directory, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Child directories.
    pub directories: Vec<Entry>,
    /// Child files.
    pub files: Vec<Entry>,
}

/// Directory browser bound to an asset root.
///
/// Listings are computed fresh on every call. Within each collection entries
/// are ordered by case-insensitive name.
#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    guard: PathGuard,
    /// Omit or reject symlinks that resolve outside the root.
    confine_symlinks: bool,
}

impl DirectoryBrowser {
    /// Create a browser for the guard's root.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            confine_symlinks: true,
        }
    }

    /// Set whether symlinks resolving outside the root are hidden.
    pub fn confine_symlinks(mut self, confine: bool) -> Self {
        self.confine_symlinks = confine;
        self
    }

    /// List the immediate children of a confined directory.
    ///
    /// Children that cannot be stat'ed are logged and skipped. Failing to
    /// enumerate the directory itself is an error.
    pub fn list_directory(&self, path: &Path) -> Result<Listing, FileError> {
        let relative = self.guard.relative(path);

        let metadata = fs::metadata(path).map_err(|e| FileError::from_io(&relative, e))?;
        if !metadata.is_dir() {
            return Err(FileError::NotADirectory(relative));
        }
        if self.confine_symlinks {
            self.guard.confine_real(path)?;
        }

        let mut listing = Listing::default();
        for (name, item_path) in read_children(path, &relative)? {
            let metadata = match fs::metadata(&item_path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(
                        path = %self.guard.relative(&item_path),
                        error = %e,
                        "Skipping entry that cannot be stat'ed"
                    );
                    continue;
                }
            };

            if self.confine_symlinks && !self.symlink_confined(&item_path) {
                debug!(
                    path = %self.guard.relative(&item_path),
                    "Hiding symlink that leaves the asset root"
                );
                continue;
            }

            let item_relative = self.guard.relative(&item_path);
            if metadata.is_dir() {
                listing.directories.push(Entry::directory(
                    name,
                    item_relative,
                    modified_time(&metadata),
                ));
            } else {
                listing.files.push(file_entry(name, item_relative, &metadata));
            }
        }

        Ok(listing)
    }

    /// Non-symlinks are always confined; symlinks only when their target is.
    fn symlink_confined(&self, path: &Path) -> bool {
        !is_symlink(path) || self.guard.is_confined(path)
    }
}

/// Build a fully classified file entry.
pub(crate) fn file_entry(name: String, path: String, metadata: &Metadata) -> Entry {
    Entry {
        kind: classify(&name),
        size: Some(metadata.len()),
        extension: Some(extension_of(&name)),
        modified: modified_time(metadata),
        tags: Some(extract_tags(&name)),
        mime_type: Some(mime_type(&name)),
        name,
        path,
    }
}

/// Last modification time, falling back to the epoch when unavailable.
pub(crate) fn modified_time(metadata: &Metadata) -> DateTime<Utc> {
    DateTime::from(metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH))
}

/// Enumerate a directory's children as `(name, path)` pairs in name order.
///
/// Unreadable individual entries are skipped.
pub(crate) fn read_children(
    dir: &Path,
    relative: &str,
) -> Result<Vec<(String, PathBuf)>, FileError> {
    let entries = fs::read_dir(dir).map_err(|source| FileError::ReadError {
        path: relative.to_string(),
        source,
    })?;

    let mut children: Vec<(String, PathBuf)> = entries
        .filter_map(|entry_result| match entry_result {
            Ok(entry) => Some((entry.file_name().to_string_lossy().to_string(), entry.path())),
            Err(e) => {
                warn!(path = %relative, error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .collect();

    children.sort_by(|(a, _), (b, _)| compare_names(a, b));
    Ok(children)
}

/// Case-insensitive name order, ties broken by exact name.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub(crate) fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
