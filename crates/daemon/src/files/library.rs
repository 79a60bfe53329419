//! Guarded entry points over the asset root.
//!
//! [`AssetLibrary`] is what the HTTP layer and the CLI talk to. Every method
//! accepts a client-supplied relative path and runs it through the
//! [`PathGuard`] before any filesystem access.

use std::fs;
use std::path::{Path, PathBuf};

use protocol::{BrowseResponse, FileContentResponse, SearchResult};

use super::browser::DirectoryBrowser;
use super::classify::mime_type;
use super::content::ContentReader;
use super::error::FileError;
use super::guard::PathGuard;
use super::search::SearchEngine;
use crate::config::AssetsConfig;

/// Minimum search query length, in characters.
pub const MIN_QUERY_LENGTH: usize = 2;

/// A raw asset file resolved for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// MIME type guessed from the extension.
    pub mime_type: String,
}

/// Read-only view over a single asset directory.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    guard: PathGuard,
    browser: DirectoryBrowser,
    engine: SearchEngine,
    reader: ContentReader,
    confine_symlinks: bool,
}

impl AssetLibrary {
    /// Open the library rooted at `root`.
    ///
    /// The root is canonicalized once, so symlinks in the configured path
    /// itself are resolved up front. Fails if it is missing or not a
    /// directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, FileError> {
        let root = root.as_ref();
        let display = root.display().to_string();

        let canonical = fs::canonicalize(root).map_err(|e| FileError::from_io(&display, e))?;
        if !canonical.is_dir() {
            return Err(FileError::NotADirectory(display));
        }

        let guard = PathGuard::new(&canonical);
        tracing::debug!(root = %canonical.display(), "Opened asset library");

        Ok(Self {
            browser: DirectoryBrowser::new(guard.clone()),
            engine: SearchEngine::new(guard.clone()),
            reader: ContentReader::new(guard.clone()),
            guard,
            confine_symlinks: true,
        })
    }

    /// Open the library described by the `[assets]` configuration section.
    pub fn from_config(config: &AssetsConfig) -> Result<Self, FileError> {
        Ok(Self::open(&config.root)?
            .max_preview_size(Some(config.max_preview_size))
            .confine_symlinks(config.confine_symlinks))
    }

    /// Set the maximum size of a text preview.
    pub fn max_preview_size(mut self, max_size: Option<u64>) -> Self {
        self.reader = self.reader.max_size(max_size);
        self
    }

    /// Set whether symlinks resolving outside the root are hidden and refused.
    pub fn confine_symlinks(mut self, confine: bool) -> Self {
        self.browser = self.browser.confine_symlinks(confine);
        self.engine = self.engine.confine_symlinks(confine);
        self.reader = self.reader.confine_symlinks(confine);
        self.confine_symlinks = confine;
        self
    }

    /// The canonical asset root.
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// List a directory given its path relative to the root.
    pub fn browse(&self, requested: &str) -> Result<BrowseResponse, FileError> {
        let path = self.guard.resolve(requested)?;
        let listing = self.browser.list_directory(&path)?;

        let current_path = self.guard.relative(&path);
        let path_parts = current_path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();

        Ok(BrowseResponse {
            current_path,
            path_parts,
            directories: listing.directories,
            files: listing.files,
        })
    }

    /// Search the tree for `query`, optionally below a relative directory.
    pub fn search(&self, query: &str, scope: Option<&str>) -> Result<Vec<SearchResult>, FileError> {
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Err(FileError::InvalidQuery {
                min: MIN_QUERY_LENGTH,
            });
        }

        let path = self.guard.resolve(scope.unwrap_or(""))?;
        let relative = self.guard.relative(&path);
        let metadata = fs::metadata(&path).map_err(|e| FileError::from_io(&relative, e))?;
        if !metadata.is_dir() {
            return Err(FileError::NotADirectory(relative));
        }
        if self.confine_symlinks {
            self.guard.confine_real(&path)?;
        }

        Ok(self.engine.search(query, &path))
    }

    /// Read a text file given its path relative to the root.
    pub fn read_text(&self, requested: &str) -> Result<FileContentResponse, FileError> {
        let path = self.guard.resolve(requested)?;
        self.reader.read_text(&path)
    }

    /// Resolve a file of any type for raw download.
    pub fn resolve_file(&self, requested: &str) -> Result<AssetFile, FileError> {
        let path = self.guard.resolve(requested)?;
        let relative = self.guard.relative(&path);

        let metadata = fs::metadata(&path).map_err(|e| FileError::from_io(&relative, e))?;
        if self.confine_symlinks {
            self.guard.confine_real(&path)?;
        }
        if metadata.is_dir() {
            return Err(FileError::IsADirectory(relative));
        }

        Ok(AssetFile {
            mime_type: mime_type(&relative),
            size: metadata.len(),
            path,
        })
    }
}
