//! Text preview of allow-listed file types.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use protocol::{FileContentResponse, TEXT_ENCODING};

use super::classify::{extension_of, is_previewable};
use super::error::FileError;
use super::guard::PathGuard;

/// Reads text files under an asset root for preview.
#[derive(Debug, Clone)]
pub struct ContentReader {
    guard: PathGuard,
    /// Largest file returned, in bytes. `None` disables the limit.
    max_size: Option<u64>,
    /// Reject symlinks that resolve outside the root.
    confine_symlinks: bool,
}

impl ContentReader {
    /// Create a reader with no size limit.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            max_size: None,
            confine_symlinks: true,
        }
    }

    /// Set the maximum previewable file size.
    pub fn max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set whether symlinks resolving outside the root are rejected.
    pub fn confine_symlinks(mut self, confine: bool) -> Self {
        self.confine_symlinks = confine;
        self
    }

    /// Read a confined file as text.
    ///
    /// Checks run in order: existence, not a directory, extension in the
    /// preview allow-list, size limit. Invalid UTF-8 sequences are replaced
    /// rather than rejected.
    pub fn read_text(&self, path: &Path) -> Result<FileContentResponse, FileError> {
        let relative = self.guard.relative(path);

        let metadata = fs::metadata(path).map_err(|e| FileError::from_io(&relative, e))?;
        if self.confine_symlinks {
            self.guard.confine_real(path)?;
        }
        if metadata.is_dir() {
            return Err(FileError::IsADirectory(relative));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&name);
        if !is_previewable(&extension) {
            return Err(FileError::UnsupportedType(relative));
        }

        let size = metadata.len();
        if let Some(limit) = self.max_size {
            if size > limit {
                return Err(FileError::TooLarge { size, limit });
            }
        }

        let bytes = self.read_bounded(path, &relative)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        Ok(FileContentResponse {
            content,
            extension,
            size,
            encoding: TEXT_ENCODING.to_string(),
        })
    }

    /// Read at most `max_size` bytes; a file that grew past the limit since
    /// it was stat'ed is still `TooLarge`.
    fn read_bounded(&self, path: &Path, relative: &str) -> Result<Vec<u8>, FileError> {
        let file = File::open(path).map_err(|e| FileError::from_io(relative, e))?;
        let mut bytes = Vec::new();

        match self.max_size {
            Some(limit) => {
                file.take(limit.saturating_add(1))
                    .read_to_end(&mut bytes)
                    .map_err(|e| FileError::from_io(relative, e))?;
                let read = bytes.len() as u64;
                if read > limit {
                    return Err(FileError::TooLarge { size: read, limit });
                }
            }
            None => {
                let mut file = file;
                file.read_to_end(&mut bytes)
                    .map_err(|e| FileError::from_io(relative, e))?;
            }
        }

        Ok(bytes)
    }
}
