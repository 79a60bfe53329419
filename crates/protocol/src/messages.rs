//! Wire message definitions for AssetView.
//!
//! This module defines the JSON bodies exchanged between the daemon and
//! browser clients. Field names follow the shape the bundled UI expects,
//! which is why a few of them are camelCase and `parent_path` is not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Encoding label reported for every text preview.
pub const TEXT_ENCODING: &str = "utf8";

/// Coarse category of a directory entry.
///
/// Files are classified by extension into one of the seven file kinds;
/// `Directory` is only ever produced for directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// Raster or vector image.
    Image,
    /// Audio clip.
    Audio,
    /// Video clip.
    Video,
    /// Compressed archive.
    Archive,
    /// Game data (scripts, maps, atlases, fonts).
    Game,
    /// Plain text or source code.
    Text,
    /// Anything else.
    Unknown,
}

impl EntryKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Archive => "archive",
            Self::Game => "game",
            Self::Text => "text",
            Self::Unknown => "unknown",
        }
    }

    /// Check if this kind denotes a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single directory or file in a listing.
///
/// Directory entries carry only `name`, `path`, `type` and `modified`;
/// the remaining fields are present for files only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Base name.
    pub name: String,
    /// Path relative to the asset root, `/`-separated.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Lowercased extension including the leading dot, or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Search tokens derived from the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// MIME type guessed from the extension.
    #[serde(
        rename = "mimeType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
}

impl Entry {
    /// Create a directory entry.
    pub fn directory(name: String, path: String, modified: DateTime<Utc>) -> Self {
        Self {
            name,
            path,
            kind: EntryKind::Directory,
            size: None,
            extension: None,
            modified,
            tags: None,
            mime_type: None,
        }
    }
}

/// A search hit, either a directory matched by name or a file matched by
/// name or tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Base name.
    pub name: String,
    /// Path relative to the asset root.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Lowercased extension (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Search tokens (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Relative path of the containing directory.
    pub parent_path: String,
}

/// Response to `GET /api/browse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    /// Normalised relative path of the listed directory (`""` for the root).
    pub current_path: String,
    /// Non-empty segments of `current_path`.
    pub path_parts: Vec<String>,
    /// Child directories.
    pub directories: Vec<Entry>,
    /// Child files.
    pub files: Vec<Entry>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search term; at least two characters.
    #[serde(default)]
    pub query: Option<String>,
    /// Optional relative directory to restrict the search to.
    #[serde(default)]
    pub path: Option<String>,
}

/// Response to `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Matches in traversal order.
    pub results: Vec<SearchResult>,
    /// Number of matches.
    pub count: usize,
}

impl SearchResponse {
    /// Create a response, deriving `count` from `results`.
    pub fn new(query: String, results: Vec<SearchResult>) -> Self {
        let count = results.len();
        Self {
            query,
            results,
            count,
        }
    }
}

/// Response to `GET /api/file-content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentResponse {
    /// File contents.
    pub content: String,
    /// Lowercased extension including the leading dot.
    pub extension: String,
    /// Size in bytes on disk.
    pub size: u64,
    /// Encoding label, always [`TEXT_ENCODING`].
    pub encoding: String,
}

/// Stable error kinds reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The path escapes the asset root.
    AccessDenied,
    /// The path does not exist.
    NotFound,
    /// A directory was expected.
    NotADirectory,
    /// A file was expected.
    IsADirectory,
    /// The file type cannot be previewed.
    UnsupportedType,
    /// The file exceeds the preview size limit.
    TooLarge,
    /// The search query is missing or too short.
    InvalidQuery,
    /// Filesystem or internal failure.
    ReadError,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human-readable message.
    pub error: String,
    /// Stable error kind.
    pub code: ErrorCode,
}
