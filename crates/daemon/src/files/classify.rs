//! Extension-based file classification.
//!
//! Several extensions belong to more than one category (`.ogg` is both audio
//! and video). Categories are therefore listed in precedence order and the
//! lookup table keeps the first category that claims an extension.

use std::collections::HashMap;
use std::sync::LazyLock;

use protocol::EntryKind;

/// MIME type reported when no mapping is registered for an extension.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Extension sets per category, in precedence order.
const CATEGORIES: &[(EntryKind, &[&str])] = &[
    (
        EntryKind::Image,
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff", ".ico",
        ],
    ),
    (
        EntryKind::Audio,
        &[".mp3", ".wav", ".ogg", ".m4a", ".aac", ".flac", ".wma"],
    ),
    (
        EntryKind::Video,
        &[".mp4", ".webm", ".ogg", ".avi", ".mov", ".wmv", ".flv"],
    ),
    (
        EntryKind::Archive,
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"],
    ),
    (
        EntryKind::Game,
        &[".lua", ".json", ".xml", ".tmx", ".tsx", ".atlas", ".fnt"],
    ),
    (
        EntryKind::Text,
        &[
            ".txt", ".md", ".js", ".py", ".c", ".cpp", ".h", ".css", ".html", ".yaml", ".yml",
        ],
    ),
];

/// Extensions whose contents may be returned by the content reader.
pub const PREVIEW_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".json", ".xml", ".lua", ".js", ".py", ".c", ".cpp", ".h", ".css", ".html",
    ".yaml", ".yml",
];

static KIND_BY_EXTENSION: LazyLock<HashMap<&'static str, EntryKind>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for (kind, extensions) in CATEGORIES {
        for ext in extensions.iter() {
            table.entry(*ext).or_insert(*kind);
        }
    }
    table
});

/// Returns the lowercased extension of `name`, including the leading dot.
///
/// A leading dot does not start an extension (`.bashrc` has none), and a
/// name without a dot yields an empty string.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Returns `name` without its final extension.
pub fn stem_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Classify a file name into one of the seven file kinds.
///
/// Never returns [`EntryKind::Directory`].
pub fn classify(name: &str) -> EntryKind {
    KIND_BY_EXTENSION
        .get(extension_of(name).as_str())
        .copied()
        .unwrap_or(EntryKind::Unknown)
}

/// Guess the MIME type of a file name.
pub fn mime_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}

/// Check whether a lowercased extension is in the preview allow-list.
pub fn is_previewable(extension: &str) -> bool {
    PREVIEW_EXTENSIONS.contains(&extension)
}
