//! Read-only asset engine: classification, listing, search and preview.
//!
//! This module provides:
//! - Extension-based classification and MIME lookup
//! - Tag extraction from file names
//! - Path confinement to the asset root
//! - Directory listing with classified entries
//! - Recursive name and tag search with symlink cycle protection
//! - Text preview for an allow-list of extensions
//!
//! # Security
//!
//! Every client-supplied path goes through [`PathGuard`], which rejects
//! anything that lexically escapes the root before the filesystem is
//! touched. Symlinks resolving outside the root are additionally hidden
//! and refused unless confinement is turned off.

pub mod browser;
pub mod classify;
pub mod content;
pub mod error;
pub mod guard;
pub mod library;
pub mod search;
pub mod tags;

pub use browser::{DirectoryBrowser, Listing};
pub use classify::{classify, extension_of, mime_type, DEFAULT_MIME_TYPE, PREVIEW_EXTENSIONS};
pub use content::ContentReader;
pub use error::FileError;
pub use guard::PathGuard;
pub use library::{AssetFile, AssetLibrary, MIN_QUERY_LENGTH};
pub use search::SearchEngine;
pub use tags::extract_tags;
