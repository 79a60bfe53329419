//! # AssetView Protocol Library
//!
//! This crate provides the JSON wire types for the AssetView HTTP API.
//!
//! ## Overview
//!
//! The daemon exposes a read-only view over a single asset directory. Every
//! response body and request body it exchanges is defined here:
//!
//! - **Listings**: [`BrowseResponse`] with directory and file [`Entry`] values
//! - **Search**: [`SearchRequest`], [`SearchResponse`] and [`SearchResult`]
//! - **Preview**: [`FileContentResponse`] for text files
//! - **Errors**: [`ErrorMessage`] carrying a stable [`ErrorCode`]
//!
//! ## Example Usage
//!
//! ```rust
//! use protocol::{EntryKind, SearchResponse};
//!
//! let response = SearchResponse::new("boss".to_string(), Vec::new());
//! assert_eq!(response.count, 0);
//! assert_eq!(EntryKind::Audio.as_str(), "audio");
//! ```
//!
//! ## Modules
//!
//! - [`messages`]: Request, response and error bodies

pub mod messages;

pub use messages::{
    BrowseResponse, Entry, EntryKind, ErrorCode, ErrorMessage, FileContentResponse, SearchRequest,
    SearchResponse, SearchResult, TEXT_ENCODING,
};
