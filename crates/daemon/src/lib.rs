//! # AssetView Daemon Library
//!
//! This crate provides the server side of AssetView, a read-only browser for
//! a directory of game assets.
//!
//! ## Overview
//!
//! The daemon exposes a single asset root over HTTP. It provides:
//!
//! - **Classification**: Map file extensions to asset kinds and MIME types
//! - **Tagging**: Derive search tags from file names
//! - **Path Confinement**: Keep every request inside the asset root
//! - **Browsing**: List directories as classified, sorted entries
//! - **Search**: Recursive name and tag search that survives symlink cycles
//! - **Preview**: Return the text of scripts, configs and documents
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      AssetServer                         │
//! │   /api/*  ──►  router  ──►  AssetLibrary                 │
//! │   /assets/*  ──►  raw file stream                        │
//! │   /  ──►  UI bundle                                      │
//! ├──────────────────────────────────────────────────────────┤
//! │                      AssetLibrary                        │
//! │  ┌───────────┐ ┌────────────────┐ ┌──────────────┐       │
//! │  │ PathGuard │ │DirectoryBrowser│ │ SearchEngine │  ...  │
//! │  └───────────┘ └────────────────┘ └──────────────┘       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daemon::{AssetServer, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load_default()?;
//!     config.apply_env_overrides();
//!     config.validate()?;
//!
//!     let server = AssetServer::start(&config).await?;
//!     println!("listening on {}", server.addr());
//!
//!     server.stop().await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`files`]: Classification, confinement, listing, search and preview
//! - [`router`]: HTTP routes and error mapping
//! - [`server`]: Listener and graceful shutdown

pub mod config;
pub mod files;
pub mod router;
pub mod server;

// Re-export protocol for convenience
pub use protocol;

// Re-export config types for convenience
pub use config::Config;

// Re-export files types for convenience
pub use files::{AssetLibrary, FileError, PathGuard};

// Re-export server types for convenience
pub use router::{app_router, ApiError};
pub use server::AssetServer;
