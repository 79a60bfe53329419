//! Recursive, symlink-safe name and tag search.
//!
//! The walk is a pre-order depth-first traversal. Each directory is
//! canonicalized before it is enumerated and its real path is recorded for
//! the duration of one search, so a directory reachable through several
//! symlinks is enumerated once and symlink cycles terminate.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use protocol::{EntryKind, SearchResult};
use tracing::{debug, warn};

use super::browser::{is_symlink, read_children};
use super::classify::{classify, extension_of};
use super::guard::PathGuard;
use super::tags::extract_tags;

/// Search engine bound to an asset root.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    guard: PathGuard,
    /// Skip symlinks whose target leaves the root.
    confine_symlinks: bool,
}

/// State for a single search call.
struct Walk<'a> {
    needle: String,
    visited: HashSet<PathBuf>,
    results: Vec<SearchResult>,
    engine: &'a SearchEngine,
}

impl SearchEngine {
    /// Create a search engine for the guard's root.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            confine_symlinks: true,
        }
    }

    /// Set whether symlinks resolving outside the root are skipped.
    pub fn confine_symlinks(mut self, confine: bool) -> Self {
        self.confine_symlinks = confine;
        self
    }

    /// Search the tree under `root_path` for names and tags containing `term`.
    ///
    /// Matching is a case-insensitive substring test. Any string is accepted,
    /// including the empty string, which matches every reachable entry.
    /// Directories that cannot be read are logged and skipped. With symlink
    /// confinement on, a directory whose real path is outside the root is
    /// never enumerated, including `root_path` itself.
    pub fn search(&self, term: &str, root_path: &Path) -> Vec<SearchResult> {
        let mut walk = Walk {
            needle: term.to_lowercase(),
            visited: HashSet::new(),
            results: Vec::new(),
            engine: self,
        };
        walk.visit(root_path);

        debug!(
            term = %term,
            directories = walk.visited.len(),
            matches = walk.results.len(),
            "Search finished"
        );
        walk.results
    }
}

impl Walk<'_> {
    fn visit(&mut self, dir: &Path) {
        let guard = &self.engine.guard;
        let parent_path = guard.relative(dir);

        let real = match fs::canonicalize(dir) {
            Ok(real) => real,
            Err(e) => {
                warn!(
                    path = %parent_path,
                    error = %e,
                    "Skipping directory that cannot be resolved"
                );
                return;
            }
        };
        if self.engine.confine_symlinks && !real.starts_with(guard.root()) {
            debug!(path = %parent_path, "Not searching directory outside asset root");
            return;
        }
        if !self.visited.insert(real) {
            debug!(path = %parent_path, "Directory already visited");
            return;
        }

        let children = match read_children(dir, &parent_path) {
            Ok(children) => children,
            Err(e) => {
                warn!(path = %parent_path, error = %e, "Skipping directory during search");
                return;
            }
        };

        for (name, item_path) in children {
            let metadata = match fs::metadata(&item_path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(
                        path = %guard.relative(&item_path),
                        error = %e,
                        "Skipping entry during search"
                    );
                    continue;
                }
            };

            if self.engine.confine_symlinks
                && is_symlink(&item_path)
                && !guard.is_confined(&item_path)
            {
                debug!(
                    path = %guard.relative(&item_path),
                    "Not following symlink out of asset root"
                );
                continue;
            }

            let lowered = name.to_lowercase();
            if metadata.is_dir() {
                if lowered.contains(&self.needle) {
                    self.results.push(SearchResult {
                        path: guard.relative(&item_path),
                        name,
                        kind: EntryKind::Directory,
                        size: None,
                        extension: None,
                        tags: None,
                        parent_path: parent_path.clone(),
                    });
                }
                self.visit(&item_path);
            } else {
                let tags = extract_tags(&name);
                let matches = lowered.contains(&self.needle)
                    || tags.iter().any(|tag| tag.contains(&self.needle));
                if matches {
                    self.results.push(SearchResult {
                        path: guard.relative(&item_path),
                        kind: classify(&name),
                        size: Some(metadata.len()),
                        extension: Some(extension_of(&name)),
                        tags: Some(tags),
                        parent_path: parent_path.clone(),
                        name,
                    });
                }
            }
        }
    }
}
