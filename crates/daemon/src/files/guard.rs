//! Confinement of client-supplied paths to the asset root.
//!
//! Requested paths are joined onto the root lexically, collapsing `.` and
//! `..` segments, before anything touches the filesystem. The joined path
//! must then lie within the root component-wise, so a root of `/app/assets`
//! never admits the sibling `/app/assets-evil`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::error::FileError;

/// Confines requested relative paths to a single root directory.
#[derive(Debug, Clone)]
pub struct PathGuard {
    /// Absolute, lexically normalised root.
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for the given root.
    ///
    /// `root` must be absolute. It is normalised lexically; callers that
    /// want symlinks in the root itself resolved should canonicalize it
    /// first.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: normalize(Path::new("/"), root.as_ref()),
        }
    }

    /// The confining root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a requested path to an absolute path under the root.
    ///
    /// Absolute requests are treated as relative to the root rather than
    /// replacing it. Fails with `AccessDenied` when `..` segments climb out
    /// of the root.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, FileError> {
        let joined = normalize(&self.root, Path::new(requested));

        if !joined.starts_with(&self.root) {
            tracing::debug!(requested = %requested, "Rejected path outside asset root");
            return Err(FileError::AccessDenied(requested.to_string()));
        }

        Ok(joined)
    }

    /// Express a path under the root as a `/`-separated relative path.
    ///
    /// The root itself maps to the empty string.
    pub fn relative(&self, path: &Path) -> String {
        let stripped = path.strip_prefix(&self.root).unwrap_or_else(|_| Path::new(""));
        stripped
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Check whether the real (symlink-resolved) location of `path` is still
    /// inside the root.
    ///
    /// Returns `false` when the path cannot be resolved.
    pub fn is_confined(&self, path: &Path) -> bool {
        fs::canonicalize(path)
            .map(|real| real.starts_with(&self.root))
            .unwrap_or(false)
    }

    /// Resolve symlinks in `path` and require the result to stay inside the
    /// root.
    pub fn confine_real(&self, path: &Path) -> Result<PathBuf, FileError> {
        let relative = self.relative(path);
        let real = fs::canonicalize(path).map_err(|e| FileError::from_io(&relative, e))?;

        if !real.starts_with(&self.root) {
            tracing::debug!(path = %relative, "Rejected symlink resolving outside asset root");
            return Err(FileError::AccessDenied(relative));
        }

        Ok(real)
    }
}

/// Join `requested` onto `base`, collapsing `.` and `..` lexically.
///
/// Root and prefix components of `requested` are ignored, and `..` never
/// climbs above the filesystem root.
fn normalize(base: &Path, requested: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in requested.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}
