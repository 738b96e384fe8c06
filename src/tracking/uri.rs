//! Tracking location URIs
//!
//! A tracking location is either a local filesystem root (`file:<path>`)
//! or a remote tracking server (`http://` / `https://`).

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Location of a tracking backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingUri {
    /// Local filesystem store rooted at the given path.
    File(PathBuf),
    /// Remote tracking server base URI, passed through unchanged.
    Http(String),
}

impl TrackingUri {
    /// Build a local-filesystem location from an optional root and a
    /// relative path.
    ///
    /// If `root` is given the two are joined; otherwise the relative path
    /// is used as-is.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use std::path::Path;
    /// use bitacora::tracking::TrackingUri;
    ///
    /// let uri = TrackingUri::local(Some(Path::new("/tmp/proj")), Path::new("mlruns"));
    /// assert_eq!(uri.to_string(), "file:/tmp/proj/mlruns");
    /// ```
    #[must_use]
    pub fn local(root: Option<&Path>, path: &Path) -> Self {
        match root {
            Some(root) => Self::File(root.join(path)),
            None => Self::File(path.to_path_buf()),
        }
    }

    /// Parse a location string.
    ///
    /// Accepts `file:<path>`, `http://...`, and `https://...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedUri`] for any other scheme.
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(path) = s.strip_prefix("file:") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Self::Http(s.to_string()));
        }
        Err(Error::UnsupportedUri(s.to_string()))
    }
}

impl fmt::Display for TrackingUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Http(uri) => write!(f, "{uri}"),
        }
    }
}
