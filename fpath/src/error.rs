//! Error types for the fpath library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the single [`Error`] enum below. Filesystem failures are mapped onto the
//! taxonomy through [`Error::from_io`], so callers can distinguish "does not
//! exist" from permission failures, non-empty directories and broken links
//! without inspecting raw OS error codes.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for operations that may fail with an fpath error.
///
/// # Examples
///
/// ```
/// use fpath::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the fpath library.
#[derive(Debug, Error)]
pub enum Error {
    /// A path string contains characters or forms that are illegal on the
    /// target platform.
    #[error("malformed path {path:?}: {reason}")]
    MalformedPath {
        /// The offending input.
        path: String,
        /// Why the input was rejected.
        reason: String,
    },

    /// A segment contains a separator or is otherwise not a single component.
    #[error("invalid segment {segment:?}: {reason}")]
    InvalidSegment {
        /// The offending segment.
        segment: String,
        /// Why the segment was rejected.
        reason: String,
    },

    /// A scalar index addressed a segment that does not exist.
    #[error("segment index {index} out of range for path of length {len}")]
    IndexOutOfRange {
        /// The requested index (possibly negative).
        index: isize,
        /// The number of segments in the path.
        len: usize,
    },

    /// The OS denied access to a path.
    #[error("access denied: {}", path.display())]
    AccessDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The operation requires an existing entry and none was found.
    #[error("not found: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The operation would create an entry that already exists.
    #[error("already exists: {}", path.display())]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// A directory could not be removed because it still has entries.
    #[error("directory not empty: {}", path.display())]
    NotEmpty {
        /// The non-empty directory.
        path: PathBuf,
    },

    /// A copy would read from and write to the same file.
    #[error("source and destination are the same file: {}", path.display())]
    SameFile {
        /// The file named on both sides.
        path: PathBuf,
    },

    /// A symbolic link points nowhere, forms a cycle, or chains too deep.
    #[error("broken link {}: {reason}", path.display())]
    BrokenLink {
        /// The link that could not be resolved.
        path: PathBuf,
        /// What went wrong during resolution.
        reason: String,
    },

    /// Any other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Map an I/O error raised while operating on `path` onto the taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::Error;
    /// use std::io;
    ///
    /// let err = Error::from_io(io::Error::from(io::ErrorKind::NotFound), "/missing");
    /// assert!(err.is_not_found());
    /// ```
    pub fn from_io(err: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::AccessDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            io::ErrorKind::DirectoryNotEmpty => Self::NotEmpty { path },
            _ => Self::Io(err),
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::NotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error is permission-related.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::AccessDenied { path: PathBuf::from("/restricted") };
    /// assert!(err.is_access_denied());
    /// ```
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_segment(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            segment: segment.into(),
            reason: reason.into(),
        }
    }
}
