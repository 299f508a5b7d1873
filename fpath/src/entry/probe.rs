//! Filesystem probing.
//!
//! This module provides trait-based classification of what currently exists
//! at a path. The trait keeps dispatch logic testable: production code uses
//! [`OsProbe`], tests can substitute [`MockProbe`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;

use crate::error::{Error, Result};
use crate::path::PathValue;

/// What a probe found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Nothing exists at the path.
    Absent,
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link (only reported by probes that do not follow links).
    Link,
    /// Something else: a FIFO, socket or device.
    Other,
}

impl EntryKind {
    /// Classify OS metadata.
    #[must_use]
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Link
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absent => "absent",
            Self::File => "file",
            Self::Directory => "directory",
            Self::Link => "link",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Trait for classifying filesystem entries.
///
/// # Examples
///
/// ```
/// use fpath::entry::{EntryKind, FilesystemProbe, OsProbe};
/// use fpath::PathValue;
///
/// let probe = OsProbe::new();
/// let path = PathValue::new("/definitely/not/here/fpath").unwrap();
/// assert_eq!(probe.probe(&path).unwrap(), EntryKind::Absent);
/// ```
pub trait FilesystemProbe {
    /// Classify the entry at `path`.
    ///
    /// A path that does not exist is [`EntryKind::Absent`], not an error.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the OS refuses the query and `Io` for any
    /// other OS failure.
    fn probe(&self, path: &PathValue) -> Result<EntryKind>;
}

/// Production probe backed by the OS metadata calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe {
    follow_links: bool,
}

impl OsProbe {
    /// A probe that reports links as [`EntryKind::Link`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe that classifies links by their target, so a dangling link is
    /// [`EntryKind::Absent`].
    #[must_use]
    pub fn following_links() -> Self {
        Self { follow_links: true }
    }

    /// Whether this probe follows links.
    #[must_use]
    pub fn follows_links(&self) -> bool {
        self.follow_links
    }
}

impl FilesystemProbe for OsProbe {
    fn probe(&self, path: &PathValue) -> Result<EntryKind> {
        let os_path = path.to_path_buf();
        let metadata = if self.follow_links {
            fs::metadata(&os_path)
        } else {
            fs::symlink_metadata(&os_path)
        };

        match metadata {
            Ok(metadata) => Ok(EntryKind::from_file_type(metadata.file_type())),
            Err(e) if is_absent(&e) => Ok(EntryKind::Absent),
            Err(e) => Err(Error::from_io(e, &os_path)),
        }
    }
}

/// Errors that mean "nothing is there", including a path running through a
/// regular file.
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Mock probe with a fixed answer per path.
///
/// Paths that were never registered probe as [`EntryKind::Absent`].
///
/// # Examples
///
/// ```
/// use fpath::entry::{EntryKind, FilesystemProbe, MockProbe};
/// use fpath::PathValue;
///
/// let file = PathValue::new("notes.txt").unwrap();
/// let probe = MockProbe::new().with_entry(&file, EntryKind::File);
///
/// assert_eq!(probe.probe(&file).unwrap(), EntryKind::File);
/// assert_eq!(probe.probe(&PathValue::new("other").unwrap()).unwrap(), EntryKind::Absent);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    entries: HashMap<PathValue, EntryKind>,
    denied: Vec<PathValue>,
}

impl MockProbe {
    /// Create an empty mock probe (everything is absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the kind reported for `path`.
    #[must_use]
    pub fn with_entry(mut self, path: &PathValue, kind: EntryKind) -> Self {
        self.entries.insert(path.clone(), kind);
        self
    }

    /// Make probing `path` fail with `AccessDenied`.
    #[must_use]
    pub fn with_denied(mut self, path: &PathValue) -> Self {
        self.denied.push(path.clone());
        self
    }
}

impl FilesystemProbe for MockProbe {
    fn probe(&self, path: &PathValue) -> Result<EntryKind> {
        if self.denied.contains(path) {
            return Err(Error::AccessDenied {
                path: path.to_path_buf(),
            });
        }
        Ok(self.entries.get(path).copied().unwrap_or(EntryKind::Absent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn value(path: &std::path::Path) -> PathValue {
        PathValue::try_from(path).unwrap()
    }

    #[test]
    fn test_probe_absent() {
        let temp = TempDir::new().unwrap();
        let missing = value(&temp.path().join("missing"));
        assert_eq!(OsProbe::new().probe(&missing).unwrap(), EntryKind::Absent);
    }

    #[test]
    fn test_probe_through_regular_file_is_absent() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        let below = value(&file.join("child"));
        assert_eq!(OsProbe::new().probe(&below).unwrap(), EntryKind::Absent);
    }

    #[test]
    fn test_probe_file_and_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("test.txt");
        fs::write(&file, b"").unwrap();

        let probe = OsProbe::new();
        assert_eq!(probe.probe(&value(&file)).unwrap(), EntryKind::File);
        assert_eq!(probe.probe(&value(temp.path())).unwrap(), EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_link_follow_modes() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target.txt");
        let link = temp.path().join("link");
        let dangling = temp.path().join("dangling");
        fs::write(&target, b"data").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), &dangling).unwrap();

        assert_eq!(OsProbe::new().probe(&value(&link)).unwrap(), EntryKind::Link);
        assert_eq!(
            OsProbe::following_links().probe(&value(&link)).unwrap(),
            EntryKind::File
        );
        assert_eq!(OsProbe::new().probe(&value(&dangling)).unwrap(), EntryKind::Link);
        assert_eq!(
            OsProbe::following_links().probe(&value(&dangling)).unwrap(),
            EntryKind::Absent
        );
    }

    #[test]
    fn test_mock_probe() {
        let dir = PathValue::new("dir").unwrap();
        let denied = PathValue::new("secret").unwrap();
        let probe = MockProbe::new()
            .with_entry(&dir, EntryKind::Directory)
            .with_denied(&denied);

        assert_eq!(probe.probe(&dir).unwrap(), EntryKind::Directory);
        assert!(probe.probe(&denied).unwrap_err().is_access_denied());
        assert_eq!(
            probe.probe(&PathValue::new("x").unwrap()).unwrap(),
            EntryKind::Absent
        );
    }

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::Directory.to_string(), "directory");
        assert_eq!(EntryKind::Absent.to_string(), "absent");
    }
}
