//! Filesystem-aware path variants.
//!
//! A [`PathValue`] says nothing about what exists on disk. This module
//! probes the filesystem and promotes a value into the variant that matches
//! what it finds:
//!
//! | Found on disk        | Variant          |
//! |----------------------|------------------|
//! | nothing              | [`Entry::Path`]  |
//! | regular file         | [`Entry::File`]  |
//! | directory            | [`Entry::Dir`]   |
//! | symbolic link        | [`Entry::Link`]  |
//! | FIFO, socket, device | [`Entry::Path`]  |
//!
//! Each variant only exposes the operations that make sense for it, and
//! every variant can be turned back into a plain [`PathValue`].
//!
//! # Examples
//!
//! ```no_run
//! use fpath::{transform, Entry, PathValue};
//!
//! let path = PathValue::new("/etc/hosts").unwrap();
//! match transform(&path).unwrap() {
//!     Entry::File(file) => println!("{}", file.read_to_string().unwrap()),
//!     Entry::Dir(dir) => println!("{} children", dir.children().unwrap().count()),
//!     Entry::Link(link) => println!("-> {}", link.target().unwrap()),
//!     Entry::Path(path) => println!("{path} is not there"),
//! }
//! ```

pub mod dir;
pub mod file;
pub mod link;
pub mod probe;
pub mod stats;
pub mod transform;

use std::fmt;

use crate::path::PathValue;

pub use dir::{Children, Dir, Walk, WalkFilter};
pub use file::{File, OpenMode};
pub use link::Link;
pub use probe::{EntryKind, FilesystemProbe, MockProbe, OsProbe};
pub use stats::Stats;
pub use transform::{transform, Transformer, DEFAULT_MAX_LINK_HOPS};

/// A path promoted according to what exists on the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Nothing recognizable exists at the path.
    Path(PathValue),
    /// A regular file.
    File(File),
    /// A directory.
    Dir(Dir),
    /// A symbolic link.
    Link(Link),
}

impl Entry {
    /// The underlying path value.
    #[must_use]
    pub fn as_path(&self) -> &PathValue {
        match self {
            Self::Path(path) => path,
            Self::File(file) => file.as_path(),
            Self::Dir(dir) => dir.as_path(),
            Self::Link(link) => link.as_path(),
        }
    }

    /// Drop the specialized capabilities and keep the path.
    #[must_use]
    pub fn into_path(self) -> PathValue {
        match self {
            Self::Path(path) => path,
            Self::File(file) => file.into_path(),
            Self::Dir(dir) => dir.into_path(),
            Self::Link(link) => link.into_path(),
        }
    }

    /// A plain copy of the path with the same segments.
    #[must_use]
    pub fn to_generic_path(&self) -> PathValue {
        self.as_path().clone()
    }

    /// The kind of entry this variant stands for, or `None` for a generic
    /// path.
    #[must_use]
    pub fn kind(&self) -> Option<EntryKind> {
        match self {
            Self::Path(_) => None,
            Self::File(_) => Some(EntryKind::File),
            Self::Dir(_) => Some(EntryKind::Directory),
            Self::Link(_) => Some(EntryKind::Link),
        }
    }

    /// Whether this is a generic path.
    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Whether this is a file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Whether this is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Whether this is a link.
    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link(_))
    }

    /// The file, if this is one.
    #[must_use]
    pub fn into_file(self) -> Option<File> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// The directory, if this is one.
    #[must_use]
    pub fn into_dir(self) -> Option<Dir> {
        match self {
            Self::Dir(dir) => Some(dir),
            _ => None,
        }
    }

    /// The link, if this is one.
    #[must_use]
    pub fn into_link(self) -> Option<Link> {
        match self {
            Self::Link(link) => Some(link),
            _ => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_path(), f)
    }
}

impl AsRef<PathValue> for Entry {
    fn as_ref(&self) -> &PathValue {
        self.as_path()
    }
}

impl From<Entry> for PathValue {
    fn from(entry: Entry) -> Self {
        entry.into_path()
    }
}
