//! Symbolic links.

use std::fmt;
use std::fs;

use crate::entry::transform::{join_target, DEFAULT_MAX_LINK_HOPS};
use crate::entry::{Entry, Transformer};
use crate::error::{Error, Result};
use crate::path::{IntoPathValue, PathValue};

/// A path known to name a symbolic link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    path: PathValue,
    max_hops: usize,
}

impl Link {
    /// Build a link handle from any accepted path input (host platform).
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be parsed.
    pub fn new(path: impl IntoPathValue) -> Result<Self> {
        PathValue::new(path).map(Self::from_path)
    }

    /// Wrap an existing value without probing.
    #[must_use]
    pub fn from_path(path: PathValue) -> Self {
        Self {
            path,
            max_hops: DEFAULT_MAX_LINK_HOPS,
        }
    }

    /// Set the hop bound used by [`Link::resolve`].
    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// The underlying path.
    #[must_use]
    pub fn as_path(&self) -> &PathValue {
        &self.path
    }

    /// Drop the link capabilities and keep the path.
    #[must_use]
    pub fn into_path(self) -> PathValue {
        self.path
    }

    /// A plain copy of the path.
    #[must_use]
    pub fn to_generic_path(&self) -> PathValue {
        self.path.clone()
    }

    /// What the link points to, exactly as stored. Not followed further.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link is gone and `Io` if the entry is not a
    /// link.
    pub fn target(&self) -> Result<PathValue> {
        let os_path = self.path.to_path_buf();
        let target = fs::read_link(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        PathValue::try_from(target.as_path())
    }

    /// The target interpreted relative to the directory holding the link.
    ///
    /// # Errors
    ///
    /// Same as [`Link::target`].
    pub fn joined_target(&self) -> Result<PathValue> {
        join_target(&self.path, &self.target()?)
    }

    /// Follow the chain of links to the final entry.
    ///
    /// # Errors
    ///
    /// Returns `BrokenLink` if the chain ends nowhere, loops, or is longer
    /// than the hop bound.
    pub fn resolve(&self) -> Result<Entry> {
        Transformer::new()
            .with_max_link_hops(self.max_hops)
            .resolve_link(&self.path)
    }

    /// Create a symbolic link at this path pointing to `target`.
    ///
    /// Relative targets are stored as given and interpreted against the
    /// link's directory.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if something is already at this path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fpath::entry::Link;
    ///
    /// let link = Link::new("current").unwrap();
    /// link.create("releases/v2").unwrap();
    /// assert_eq!(link.target().unwrap().to_string(), "releases/v2");
    /// ```
    pub fn create(&self, target: impl IntoPathValue) -> Result<()> {
        let target = target.into_path_value(self.path.platform())?;
        let os_path = self.path.to_path_buf();
        create_symlink(&target, &self.path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("linked {} -> {target}", self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(target: &PathValue, link: &PathValue) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target.to_path_buf(), link.to_path_buf())
}

#[cfg(windows)]
fn create_symlink(target: &PathValue, link: &PathValue) -> std::io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    let is_dir = join_target(link, target)
        .map(|joined| joined.to_path_buf().is_dir())
        .unwrap_or(false);
    if is_dir {
        symlink_dir(target.to_path_buf(), link.to_path_buf())
    } else {
        symlink_file(target.to_path_buf(), link.to_path_buf())
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl AsRef<PathValue> for Link {
    fn as_ref(&self) -> &PathValue {
        &self.path
    }
}
