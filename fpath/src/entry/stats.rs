//! Metadata snapshots.

use std::fs::{self, FileTimes, Metadata};
use std::time::SystemTime;

use crate::entry::EntryKind;
use crate::error::{Error, Result};
use crate::path::PathValue;

/// A snapshot of an entry's metadata.
///
/// The snapshot does not track later changes; the setters re-read it after
/// mutating the entry.
///
/// # Examples
///
/// ```no_run
/// use fpath::PathValue;
///
/// let stats = PathValue::new("Cargo.toml").unwrap().stat(true).unwrap();
/// println!("{} bytes, read-only: {}", stats.size(), stats.is_readonly());
/// ```
#[derive(Debug, Clone)]
pub struct Stats {
    path: PathValue,
    follow_links: bool,
    metadata: Metadata,
}

impl Stats {
    /// Read the metadata of `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing exists at the path and `AccessDenied`
    /// if the OS refuses the query.
    pub fn read(path: &PathValue, follow_links: bool) -> Result<Self> {
        let metadata = Self::query(path, follow_links)?;
        Ok(Self {
            path: path.clone(),
            follow_links,
            metadata,
        })
    }

    fn query(path: &PathValue, follow_links: bool) -> Result<Metadata> {
        let os_path = path.to_path_buf();
        let metadata = if follow_links {
            fs::metadata(&os_path)
        } else {
            fs::symlink_metadata(&os_path)
        };
        metadata.map_err(|e| Error::from_io(e, &os_path))
    }

    /// Re-read the snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Stats::read`].
    pub fn refresh(&mut self) -> Result<()> {
        self.metadata = Self::query(&self.path, self.follow_links)?;
        Ok(())
    }

    /// The path this snapshot describes.
    #[must_use]
    pub fn path(&self) -> &PathValue {
        &self.path
    }

    /// What kind of entry it is.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_file_type(self.metadata.file_type())
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.metadata.len()
    }

    /// Last modification time, if the platform records it.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        self.metadata.modified().ok()
    }

    /// Last access time, if the platform records it.
    #[must_use]
    pub fn accessed(&self) -> Option<SystemTime> {
        self.metadata.accessed().ok()
    }

    /// Creation time, if the platform records it.
    #[must_use]
    pub fn created(&self) -> Option<SystemTime> {
        self.metadata.created().ok()
    }

    /// Whether the entry is marked read-only.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.metadata.permissions().readonly()
    }

    /// Permission bits.
    #[cfg(unix)]
    #[must_use]
    pub fn mode(&self) -> u32 {
        use std::os::unix::fs::MetadataExt;
        self.metadata.mode() & 0o7777
    }

    /// Owning user id.
    #[cfg(unix)]
    #[must_use]
    pub fn uid(&self) -> u32 {
        use std::os::unix::fs::MetadataExt;
        self.metadata.uid()
    }

    /// Owning group id.
    #[cfg(unix)]
    #[must_use]
    pub fn gid(&self) -> u32 {
        use std::os::unix::fs::MetadataExt;
        self.metadata.gid()
    }

    /// Mark the entry read-only or writable.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the caller may not change permissions.
    pub fn set_readonly(&mut self, readonly: bool) -> Result<()> {
        let mut permissions = self.metadata.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(readonly);
        self.apply_permissions(permissions)
    }

    /// Replace the permission bits.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the caller may not change permissions.
    #[cfg(unix)]
    pub fn set_mode(&mut self, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        self.apply_permissions(fs::Permissions::from_mode(mode))
    }

    fn apply_permissions(&mut self, permissions: fs::Permissions) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::set_permissions(&os_path, permissions).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("changed permissions of {}", self.path);
        self.refresh()
    }

    /// Set the access and modification times.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry is gone.
    pub fn set_times(&mut self, accessed: SystemTime, modified: SystemTime) -> Result<()> {
        let os_path = self.path.to_path_buf();
        let handle = open_for_times(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        handle
            .set_times(FileTimes::new().set_accessed(accessed).set_modified(modified))
            .map_err(|e| Error::from_io(e, &os_path))?;
        self.refresh()
    }
}

#[cfg(unix)]
fn open_for_times(path: &std::path::Path) -> std::io::Result<fs::File> {
    fs::File::open(path)
}

#[cfg(not(unix))]
fn open_for_times(path: &std::path::Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().write(true).open(path)
}
