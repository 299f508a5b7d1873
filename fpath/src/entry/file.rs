//! Regular files.

use std::fmt;
use std::fs::{self, FileTimes, OpenOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

use crate::entry::{Dir, EntryKind, FilesystemProbe, OsProbe};
use crate::error::{Error, Result};
use crate::path::{IntoPathValue, PathValue};

/// How [`File::open`] opens a file.
///
/// # Examples
///
/// ```
/// use fpath::entry::OpenMode;
///
/// assert_eq!("r+".parse::<OpenMode>().unwrap(), OpenMode::ReadWrite);
/// assert_eq!("a".parse::<OpenMode>().unwrap(), OpenMode::Append);
/// assert!("x".parse::<OpenMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpenMode {
    /// Read an existing file.
    #[default]
    Read,
    /// Create or truncate, then write.
    Write,
    /// Create if needed, then write at the end.
    Append,
    /// Read and write an existing file without truncating it.
    ReadWrite,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::Read => options.read(true),
            Self::Write => options.write(true).create(true).truncate(true),
            Self::Append => options.append(true).create(true),
            Self::ReadWrite => options.read(true).write(true),
        };
        options
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // A binary flag is accepted and ignored.
        match s.replace('b', "").as_str() {
            "r" => Ok(Self::Read),
            "w" => Ok(Self::Write),
            "a" => Ok(Self::Append),
            "r+" => Ok(Self::ReadWrite),
            _ => Err(Error::Validation {
                field: "mode".into(),
                message: format!("unknown open mode '{s}' (expected r, w, a or r+)"),
            }),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Read => "r",
            Self::Write => "w",
            Self::Append => "a",
            Self::ReadWrite => "r+",
        };
        f.write_str(mode)
    }
}

/// A path known to name a regular file.
///
/// Nothing prevents the file from disappearing after the value was built;
/// operations report `NotFound` in that case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
    path: PathValue,
}

impl File {
    /// Build a file handle from any accepted path input (host platform).
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
        Self { path }
    }

    /// The underlying path.
    #[must_use]
    pub fn as_path(&self) -> &PathValue {
        &self.path
    }

    /// Drop the file capabilities and keep the path.
    #[must_use]
    pub fn into_path(self) -> PathValue {
        self.path
    }

    /// A plain copy of the path.
    #[must_use]
    pub fn to_generic_path(&self) -> PathValue {
        self.path.clone()
    }

    /// Text after the last `.` of the file name.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.path.extension()
    }

    /// The directory holding this file.
    #[must_use]
    pub fn parent(&self) -> Dir {
        Dir::from_path(self.path.parent().unwrap_or_else(|| self.path.clone()))
    }

    /// Open the file.
    ///
    /// The handle is closed when dropped.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when reading a missing file and `AccessDenied` when
    /// the OS refuses access.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fpath::entry::{File, OpenMode};
    /// use std::io::Write;
    ///
    /// let file = File::new("notes.txt").unwrap();
    /// let mut handle = file.open(OpenMode::Append).unwrap();
    /// writeln!(handle, "another line").unwrap();
    /// ```
    pub fn open(&self, mode: OpenMode) -> Result<fs::File> {
        let os_path = self.path.to_path_buf();
        mode.options()
            .open(&os_path)
            .map_err(|e| Error::from_io(e, &os_path))
    }

    /// Create the file if it is absent, otherwise set its access and
    /// modification times to now.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parent directory does not exist.
    pub fn touch(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        let handle = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&os_path)
            .map_err(|e| Error::from_io(e, &os_path))?;

        let now = SystemTime::now();
        handle
            .set_times(FileTimes::new().set_accessed(now).set_modified(now))
            .map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("touched {}", self.path);
        Ok(())
    }

    /// Delete the file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is already gone.
    pub fn remove(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::remove_file(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("removed file {}", self.path);
        Ok(())
    }

    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing and `Io` for invalid UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        let os_path = self.path.to_path_buf();
        fs::read_to_string(&os_path).map_err(|e| Error::from_io(e, &os_path))
    }

    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let os_path = self.path.to_path_buf();
        fs::read(&os_path).map_err(|e| Error::from_io(e, &os_path))
    }

    /// Replace the file's contents, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the parent directory does not exist.
    pub fn write(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::write(&os_path, contents).map_err(|e| Error::from_io(e, &os_path))
    }

    /// Copy the contents to `dst`.
    ///
    /// When `dst` is an existing directory the copy keeps this file's name.
    /// If the copy fails after creating a new destination, the partial file
    /// is removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if this file is missing, `SameFile` if `dst` is
    /// this file under another name, or any error raised while writing the
    /// destination.
    pub fn copy_to(&self, dst: impl IntoPathValue) -> Result<File> {
        let mut dst = dst.into_path_value(self.path.platform())?;
        let probe = OsProbe::following_links();
        if probe.probe(&dst)? == EntryKind::Directory {
            if let Some(name) = self.path.file_name() {
                dst = dst.child(name)?;
            }
        }
        let existed = probe.probe(&dst)? != EntryKind::Absent;

        let src_os = self.path.to_path_buf();
        let dst_os = dst.to_path_buf();
        if existed && is_same_file(&src_os, &dst_os) {
            return Err(Error::SameFile { path: dst_os });
        }
        if let Err(e) = fs::copy(&src_os, &dst_os) {
            if !existed && fs::remove_file(&dst_os).is_ok() {
                log::debug!("removed partial copy at {dst}");
            }
            let failed = if e.kind() == std::io::ErrorKind::NotFound && src_os.exists() {
                dst_os
            } else {
                src_os
            };
            return Err(Error::from_io(e, failed));
        }

        log::debug!("copied {} to {dst}", self.path);
        Ok(File::from_path(dst))
    }

    /// Move the file, returning a handle at its new location.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing.
    pub fn rename(&self, to: impl IntoPathValue) -> Result<File> {
        self.path.rename(to).map(File::from_path)
    }

    /// Create a hard link to this file at `to`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if `to` exists and `NotFound` if this file is
    /// missing.
    pub fn hard_link(&self, to: impl IntoPathValue) -> Result<File> {
        let to = to.into_path_value(self.path.platform())?;
        let to_os = to.to_path_buf();
        fs::hard_link(self.path.to_path_buf(), &to_os).map_err(|e| Error::from_io(e, &to_os))?;
        log::debug!("hard linked {} at {to}", self.path);
        Ok(File::from_path(to))
    }
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    matches!((fs::canonicalize(a), fs::canonicalize(b)), (Ok(a), Ok(b)) if a == b)
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl AsRef<PathValue> for File {
    fn as_ref(&self) -> &PathValue {
        &self.path
    }
}
