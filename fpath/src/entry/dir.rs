//! Directories, their listings and recursive walks.

use std::env;
use std::fmt;
use std::fs::{self, DirEntry, ReadDir};
use std::str::FromStr;

use crate::entry::{Entry, EntryKind, File, Link};
use crate::error::{Error, Result};
use crate::path::{IntoPathValue, PathValue};

/// A path known to name a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dir {
    path: PathValue,
}

impl Dir {
    /// Build a directory handle from any accepted path input (host platform).
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

    /// The current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is gone or unreadable.
    pub fn cwd() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::from_io(e, "."))?;
        PathValue::try_from(cwd.as_path()).map(Self::from_path)
    }

    /// Make this directory the working directory of the process.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the directory does not exist.
    pub fn chdir(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        env::set_current_dir(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("changed directory to {}", self.path);
        Ok(())
    }

    /// The underlying path.
    #[must_use]
    pub fn as_path(&self) -> &PathValue {
        &self.path
    }

    /// Drop the directory capabilities and keep the path.
    #[must_use]
    pub fn into_path(self) -> PathValue {
        self.path
    }

    /// A plain copy of the path.
    #[must_use]
    pub fn to_generic_path(&self) -> PathValue {
        self.path.clone()
    }

    /// A path below this directory.
    ///
    /// # Errors
    ///
    /// Same as [`PathValue::concatenate`].
    pub fn join(&self, other: impl IntoPathValue) -> Result<PathValue> {
        self.path.concatenate(other)
    }

    /// The immediate entries, in the order the OS returns them.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the directory does not exist and `AccessDenied`
    /// if it cannot be listed. Errors while iterating are yielded as items.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fpath::entry::Dir;
    ///
    /// let dir = Dir::new("/tmp").unwrap();
    /// for child in dir.children().unwrap() {
    ///     println!("{}", child.unwrap());
    /// }
    /// ```
    pub fn children(&self) -> Result<Children> {
        let os_path = self.path.to_path_buf();
        let entries = fs::read_dir(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        Ok(Children {
            parent: self.path.clone(),
            entries,
        })
    }

    /// Every entry below this directory, depth-first, parents before their
    /// contents. The directory itself is not yielded.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AccessDenied` if this directory cannot be
    /// listed. Errors while iterating are yielded as items.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fpath::entry::{Dir, WalkFilter};
    ///
    /// let dir = Dir::new("src").unwrap();
    /// let sources = dir
    ///     .walk(WalkFilter::parse("f"))
    ///     .unwrap()
    ///     .filter_map(Result::ok)
    ///     .filter(|entry| entry.as_path().extension() == "rs")
    ///     .count();
    /// println!("{sources} source files");
    /// ```
    pub fn walk(&self, filter: WalkFilter) -> Result<Walk> {
        let root = self.children()?;
        Ok(Walk {
            filter,
            stack: vec![root],
        })
    }

    /// Create this directory. The parent must exist.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if something is already there and `NotFound`
    /// if the parent is missing.
    pub fn mkdir(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::create_dir(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("created directory {}", self.path);
        Ok(())
    }

    /// Create this directory and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if a component exists and is not a directory.
    pub fn mkdir_all(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::create_dir_all(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("created directory tree {}", self.path);
        Ok(())
    }

    /// Remove this directory, which must be empty.
    ///
    /// # Errors
    ///
    /// Returns `NotEmpty` if it still has entries and `NotFound` if it is
    /// already gone.
    pub fn remove(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::remove_dir(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("removed directory {}", self.path);
        Ok(())
    }

    /// Remove this directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the directory is already gone.
    pub fn remove_all(&self) -> Result<()> {
        let os_path = self.path.to_path_buf();
        fs::remove_dir_all(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        log::debug!("removed directory tree {}", self.path);
        Ok(())
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

impl AsRef<PathValue> for Dir {
    fn as_ref(&self) -> &PathValue {
        &self.path
    }
}

/// Iterator over the immediate entries of a directory.
#[derive(Debug)]
pub struct Children {
    parent: PathValue,
    entries: ReadDir,
}

impl Children {
    fn next_entry(&mut self) -> Option<Result<(PathValue, DirEntry)>> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(Error::from_io(e, self.parent.to_path_buf()))),
        };
        let name = entry.file_name();
        let path = match name.to_str() {
            Some(name) => self.parent.child(name),
            None => Err(Error::malformed(
                name.to_string_lossy(),
                "entry name is not valid UTF-8",
            )),
        };
        Some(path.map(|path| (path, entry)))
    }
}

impl Iterator for Children {
    type Item = Result<PathValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry()
            .map(|entry| entry.map(|(path, _)| path))
    }
}

/// Which entries a [`Walk`] yields.
///
/// Built from a mode string of single letters:
///
/// | Letter | Meaning                                              |
/// |--------|------------------------------------------------------|
/// | `f`    | regular files                                        |
/// | `d`    | directories                                          |
/// | `l`    | links as links instead of classifying their targets  |
/// | `L`    | skip links entirely (overrides `l`)                  |
/// | `o`    | other and unreadable entries, as generic paths       |
///
/// A string without `f`, `d` or `o` selects all three.
///
/// # Examples
///
/// ```
/// use fpath::entry::WalkFilter;
///
/// let files = WalkFilter::parse("f");
/// assert!(files.files() && !files.dirs());
/// assert_eq!(WalkFilter::parse(""), WalkFilter::all());
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkFilter {
    files: bool,
    dirs: bool,
    other: bool,
    links_as_links: bool,
    skip_links: bool,
}

impl Default for WalkFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl WalkFilter {
    /// Files, directories and other entries; links classified by target.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            files: true,
            dirs: true,
            other: true,
            links_as_links: false,
            skip_links: false,
        }
    }

    /// Parse a mode string. Unknown letters are ignored.
    #[must_use]
    pub fn parse(mode: &str) -> Self {
        let files = mode.contains('f');
        let dirs = mode.contains('d');
        let other = mode.contains('o');
        let unfiltered = !(files || dirs || other);
        Self {
            files: files || unfiltered,
            dirs: dirs || unfiltered,
            other: other || unfiltered,
            links_as_links: mode.contains('l'),
            skip_links: mode.contains('L'),
        }
    }

    /// Whether regular files are yielded.
    #[must_use]
    pub const fn files(&self) -> bool {
        self.files
    }

    /// Whether directories are yielded.
    #[must_use]
    pub const fn dirs(&self) -> bool {
        self.dirs
    }

    /// Whether other and unreadable entries are yielded.
    #[must_use]
    pub const fn other(&self) -> bool {
        self.other
    }

    /// Whether links are yielded as links.
    #[must_use]
    pub const fn links_as_links(&self) -> bool {
        self.links_as_links && !self.skip_links
    }

    /// Whether links are skipped.
    #[must_use]
    pub const fn skip_links(&self) -> bool {
        self.skip_links
    }
}

impl FromStr for WalkFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Lazy depth-first walk below a directory.
///
/// Directories reached through a followed link are yielded but not entered,
/// so link cycles cannot trap the walk. A directory that cannot be listed is
/// yielded as an error, or as a generic path when the filter includes `o`;
/// the walk then moves on to its siblings. Dropping the iterator stops the
/// walk.
#[derive(Debug)]
pub struct Walk {
    filter: WalkFilter,
    stack: Vec<Children>,
}

impl Walk {
    /// Classify one entry, descending into real directories.
    fn visit(&mut self, path: PathValue, entry: &DirEntry) -> Option<Result<Entry>> {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => return Some(Err(Error::from_io(e, path.to_path_buf()))),
        };

        match EntryKind::from_file_type(file_type) {
            EntryKind::Directory => {
                let os_path = path.to_path_buf();
                match fs::read_dir(&os_path) {
                    Ok(entries) => {
                        log::trace!("descending into {path}");
                        self.stack.push(Children {
                            parent: path.clone(),
                            entries,
                        });
                        self.filter.dirs.then(|| Ok(Entry::Dir(Dir::from_path(path))))
                    }
                    Err(e) if self.filter.other => {
                        log::debug!("cannot list {path}: {e}");
                        Some(Ok(Entry::Path(path)))
                    }
                    Err(e) => Some(Err(Error::from_io(e, &os_path))),
                }
            }
            EntryKind::Link => self.visit_link(path),
            kind => self.yield_kind(path, kind),
        }
    }

    fn visit_link(&self, path: PathValue) -> Option<Result<Entry>> {
        if self.filter.skip_links {
            return None;
        }
        if self.filter.links_as_links {
            return Some(Ok(Entry::Link(Link::from_path(path))));
        }
        match fs::metadata(path.to_path_buf()) {
            Ok(metadata) => self.yield_kind(path, EntryKind::from_file_type(metadata.file_type())),
            Err(e) => {
                log::debug!("link {path} has no readable target: {e}");
                self.filter.other.then_some(Ok(Entry::Path(path)))
            }
        }
    }

    fn yield_kind(&self, path: PathValue, kind: EntryKind) -> Option<Result<Entry>> {
        let entry = match kind {
            EntryKind::File if self.filter.files => Entry::File(File::from_path(path)),
            EntryKind::Directory if self.filter.dirs => Entry::Dir(Dir::from_path(path)),
            EntryKind::Other | EntryKind::Absent if self.filter.other => Entry::Path(path),
            _ => return None,
        };
        Some(Ok(entry))
    }
}

impl Iterator for Walk {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.stack.last_mut()?.next_entry();
            let item = match next {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(e)) => Some(Err(e)),
                Some(Ok((path, entry))) => self.visit(path, &entry),
            };
            if item.is_some() {
                return item;
            }
        }
    }
}
