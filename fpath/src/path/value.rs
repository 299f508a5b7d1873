//! The immutable path value.
//!
//! A [`PathValue`] is an optional [`Root`] followed by an ordered list of
//! segments. It never changes after construction: concatenation, slicing and
//! normalization all return new values.

use std::fmt;
use std::fs;
use std::ops::{Bound, RangeBounds};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::entry::{self, Entry, EntryKind, FilesystemProbe, OsProbe, Stats};
use crate::error::{Error, Result};
use crate::path::platform::{Platform, Root, CURDIR, PARDIR};

/// An immutable sequence of path segments with an optional root.
///
/// Equality, ordering and hashing are structural: two values are equal when
/// they share a platform, a root and the same segments.
///
/// # Examples
///
/// ```
/// use fpath::{PathValue, Platform};
///
/// let path = PathValue::parse("/some/path/file.ext", Platform::Posix).unwrap();
/// assert_eq!(path.segments(), ["some", "path", "file.ext"]);
/// assert_eq!(path.extension(), "ext");
/// assert_eq!(path.index(-1).unwrap(), "file.ext");
/// assert_eq!(path.slice(..-1).render(Platform::Posix), "/some/path");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathValue {
    platform: Platform,
    root: Option<Root>,
    segments: Vec<String>,
}

/// Conversion of the accepted path inputs into a [`PathValue`].
///
/// Strings are parsed with the supplied platform, segment sequences are
/// validated segment by segment, and existing values are copied.
pub trait IntoPathValue {
    /// Build a path value, using `platform` for any parsing or validation.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPath` or `InvalidSegment` when the input cannot be
    /// represented on `platform`.
    fn into_path_value(self, platform: Platform) -> Result<PathValue>;
}

impl PathValue {
    /// Build a path from any accepted input using the host platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or contains invalid
    /// segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::PathValue;
    ///
    /// let from_str = PathValue::new("dir/file.txt").unwrap();
    /// let from_segments = PathValue::new(["dir", "file.txt"]).unwrap();
    /// assert_eq!(from_str, from_segments);
    /// assert!(PathValue::new(["dir/file.txt"]).is_err());
    /// ```
    pub fn new(value: impl IntoPathValue) -> Result<Self> {
        value.into_path_value(Platform::host())
    }

    /// Parse a raw string with the conventions of `platform`.
    ///
    /// Empty pieces and `.` are dropped; `..` is kept as a segment.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPath` for characters or root forms that are illegal
    /// on `platform`.
    pub fn parse(raw: &str, platform: Platform) -> Result<Self> {
        let (root, segments) = platform.parse(raw)?;
        Ok(Self::from_trusted(platform, root, segments))
    }

    /// Build a relative path from a sequence of segments.
    ///
    /// `.` entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSegment` for empty segments or segments containing a
    /// separator, and `MalformedPath` for illegal characters.
    pub fn from_segments<I, S>(segments: I, platform: Platform) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parts(platform, None, segments)
    }

    /// Build a path from an explicit root and segments.
    ///
    /// # Errors
    ///
    /// Same as [`PathValue::from_segments`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::{PathValue, Platform, Root};
    ///
    /// let path = PathValue::from_parts(Platform::Windows, Some(Root::Drive('C')), ["Users"]).unwrap();
    /// assert_eq!(path.to_string(), "C:\\Users");
    /// ```
    pub fn from_parts<I, S>(platform: Platform, root: Option<Root>, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .filter(|segment| segment.as_ref() != CURDIR)
            .map(|segment| {
                let segment = segment.as_ref();
                platform.check_segment(segment)?;
                Ok(segment.to_string())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_trusted(platform, root, segments))
    }

    /// An empty relative path, which stands for the current directory.
    #[must_use]
    pub fn empty(platform: Platform) -> Self {
        Self::from_trusted(platform, None, Vec::new())
    }

    pub(crate) fn from_trusted(platform: Platform, root: Option<Root>, segments: Vec<String>) -> Self {
        Self {
            platform,
            root,
            segments,
        }
    }

    /// Convert an OS path into a value for the host platform.
    ///
    /// Verbatim prefixes (`\\?\`) produced by the Windows API are stripped.
    pub(crate) fn from_os_path(path: &Path) -> Result<Self> {
        let raw = path.to_str().ok_or_else(|| {
            Error::malformed(path.to_string_lossy(), "path is not valid UTF-8")
        })?;
        let platform = Platform::host();
        if platform == Platform::Windows {
            if let Some(rest) = raw.strip_prefix("\\\\?\\UNC\\") {
                return Self::parse(&format!("\\\\{rest}"), platform);
            }
            if let Some(rest) = raw.strip_prefix("\\\\?\\") {
                return Self::parse(rest, platform);
            }
        }
        Self::parse(raw, platform)
    }

    /// The platform whose conventions this value follows.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The root, if the path is rooted.
    #[must_use]
    pub fn root(&self) -> Option<&Root> {
        self.root.as_ref()
    }

    /// The segments, in order. The root is not a segment.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the meaning of the path is independent of the working
    /// directory.
    ///
    /// Not the same as `!is_relative()`: `\temp` on Windows is rooted but
    /// depends on the current drive.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| root.is_absolute_on(self.platform))
    }

    /// Whether the path has no root and can therefore be appended to another.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.root.is_none()
    }

    /// Append another path, string or segment sequence.
    ///
    /// Strings are split with this value's platform before appending.
    ///
    /// # Errors
    ///
    /// - `InvalidSegment` if an appended segment contains one of this
    ///   platform's separators (possible for segment sequences and for values
    ///   of another platform)
    /// - `MalformedPath` if the right operand is rooted or malformed
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::{PathValue, Platform};
    ///
    /// let dir = PathValue::parse("/some/path", Platform::Posix).unwrap();
    /// let file = dir.concatenate("sub/file.ext").unwrap();
    /// assert_eq!(file.to_string(), "/some/path/sub/file.ext");
    /// assert!(dir.concatenate(["a/b"]).is_err());
    /// assert!(dir.concatenate("/abs").is_err());
    /// ```
    pub fn concatenate(&self, other: impl IntoPathValue) -> Result<Self> {
        let other = other.into_path_value(self.platform)?;
        if other.root.is_some() {
            return Err(Error::malformed(
                other.to_string(),
                "right operand must be a relative path",
            ));
        }

        let mut segments = self.segments.clone();
        for segment in other.segments {
            self.platform.check_segment(&segment)?;
            segments.push(segment);
        }
        Ok(Self::from_trusted(self.platform, self.root.clone(), segments))
    }

    /// Append a single entry name, as read from a directory listing.
    pub(crate) fn child(&self, name: &str) -> Result<Self> {
        self.platform.check_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self::from_trusted(self.platform, self.root.clone(), segments))
    }

    /// Select a range of segments.
    ///
    /// Negative bounds count from the end. Out-of-range bounds are clamped
    /// and an inverted range yields an empty path, so slicing never fails.
    /// The root is kept only when the slice starts at the first segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::{PathValue, Platform};
    ///
    /// let path = PathValue::parse("/a/b/c", Platform::Posix).unwrap();
    /// assert_eq!(path.slice(1..).to_string(), "b/c");
    /// assert_eq!(path.slice(..2).to_string(), "/a/b");
    /// assert_eq!(path.slice(-1..).segments(), ["c"]);
    /// assert!(path.slice(5..9).is_empty());
    /// ```
    #[must_use]
    pub fn slice<R: RangeBounds<isize>>(&self, range: R) -> Self {
        let len = isize::try_from(self.segments.len()).unwrap_or(isize::MAX);
        let from_end = |i: isize| if i < 0 { i.saturating_add(len) } else { i };

        let start = match range.start_bound() {
            Bound::Included(&i) => from_end(i),
            Bound::Excluded(&i) => from_end(i).saturating_add(1),
            Bound::Unbounded => 0,
        }
        .clamp(0, len);
        let end = match range.end_bound() {
            Bound::Included(&i) => from_end(i).saturating_add(1),
            Bound::Excluded(&i) => from_end(i),
            Bound::Unbounded => len,
        }
        .clamp(0, len);

        let start = usize::try_from(start).unwrap_or(0);
        let end = usize::try_from(end).unwrap_or(0);
        let segments = if start < end {
            self.segments[start..end].to_vec()
        } else {
            Vec::new()
        };
        let root = if start == 0 { self.root.clone() } else { None };
        Self::from_trusted(self.platform, root, segments)
    }

    /// A single segment; negative indices count from the end.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if no segment exists at `index`.
    pub fn index(&self, index: isize) -> Result<&str> {
        let len = self.segments.len();
        let position = if index < 0 {
            isize::try_from(len).ok().map(|len| index + len)
        } else {
            Some(index)
        };
        position
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| self.segments.get(i))
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Render with the separator and root conventions of `platform`.
    ///
    /// Rendering with the value's own platform always parses back to an equal
    /// value. Roots that do not exist on `platform` are rendered best-effort.
    #[must_use]
    pub fn render(&self, platform: Platform) -> String {
        platform.render(self.root.as_ref(), &self.segments)
    }

    /// The path as the host OS expects it.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.render(Platform::host()))
    }

    /// The final segment.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Text after the last `.` in the final segment, or `""` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::PathValue;
    ///
    /// assert_eq!(PathValue::new("archive.tar.gz").unwrap().extension(), "gz");
    /// assert_eq!(PathValue::new("Makefile").unwrap().extension(), "");
    /// ```
    #[must_use]
    pub fn extension(&self) -> &str {
        self.file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map_or("", |(_, ext)| ext)
    }

    /// The final segment without its extension.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        self.file_name()
            .map(|name| name.rsplit_once('.').map_or(name, |(stem, _)| stem))
    }

    /// Every segment but the last, or `None` for a path without segments.
    ///
    /// The volume of an absolute Mac path has no parent.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let floor = usize::from(self.platform == Platform::Mac && self.root.is_some());
        (self.segments.len() > floor).then(|| self.slice(..-1))
    }

    /// Reinterpret the same root and segments under another platform.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSegment` or `MalformedPath` if a segment is not valid
    /// on `platform`.
    pub fn with_platform(&self, platform: Platform) -> Result<Self> {
        Self::from_parts(platform, self.root.clone(), &self.segments)
    }

    /// A relative path leading from this path to `dst`.
    ///
    /// Works on the segments alone, so both paths should be normalized. When
    /// the roots differ there is no relative route and `dst` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use fpath::{PathValue, Platform};
    ///
    /// let src = PathValue::parse("/a/b/c", Platform::Posix).unwrap();
    /// let dst = PathValue::parse("/a/d", Platform::Posix).unwrap();
    /// assert_eq!(src.path_to(&dst).to_string(), "../../d");
    /// ```
    #[must_use]
    pub fn path_to(&self, dst: &Self) -> Self {
        if self.root != dst.root {
            return dst.clone();
        }
        let insensitive = self.platform.is_case_insensitive();
        let common = self
            .segments
            .iter()
            .zip(&dst.segments)
            .take_while(|(a, b)| {
                if insensitive {
                    a.to_lowercase() == b.to_lowercase()
                } else {
                    a == b
                }
            })
            .count();

        let mut segments = vec![PARDIR.to_string(); self.segments.len() - common];
        segments.extend_from_slice(&dst.segments[common..]);
        Self::from_trusted(self.platform, None, segments)
    }

    /// Classify what currently exists at this path without following links.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if the OS refuses the query.
    pub fn probe(&self) -> Result<EntryKind> {
        OsProbe::new().probe(self)
    }

    /// Whether the path exists, following symbolic links.
    ///
    /// Failures to query the OS are reported as `false`.
    #[must_use]
    pub fn exists(&self) -> bool {
        OsProbe::following_links()
            .probe(self)
            .is_ok_and(|kind| kind != EntryKind::Absent)
    }

    /// Promote this path into the variant matching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` if probing is refused.
    pub fn transform(&self) -> Result<Entry> {
        entry::transform(self)
    }

    /// Read a metadata snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AccessDenied` when the entry cannot be queried.
    pub fn stat(&self, follow_links: bool) -> Result<Stats> {
        Stats::read(self, follow_links)
    }

    /// This path made absolute against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn absolute(&self) -> Result<Self> {
        if self.is_absolute() {
            return Ok(self.clone());
        }
        let os_path = self.to_path_buf();
        let absolute = std::path::absolute(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        Self::from_os_path(&absolute)
    }

    /// The real path: absolute, with every symbolic link resolved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if any part of the path does not exist.
    pub fn canonicalize(&self) -> Result<Self> {
        let os_path = self.to_path_buf();
        let real = fs::canonicalize(&os_path).map_err(|e| Error::from_io(e, &os_path))?;
        Self::from_os_path(&real)
    }

    /// Rename the entry at this path, returning its new location.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing exists here, or an error if the
    /// destination cannot be parsed or written.
    pub fn rename(&self, to: impl IntoPathValue) -> Result<Self> {
        let to = to.into_path_value(self.platform)?;
        let from = self.to_path_buf();
        fs::rename(&from, to.to_path_buf()).map_err(|e| Error::from_io(e, &from))?;
        log::debug!("renamed {self} to {to}");
        Ok(to)
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(self.platform))
    }
}

impl FromStr for PathValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Platform::host())
    }
}

impl TryFrom<&Path> for PathValue {
    type Error = Error;

    fn try_from(path: &Path) -> Result<Self> {
        Self::from_os_path(path)
    }
}

impl AsRef<PathValue> for PathValue {
    fn as_ref(&self) -> &PathValue {
        self
    }
}

impl IntoPathValue for &str {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::parse(self, platform)
    }
}

impl IntoPathValue for String {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::parse(&self, platform)
    }
}

impl IntoPathValue for &String {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::parse(self, platform)
    }
}

impl IntoPathValue for &Path {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        let raw = self.to_str().ok_or_else(|| {
            Error::malformed(self.to_string_lossy(), "path is not valid UTF-8")
        })?;
        PathValue::parse(raw, platform)
    }
}

impl IntoPathValue for PathValue {
    fn into_path_value(self, _platform: Platform) -> Result<PathValue> {
        Ok(self)
    }
}

impl IntoPathValue for &PathValue {
    fn into_path_value(self, _platform: Platform) -> Result<PathValue> {
        Ok(self.clone())
    }
}

impl<S: AsRef<str>> IntoPathValue for &[S] {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::from_segments(self, platform)
    }
}

impl<S: AsRef<str>> IntoPathValue for Vec<S> {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::from_segments(self, platform)
    }
}

impl<S: AsRef<str>, const N: usize> IntoPathValue for [S; N] {
    fn into_path_value(self, platform: Platform) -> Result<PathValue> {
        PathValue::from_segments(self, platform)
    }
}
