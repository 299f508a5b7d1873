//! Path normalization.
//!
//! This module turns raw strings into canonical [`PathValue`]s by:
//! - Expanding a leading `~` or `~user` to a home directory
//! - Optionally expanding environment variables (`$VAR`, `${VAR}`, `%VAR%`)
//! - Collapsing redundant separators and `.` segments
//! - Resolving `..` against the segment before it
//! - Folding case on Windows
//!
//! Normalization never touches the filesystem apart from reading the home
//! directory database, and it is idempotent.

use std::env;
use std::path::PathBuf;

use crate::error::Result;
use crate::path::platform::{Platform, PARDIR};
use crate::path::value::PathValue;

/// Configurable path normalizer.
///
/// # Examples
///
/// ```
/// use fpath::{Normalizer, Platform};
///
/// let normalizer = Normalizer::new()
///     .with_platform(Platform::Posix)
///     .with_home_dir("/home/wendell");
///
/// let path = normalizer.normalize("~/src/./fpath/../notes").unwrap();
/// assert_eq!(path.to_string(), "/home/wendell/src/notes");
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    platform: Platform,
    home_dir: Option<String>,
    expand_user: bool,
    expand_vars: bool,
    fold_case: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        let platform = Platform::host();
        Self {
            platform,
            home_dir: None,
            expand_user: true,
            expand_vars: false,
            fold_case: platform.is_case_insensitive(),
        }
    }
}

impl Normalizer {
    /// Create a normalizer for the host platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the platform conventions.
    ///
    /// Also resets case folding to the platform's default, so call
    /// [`Normalizer::with_case_folding`] afterwards to override it.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self.fold_case = platform.is_case_insensitive();
        self
    }

    /// Use `home` for `~` instead of asking the OS.
    #[must_use]
    pub fn with_home_dir(mut self, home: impl Into<String>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    /// Enable or disable `~` expansion.
    #[must_use]
    pub fn with_user_expansion(mut self, enabled: bool) -> Self {
        self.expand_user = enabled;
        self
    }

    /// Enable or disable environment variable expansion.
    #[must_use]
    pub fn with_var_expansion(mut self, enabled: bool) -> Self {
        self.expand_vars = enabled;
        self
    }

    /// Enable or disable lower-casing of segments.
    #[must_use]
    pub fn with_case_folding(mut self, enabled: bool) -> Self {
        self.fold_case = enabled;
        self
    }

    /// The platform this normalizer parses with.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Normalize a raw string.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPath` if the input contains characters that are
    /// illegal on the platform (a NUL byte anywhere, or reserved characters
    /// on Windows).
    pub fn normalize(&self, raw: &str) -> Result<PathValue> {
        let expanded = if self.expand_vars {
            expand_vars(raw, self.platform)
        } else {
            raw.to_string()
        };

        let mut path = PathValue::parse(&expanded, self.platform)?;
        if self.expand_user {
            path = self.expand_home(path)?;
        }

        let mut segments = self.resolve_segments(&path);
        // Resolving `..` can uncover a home marker, as in `a/../~`.
        if self.expand_user
            && path.is_relative()
            && segments.first().is_some_and(|first| first.starts_with('~'))
        {
            path = self.expand_home(PathValue::from_trusted(
                self.platform,
                path.root().cloned(),
                segments,
            ))?;
            segments = self.resolve_segments(&path);
        }
        if self.fold_case {
            for segment in &mut segments {
                *segment = segment.to_lowercase();
            }
        }

        Ok(PathValue::from_trusted(
            self.platform,
            path.root().cloned(),
            segments,
        ))
    }

    /// Normalize an existing value by rendering it with this normalizer's
    /// platform first.
    ///
    /// # Errors
    ///
    /// Same as [`Normalizer::normalize`].
    pub fn normalize_path(&self, path: &PathValue) -> Result<PathValue> {
        self.normalize(&path.render(self.platform))
    }

    fn resolve_segments(&self, path: &PathValue) -> Vec<String> {
        match (self.platform, path.root(), path.segments()) {
            // The volume name of an absolute Mac path acts as its root.
            (Platform::Mac, Some(_), [volume, rest @ ..]) => {
                let mut kept = vec![volume.clone()];
                kept.extend(resolve_parent_refs(rest));
                kept
            }
            (_, _, segments) => resolve_parent_refs(segments),
        }
    }

    fn expand_home(&self, path: PathValue) -> Result<PathValue> {
        if !path.is_relative() {
            return Ok(path);
        }
        let Some(user) = path.segments().first().and_then(|s| s.strip_prefix('~')) else {
            return Ok(path);
        };

        let home = if user.is_empty() {
            self.home_dir.clone().or_else(|| {
                home::home_dir().map(|home| home.to_string_lossy().into_owned())
            })
        } else {
            user_home_dir(user).map(|home| home.to_string_lossy().into_owned())
        };

        let Some(home) = home else {
            log::debug!("no home directory for '~{user}', leaving {path} unexpanded");
            return Ok(path);
        };

        PathValue::parse(&home, self.platform)?.concatenate(path.slice(1..))
    }
}

/// Normalize a raw string with the host platform's defaults.
///
/// # Errors
///
/// Returns `MalformedPath` for illegal characters.
///
/// # Examples
///
/// ```
/// use fpath::normalize;
///
/// let path = normalize("a//b/./c/../d").unwrap();
/// assert_eq!(path.segments(), ["a", "b", "d"]);
/// ```
pub fn normalize(raw: &str) -> Result<PathValue> {
    Normalizer::default().normalize(raw)
}

/// Resolve each `..` against the segment before it.
///
/// A `..` with nothing to cancel (at the root, or leading a relative path)
/// is kept, so the result only ever has `..` segments at its start.
///
/// # Examples
///
/// ```
/// use fpath::path::normalize::resolve_parent_refs;
///
/// assert_eq!(resolve_parent_refs(&["a", "b", "..", "c"]), ["a", "c"]);
/// assert_eq!(resolve_parent_refs(&["..", "a", "..", ".."]), ["..", ".."]);
/// ```
#[must_use]
pub fn resolve_parent_refs<S: AsRef<str>>(segments: &[S]) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = segment.as_ref();
        if segment == PARDIR && resolved.last().is_some_and(|last| last != PARDIR) {
            resolved.pop();
        } else {
            resolved.push(segment.to_string());
        }
    }
    resolved
}

/// Expand environment variable references in `raw`.
///
/// `$NAME` and `${NAME}` are recognized everywhere, `%NAME%` on Windows.
/// References to unset variables are left untouched.
#[must_use]
pub fn expand_vars(raw: &str, platform: Platform) -> String {
    let is_marker = |c: char| c == '$' || (platform == Platform::Windows && c == '%');

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(is_marker) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match lookup_var(tail) {
            Some((value, consumed)) => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                // Markers are single-byte ASCII.
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup_var(tail: &str) -> Option<(String, usize)> {
    let (name, consumed) = if let Some(body) = tail.strip_prefix("${") {
        let end = body.find('}')?;
        (&body[..end], end + 3)
    } else if let Some(body) = tail.strip_prefix('$') {
        let end = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(body.len());
        (&body[..end], end + 1)
    } else {
        let body = tail.strip_prefix('%')?;
        let end = body.find('%')?;
        (&body[..end], end + 2)
    };

    if name.is_empty() {
        return None;
    }
    env::var(name).ok().map(|value| (value, consumed))
}

/// Home directory of a named user, from the password database.
#[cfg(unix)]
#[must_use]
pub fn user_home_dir(user: &str) -> Option<PathBuf> {
    let passwd = std::fs::read_to_string("/etc/passwd").ok()?;
    passwd
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            (fields.len() >= 7 && fields[0] == user).then(|| PathBuf::from(fields[5]))
        })
}

/// Home directory of a named user, assumed to sit next to the current
/// user's home.
#[cfg(not(unix))]
#[must_use]
pub fn user_home_dir(user: &str) -> Option<PathBuf> {
    let current = home::home_dir()?;
    Some(current.parent()?.join(user))
}
