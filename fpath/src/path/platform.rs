//! Platform path conventions.
//!
//! A [`Platform`] decides how raw strings are split into a root and segments,
//! which characters are illegal inside a segment, and how a path is rendered
//! back into a string. Three conventions are supported:
//!
//! - **Posix**: `/` separator, a single root.
//! - **Windows**: `\` separator with `/` accepted as an alternate, drive
//!   letters, the current-drive root and UNC shares.
//! - **Mac** (classic): `:` separator; absolute paths start with a volume name
//!   and relative paths start with `:`. An empty piece between two separators
//!   means "parent directory".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Segment naming the current directory. Never stored in a path.
pub(crate) const CURDIR: &str = ".";

/// Segment naming the parent directory.
pub(crate) const PARDIR: &str = "..";

const WINDOWS_RESERVED: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// A path convention used for parsing and rendering.
///
/// # Examples
///
/// ```
/// use fpath::Platform;
///
/// assert_eq!(Platform::Posix.separator(), '/');
/// assert_eq!(Platform::Windows.alt_separator(), Some('/'));
/// assert_eq!("nt".parse::<Platform>().unwrap(), Platform::Windows);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Unix-like systems.
    Posix,
    /// Windows systems.
    #[serde(alias = "nt")]
    Windows,
    /// Classic Mac OS.
    Mac,
}

impl Platform {
    /// The convention of the host this crate was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// The primary separator.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
            Self::Mac => ':',
        }
    }

    /// A second character accepted as a separator when parsing.
    #[must_use]
    pub const fn alt_separator(self) -> Option<char> {
        match self {
            Self::Windows => Some('/'),
            Self::Posix | Self::Mac => None,
        }
    }

    /// Whether `c` splits segments on this platform.
    #[must_use]
    pub fn is_separator(self, c: char) -> bool {
        c == self.separator() || self.alt_separator() == Some(c)
    }

    /// Whether segment comparison ignores case on this platform.
    #[must_use]
    pub const fn is_case_insensitive(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Reject characters that can never appear in a segment.
    fn check_characters(self, input: &str, text: &str) -> Result<()> {
        if text.contains('\0') {
            return Err(Error::malformed(input, "contains a NUL byte"));
        }
        if self == Self::Windows {
            if let Some(c) = text
                .chars()
                .find(|c| WINDOWS_RESERVED.contains(c) || c.is_ascii_control())
            {
                return Err(Error::malformed(
                    input,
                    format!("character {c:?} is not allowed on windows"),
                ));
            }
        }
        Ok(())
    }

    /// Validate a single segment supplied by the caller.
    ///
    /// `.` is not rejected here; callers that build paths from segment lists
    /// skip it before validation.
    pub(crate) fn check_segment(self, segment: &str) -> Result<()> {
        if segment.is_empty() {
            return Err(Error::invalid_segment(segment, "segment is empty"));
        }
        if let Some(sep) = segment.chars().find(|&c| self.is_separator(c)) {
            return Err(Error::invalid_segment(
                segment,
                format!("contains separator {sep:?}"),
            ));
        }
        self.check_characters(segment, segment)
    }

    /// Split a raw string into its root and segments.
    pub(crate) fn parse(self, raw: &str) -> Result<(Option<Root>, Vec<String>)> {
        let (root, body) = match self {
            Self::Posix => match raw.strip_prefix('/') {
                Some(rest) => (Some(Root::Separator), rest.to_string()),
                None => (None, raw.to_string()),
            },
            Self::Windows => parse_windows_root(raw)?,
            Self::Mac => return self.parse_mac(raw),
        };

        let segments = body
            .split(|c| self.is_separator(c))
            .filter(|piece| !piece.is_empty() && *piece != CURDIR)
            .map(|piece| {
                self.check_characters(raw, piece)?;
                Ok(piece.to_string())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((root, segments))
    }

    fn parse_mac(self, raw: &str) -> Result<(Option<Root>, Vec<String>)> {
        self.check_characters(raw, raw)?;

        if !raw.contains(':') {
            let segments = if raw.is_empty() || raw == CURDIR {
                Vec::new()
            } else {
                vec![raw.to_string()]
            };
            return Ok((None, segments));
        }

        let (root, body) = match raw.strip_prefix(':') {
            Some(rest) => (None, rest),
            None => (Some(Root::Separator), raw),
        };

        let mut pieces: Vec<&str> = body.split(':').collect();
        if pieces.last() == Some(&"") {
            pieces.pop();
        }

        let segments = pieces
            .into_iter()
            .filter(|piece| *piece != CURDIR)
            .map(|piece| {
                if piece.is_empty() {
                    PARDIR.to_string()
                } else {
                    piece.to_string()
                }
            })
            .collect();

        Ok((root, segments))
    }

    /// Render a root and segments as a string.
    pub(crate) fn render(self, root: Option<&Root>, segments: &[String]) -> String {
        if self == Self::Mac {
            return render_mac(root, segments);
        }

        match root {
            None if segments.is_empty() => CURDIR.to_string(),
            None => segments.join(&self.separator().to_string()),
            Some(root) => {
                let mut out = root.render(self);
                out.push_str(&segments.join(&self.separator().to_string()));
                out
            }
        }
    }
}

fn parse_windows_root(raw: &str) -> Result<(Option<Root>, String)> {
    let normalized = raw.replace('/', "\\");

    if let Some(rest) = normalized.strip_prefix("\\\\") {
        if rest.starts_with('\\') {
            return Err(Error::malformed(
                raw,
                "paths cannot start with more than two separators",
            ));
        }
        let (host, after) = rest
            .split_once('\\')
            .ok_or_else(|| Error::malformed(raw, "UNC host must be followed by a separator"))?;
        let after = after.trim_start_matches('\\');
        let (share, tail) = after.split_once('\\').unwrap_or((after, ""));
        if share.is_empty() {
            return Err(Error::malformed(raw, "UNC share is empty"));
        }
        Platform::Windows.check_characters(raw, host)?;
        Platform::Windows.check_characters(raw, share)?;
        let root = Root::Unc {
            host: host.to_lowercase(),
            share: share.to_lowercase(),
        };
        return Ok((Some(root), tail.to_string()));
    }

    if let Some(rest) = normalized.strip_prefix('\\') {
        return Ok((Some(Root::Separator), rest.to_string()));
    }

    let mut chars = normalized.chars();
    if let (Some(letter), Some(':')) = (chars.next(), chars.next()) {
        if !letter.is_ascii_alphabetic() {
            return Err(Error::malformed(raw, "drive must be a single ASCII letter"));
        }
        let tail = &normalized[2..];
        return Ok(match tail.strip_prefix('\\') {
            Some(rest) => (Some(Root::Drive(letter.to_ascii_uppercase())), rest.to_string()),
            None => (
                Some(Root::UnrootedDrive(letter.to_ascii_lowercase())),
                tail.to_string(),
            ),
        });
    }

    Ok((None, normalized))
}

fn render_mac(root: Option<&Root>, segments: &[String]) -> String {
    let mut out = match root {
        None => ":".to_string(),
        Some(Root::Separator) => String::new(),
        Some(other) => other.render(Platform::Mac),
    };

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        if segment != PARDIR {
            out.push_str(segment);
        }
    }

    // A trailing parent needs one more separator, and a bare volume needs
    // its colon to stay absolute.
    let bare_volume = matches!(root, Some(Root::Separator)) && segments.len() == 1;
    if segments.last().is_some_and(|s| s == PARDIR) || bare_volume {
        out.push(':');
    }
    out
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
            Self::Mac => write!(f, "mac"),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "posix" | "unix" => Ok(Self::Posix),
            "windows" | "nt" => Ok(Self::Windows),
            "mac" => Ok(Self::Mac),
            _ => Err(Error::Validation {
                field: "platform".into(),
                message: format!("unknown platform '{s}' (expected posix, windows or mac)"),
            }),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

/// The starting point of a rooted path.
///
/// Which roots count as absolute depends on the platform; see
/// [`Root::is_absolute_on`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Root {
    /// The single separator root: `/` on Posix, the current drive's root
    /// `\` on Windows, and the volume-absolute form on Mac.
    Separator,
    /// The root of a specific drive, such as `C:\`.
    Drive(char),
    /// The working directory of a specific drive, such as `c:`.
    UnrootedDrive(char),
    /// A UNC share such as `\\host\share\`.
    Unc {
        /// The server name.
        host: String,
        /// The share name.
        share: String,
    },
}

impl Root {
    /// Build a drive root, validating the letter.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPath` if `letter` is not an ASCII letter.
    pub fn drive(letter: char) -> Result<Self> {
        if letter.is_ascii_alphabetic() {
            Ok(Self::Drive(letter.to_ascii_uppercase()))
        } else {
            Err(Error::malformed(
                letter.to_string(),
                "drive must be a single ASCII letter",
            ))
        }
    }

    /// Whether a path starting at this root keeps its meaning when the
    /// working directory changes.
    #[must_use]
    pub fn is_absolute_on(&self, platform: Platform) -> bool {
        match self {
            Self::Separator => platform != Platform::Windows,
            Self::Drive(_) | Self::Unc { .. } => true,
            Self::UnrootedDrive(_) => false,
        }
    }

    /// Render the root in the conventions of `platform`.
    #[must_use]
    pub fn render(&self, platform: Platform) -> String {
        let sep = platform.separator();
        match self {
            Self::Separator if platform == Platform::Mac => String::new(),
            Self::Separator => sep.to_string(),
            Self::Drive(letter) => format!("{letter}:{sep}"),
            Self::UnrootedDrive(letter) => format!("{letter}:"),
            Self::Unc { host, share } => format!("{sep}{sep}{host}{sep}{share}{sep}"),
        }
    }
}
