#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # fpath
//!
//! Object-oriented filesystem paths that work across platform conventions.
//!
//! A path is an immutable value made of an optional root and a list of
//! segments. Values can be concatenated, sliced, normalized and rendered for
//! Posix, Windows or classic Mac conventions on any host. When the
//! filesystem matters, a value is promoted into a file, directory or link
//! handle that only offers the operations that make sense for it.
//!
//! ## Core Types
//!
//! - [`PathValue`], [`Platform`] and [`Root`]: pure path values
//! - [`Normalizer`]: `~` expansion, `.`/`..` resolution and case folding
//! - [`Entry`], [`File`], [`Dir`] and [`Link`]: filesystem-aware variants
//! - [`Transformer`]: probes a path and builds the matching variant
//! - [`Config`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use fpath::{PathValue, Platform};
//!
//! let dir = PathValue::parse("/some/path", Platform::Posix).unwrap();
//! let file = dir.concatenate("file.ext").unwrap();
//!
//! assert_eq!(file.index(-1).unwrap(), "file.ext");
//! assert_eq!(file.extension(), "ext");
//! assert_eq!(file.render(Platform::Windows), "\\some\\path\\file.ext");
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod logging;
pub mod path;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use entry::{transform, Dir, Entry, EntryKind, File, Link, Stats, Transformer};
pub use error::{Error, Result};
pub use logging::{init_logger, resolve_level, LogLevel, Logger};
pub use path::{normalize, IntoPathValue, Normalizer, PathValue, Platform, Root};
