//! Platform-aware path values.
//!
//! This module holds the pure, filesystem-independent half of the crate.
//!
//! # Key Concepts
//!
//! ## Path values
//!
//! A [`PathValue`] is an optional [`Root`] plus an ordered list of segments.
//! Values are immutable: concatenation and slicing return new values, and
//! the root is never counted as a segment.
//!
//! ## Platforms
//!
//! Every value remembers the [`Platform`] whose conventions it was parsed
//! with. Parsing, segment validation and rendering all go through it, so the
//! same code handles Posix, Windows and classic Mac paths on any host.
//!
//! ## Normalization
//!
//! [`Normalizer`] produces canonical values by expanding `~`, collapsing
//! redundant separators and `.`, resolving `..` and folding case where the
//! platform is case-insensitive.
//!
//! # Examples
//!
//! ```
//! use fpath::path::{Normalizer, PathValue, Platform};
//!
//! let raw = PathValue::parse("/srv//www/./site/../static", Platform::Posix).unwrap();
//! assert_eq!(raw.segments(), ["srv", "www", "site", "..", "static"]);
//!
//! let clean = Normalizer::new()
//!     .with_platform(Platform::Posix)
//!     .normalize_path(&raw)
//!     .unwrap();
//! assert_eq!(clean.render(Platform::Windows), "\\srv\\www\\static");
//! ```

pub mod normalize;
pub mod platform;
pub mod value;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types
pub use normalize::{normalize, Normalizer};
pub use platform::{Platform, Root};
pub use value::{IntoPathValue, PathValue};
