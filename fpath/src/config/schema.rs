//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered; the accessor methods supply the built-in defaults.

use serde::{Deserialize, Serialize};

use crate::entry::{OsProbe, Transformer, DEFAULT_MAX_LINK_HOPS};
use crate::path::{Normalizer, Platform};

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use fpath::config::Config;
/// use fpath::Platform;
///
/// let config = Config {
///     platform: Some(Platform::Windows),
///     max_link_hops: Some(8),
///     ..Default::default()
/// };
/// assert_eq!(config.platform(), Platform::Windows);
/// assert_eq!(config.transformer().max_link_hops(), 8);
/// assert!(config.expand_user());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path conventions used for parsing and rendering.
    pub platform: Option<Platform>,

    /// Maximum number of links followed by a single resolution.
    pub max_link_hops: Option<usize>,

    /// Expand a leading `~` during normalization.
    pub expand_user: Option<bool>,

    /// Expand environment variables during normalization.
    pub expand_vars: Option<bool>,

    /// Classify links by their targets when probing.
    pub follow_links: Option<bool>,
}

impl Config {
    /// The built-in defaults with every field set.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            platform: Some(Platform::host()),
            max_link_hops: Some(DEFAULT_MAX_LINK_HOPS),
            expand_user: Some(true),
            expand_vars: Some(false),
            follow_links: Some(false),
        }
    }

    /// The configured platform, or the host's.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_default()
    }

    /// The configured hop bound, or the default of 40.
    #[must_use]
    pub fn max_link_hops(&self) -> usize {
        self.max_link_hops.unwrap_or(DEFAULT_MAX_LINK_HOPS)
    }

    /// Whether `~` is expanded (default on).
    #[must_use]
    pub fn expand_user(&self) -> bool {
        self.expand_user.unwrap_or(true)
    }

    /// Whether environment variables are expanded (default off).
    #[must_use]
    pub fn expand_vars(&self) -> bool {
        self.expand_vars.unwrap_or(false)
    }

    /// Whether probes follow links (default off).
    #[must_use]
    pub fn follow_links(&self) -> bool {
        self.follow_links.unwrap_or(false)
    }

    /// A normalizer honoring this configuration.
    #[must_use]
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new()
            .with_platform(self.platform())
            .with_user_expansion(self.expand_user())
            .with_var_expansion(self.expand_vars())
    }

    /// A probe honoring `follow_links`.
    #[must_use]
    pub fn probe(&self) -> OsProbe {
        if self.follow_links() {
            OsProbe::following_links()
        } else {
            OsProbe::new()
        }
    }

    /// A transformer honoring the hop bound and `follow_links`.
    ///
    /// With `follow_links` set, a link is promoted according to its target
    /// and a dangling link stays a generic path.
    #[must_use]
    pub fn transformer(&self) -> Transformer {
        Transformer::new()
            .with_probe(self.probe())
            .with_max_link_hops(self.max_link_hops())
    }
}
