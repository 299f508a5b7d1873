//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `FPATH_*` environment variables that
//! override configuration file values.

use std::env;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use fpath::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., unknown platform, non-numeric hop count, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        // FPATH_PLATFORM
        if let Ok(platform) = env::var("FPATH_PLATFORM") {
            config.platform = Some(platform.parse().map_err(|_| Error::Validation {
                field: "FPATH_PLATFORM".into(),
                message: format!("Unknown platform '{platform}' (expected posix, windows or mac)"),
            })?);
        }

        // FPATH_MAX_LINK_HOPS
        if let Ok(hops) = env::var("FPATH_MAX_LINK_HOPS") {
            config.max_link_hops = Some(hops.trim().parse().map_err(|_| Error::Validation {
                field: "FPATH_MAX_LINK_HOPS".into(),
                message: "Must be a positive integer".into(),
            })?);
        }

        if let Ok(val) = env::var("FPATH_EXPAND_USER") {
            config.expand_user = Some(Self::parse_bool("FPATH_EXPAND_USER", &val)?);
        }

        if let Ok(val) = env::var("FPATH_EXPAND_VARS") {
            config.expand_vars = Some(Self::parse_bool("FPATH_EXPAND_VARS", &val)?);
        }

        if let Ok(val) = env::var("FPATH_FOLLOW_LINKS") {
            config.follow_links = Some(Self::parse_bool("FPATH_FOLLOW_LINKS", &val)?);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
