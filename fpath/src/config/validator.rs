//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates merged or partial configurations.
///
/// # Examples
///
/// ```
/// use fpath::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { max_link_hops: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `max_link_hops` is zero, which would make
    /// every link unresolvable.
    pub fn validate(config: &Config) -> Result<()> {
        if config.max_link_hops == Some(0) {
            return Err(Error::Validation {
                field: "max_link_hops".into(),
                message: "Must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigValidator::validate(&Config::defaults()).is_ok());
    }

    #[test]
    fn test_zero_hops_rejected() {
        let config = Config {
            max_link_hops: Some(0),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(format!("{err}").contains("max_link_hops"));
    }

    #[test]
    fn test_one_hop_accepted() {
        let config = Config {
            max_link_hops: Some(1),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
