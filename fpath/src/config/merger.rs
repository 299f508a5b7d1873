//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use fpath::config::{Config, ConfigMerger};
///
/// let low = Config { max_link_hops: Some(10), expand_vars: Some(true), ..Default::default() };
/// let high = Config { max_link_hops: Some(20), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.max_link_hops, Some(20));
/// assert_eq!(result.expand_vars, Some(true));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Overwrite every field of `target` that `source` sets.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.platform.is_some() {
            target.platform = source.platform;
        }
        if source.max_link_hops.is_some() {
            target.max_link_hops = source.max_link_hops;
        }
        if source.expand_user.is_some() {
            target.expand_user = source.expand_user;
        }
        if source.expand_vars.is_some() {
            target.expand_vars = source.expand_vars;
        }
        if source.follow_links.is_some() {
            target.follow_links = source.follow_links;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Platform;
    use std::path::PathBuf;

    fn source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("layer-{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_empty() {
        assert_eq!(ConfigMerger::merge(vec![]), Config::default());
    }

    #[test]
    fn test_later_sources_win() {
        let merged = ConfigMerger::merge(vec![
            source(
                1,
                Config {
                    platform: Some(Platform::Mac),
                    follow_links: Some(true),
                    ..Default::default()
                },
            ),
            source(
                2,
                Config {
                    platform: Some(Platform::Posix),
                    ..Default::default()
                },
            ),
        ]);
        assert_eq!(merged.platform, Some(Platform::Posix));
        assert_eq!(merged.follow_links, Some(true));
    }

    #[test]
    fn test_unset_fields_do_not_clear() {
        let mut target = Config::defaults();
        ConfigMerger::merge_into(&mut target, &Config::default());
        assert_eq!(target, Config::defaults());
    }
}
