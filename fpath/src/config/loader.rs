//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from files.
///
/// # Examples
///
/// ```no_run
/// use fpath::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(None, Some(Path::new("fpath.yaml"))).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the user config and an optional explicit file.
    ///
    /// 1. User config at `{data_dir}/config.yaml`, by default
    ///    `~/.fpath/config.yaml` (precedence 1, skipped when absent)
    /// 2. The explicit file (precedence 2, must exist)
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if the
    /// explicit file does not exist.
    pub fn load_all(data_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        if let Some(user_config) = Self::load_user_config(data_dir)? {
            sources.push(user_config);
        }

        if let Some(path) = explicit {
            sources.push(ConfigSource {
                path: path.to_path_buf(),
                precedence: 2,
                config: Self::load_file(path)?,
            });
        }

        sources.sort_by_key(|s| s.precedence);
        Ok(sources)
    }

    fn load_user_config(data_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let config_path = match data_dir {
            Some(dir) => dir.join("config.yaml"),
            None => match Self::user_config_path() {
                Some(path) => path,
                None => {
                    log::debug!("no home directory, skipping user configuration");
                    return Ok(None);
                }
            },
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&config_path)?;
        log::debug!("loaded user configuration from {}", config_path.display());
        Ok(Some(ConfigSource {
            path: config_path,
            precedence: 1,
            config,
        }))
    }

    /// Load and parse a YAML configuration file.
    ///
    /// An empty file yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is missing and `Configuration` if the
    /// YAML is invalid or has unknown fields.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::from_io(e, path))?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Default user configuration file, `~/.fpath/config.yaml`.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".fpath").join("config.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp = TempDir::new().unwrap();
        let err = ConfigLoader::load_file(&temp.path().join("config.yaml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "platform: [unclosed").unwrap();
        assert!(matches!(
            ConfigLoader::load_file(&path),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_all_orders_sources() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.yaml"), "platform: mac\n").unwrap();
        let explicit = temp.path().join("explicit.yaml");
        fs::write(&explicit, "platform: posix\n").unwrap();

        let sources = ConfigLoader::load_all(Some(temp.path()), Some(&explicit)).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].config.platform, Some(Platform::Mac));
        assert_eq!(sources[1].config.platform, Some(Platform::Posix));
    }

    #[test]
    fn test_missing_user_config_skipped() {
        let temp = TempDir::new().unwrap();
        let sources = ConfigLoader::load_all(Some(temp.path()), None).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yaml");
        assert!(ConfigLoader::load_all(Some(temp.path()), Some(&missing)).is_err());
    }
}
