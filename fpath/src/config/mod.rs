//! Configuration system for fpath.
//!
//! This module provides layered configuration with support for:
//! - YAML configuration files (user config and an explicit file)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`FPATH_*`)
//! 3. Explicit file (via `ConfigBuilder::with_file`)
//! 4. User config (`~/.fpath/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! Basic usage with defaults:
//!
//! ```no_run
//! use fpath::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let path = config.normalizer().normalize("~/notes").unwrap();
//! println!("{path}");
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use fpath::config::{Config, ConfigBuilder};
//! use fpath::Platform;
//!
//! let custom = Config {
//!     platform: Some(Platform::Mac),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.platform(), Platform::Mac);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

// Re-export key types at module root
pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::Config;
pub use validator::ConfigValidator;
