//! Integration tests for layered configuration.
//!
//! These tests mutate `FPATH_*` variables, so every test that builds with
//! the environment enabled runs under `#[serial]`.

use std::env;
use std::fs;

use fpath::config::{Config, ConfigBuilder, ConfigLoader};
use fpath::{Error, Platform};
use serial_test::serial;
use tempfile::TempDir;

const VARS: [&str; 5] = [
    "FPATH_PLATFORM",
    "FPATH_MAX_LINK_HOPS",
    "FPATH_EXPAND_USER",
    "FPATH_EXPAND_VARS",
    "FPATH_FOLLOW_LINKS",
];

/// Clears every `FPATH_*` variable and restores the previous values on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn clean() -> Self {
        let saved = VARS.iter().map(|&name| (name, env::var(name).ok())).collect();
        for name in VARS {
            env::remove_var(name);
        }
        Self { saved }
    }

    fn set(self, name: &str, value: &str) -> Self {
        env::set_var(name, value);
        self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..) {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

fn data_dir_with(yaml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yaml"), yaml).unwrap();
    dir
}

#[test]
#[serial]
fn test_defaults_without_sources() {
    let _env = EnvGuard::clean();
    let empty = TempDir::new().unwrap();

    let config = ConfigBuilder::new().with_data_dir(empty.path()).build().unwrap();
    assert_eq!(config, Config::defaults());
    assert_eq!(config.max_link_hops(), 40);
    assert!(!config.expand_vars());
}

#[test]
#[serial]
fn test_user_file_applies() {
    let _env = EnvGuard::clean();
    let dir = data_dir_with("max_link_hops: 12\nexpand_vars: true\n");

    let config = ConfigBuilder::new().with_data_dir(dir.path()).build().unwrap();
    assert_eq!(config.max_link_hops, Some(12));
    assert_eq!(config.expand_vars, Some(true));
    assert_eq!(config.expand_user, Some(true));
}

#[test]
#[serial]
fn test_explicit_file_beats_user_file() {
    let _env = EnvGuard::clean();
    let dir = data_dir_with("max_link_hops: 12\nplatform: mac\n");
    let explicit = dir.path().join("explicit.yaml");
    fs::write(&explicit, "max_link_hops: 3\n").unwrap();

    let config = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .with_file(&explicit)
        .build()
        .unwrap();
    assert_eq!(config.max_link_hops, Some(3));
    assert_eq!(config.platform(), Platform::Mac);
}

#[test]
#[serial]
fn test_env_beats_files() {
    let _env = EnvGuard::clean()
        .set("FPATH_MAX_LINK_HOPS", "7")
        .set("FPATH_PLATFORM", "windows")
        .set("FPATH_FOLLOW_LINKS", "yes");
    let dir = data_dir_with("max_link_hops: 12\nplatform: posix\n");

    let config = ConfigBuilder::new().with_data_dir(dir.path()).build().unwrap();
    assert_eq!(config.max_link_hops(), 7);
    assert_eq!(config.platform(), Platform::Windows);
    assert!(config.follow_links());
    assert!(config.probe().follows_links());
}

#[test]
#[serial]
fn test_overrides_beat_env() {
    let _env = EnvGuard::clean().set("FPATH_EXPAND_USER", "false");
    let empty = TempDir::new().unwrap();

    let config = ConfigBuilder::new()
        .with_data_dir(empty.path())
        .with_config(Config {
            expand_user: Some(true),
            ..Default::default()
        })
        .build()
        .unwrap();
    assert!(config.expand_user());
}

#[test]
#[serial]
fn test_skip_env_ignores_variables() {
    let _env = EnvGuard::clean().set("FPATH_MAX_LINK_HOPS", "not a number");

    let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
    assert_eq!(config.max_link_hops(), 40);
}

#[test]
#[serial]
fn test_invalid_env_values_rejected() {
    let _env = EnvGuard::clean().set("FPATH_PLATFORM", "amiga");
    let err = ConfigBuilder::new().skip_files().build().unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "{err}");

    let _env = EnvGuard::clean().set("FPATH_EXPAND_VARS", "sometimes");
    assert!(ConfigBuilder::new().skip_files().build().is_err());
}

#[test]
#[serial]
fn test_zero_hops_rejected_after_merge() {
    let _env = EnvGuard::clean().set("FPATH_MAX_LINK_HOPS", "0");
    let err = ConfigBuilder::new().skip_files().build().unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
#[serial]
fn test_missing_explicit_file() {
    let _env = EnvGuard::clean();
    let dir = TempDir::new().unwrap();

    let err = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .with_file(dir.path().join("absent.yaml"))
        .build()
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_unknown_field_in_file() {
    let dir = data_dir_with("max_hops: 3\n");
    let err = ConfigLoader::load_file(&dir.path().join("config.yaml")).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
#[serial]
fn test_config_drives_normalizer() {
    let _env = EnvGuard::clean();
    let config = ConfigBuilder::new()
        .skip_files()
        .with_config(Config {
            platform: Some(Platform::Windows),
            ..Default::default()
        })
        .build()
        .unwrap();

    let normalized = config.normalizer().normalize(r"C:\Users\.\Public\..\Docs").unwrap();
    assert_eq!(normalized.to_string(), r"C:\users\docs");
}
