//! Common test utilities for integration tests.
//!
//! This module provides a fixture builder for laying out small directory
//! trees inside a temporary directory.

use std::fs;
use std::path::Path;

use fpath::PathValue;
use tempfile::TempDir;

/// Directories created by [`TreeFixture::standard`].
#[allow(dead_code)]
pub const STANDARD_DIRS: [&str; 5] = ["alpha", "alpha/beta", "alpha/beta/gamma", "delta", "epsilon"];

/// Files created by [`TreeFixture::standard`].
#[allow(dead_code)]
pub const STANDARD_FILES: [&str; 10] = [
    "top.txt",
    "readme.md",
    "alpha/one.txt",
    "alpha/two.rs",
    "alpha/beta/three.txt",
    "alpha/beta/gamma/four.txt",
    "alpha/beta/gamma/five.bin",
    "delta/six.txt",
    "delta/seven.txt",
    "epsilon/eight.log",
];

/// Builder for a directory tree rooted in a fresh temporary directory.
///
/// # Examples
///
/// ```no_run
/// # use common::TreeFixture;
/// let tree = TreeFixture::new()
///     .with_dir("src")
///     .with_file("src/main.rs", "fn main() {}");
/// let main = tree.path("src/main.rs");
/// ```
pub struct TreeFixture {
    temp: TempDir,
}

#[allow(dead_code)]
impl TreeFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temporary directory"),
        }
    }

    /// The fixture used by the walk tests: [`STANDARD_DIRS`] and
    /// [`STANDARD_FILES`], nested up to three levels.
    pub fn standard() -> Self {
        let mut tree = Self::new();
        for dir in STANDARD_DIRS {
            tree = tree.with_dir(dir);
        }
        for file in STANDARD_FILES {
            tree = tree.with_file(file, file);
        }
        tree
    }

    /// Adds a directory (and any missing parents).
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.temp.path().join(relative)).expect("failed to create directory");
        self
    }

    /// Adds a file with the given contents.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(path, contents).expect("failed to write file");
        self
    }

    /// Adds a symbolic link storing `target` verbatim.
    #[cfg(unix)]
    pub fn with_symlink(self, relative: &str, target: &str) -> Self {
        std::os::unix::fs::symlink(target, self.temp.path().join(relative))
            .expect("failed to create symlink");
        self
    }

    /// The fixture root on disk.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// The fixture root as a path value.
    pub fn root_value(&self) -> PathValue {
        to_value(self.root())
    }

    /// A path below the fixture root.
    pub fn path(&self, relative: &str) -> PathValue {
        to_value(&self.temp.path().join(relative))
    }
}

/// Converts an OS path into a host path value.
#[allow(dead_code)]
pub fn to_value(path: &Path) -> PathValue {
    PathValue::try_from(path).expect("temporary paths are valid UTF-8")
}
