//! Temp-project fixtures shared by markdown-bundle integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use markdown_bundle_config::{Config, LoadOptions};
use tempfile::TempDir;

/// A temporary project directory with helpers for writing fixture files and
/// loading configuration scoped to it.
pub struct TempProject {
    dir: TempDir,
}

impl TempProject {
    pub fn new() -> Self {
        TempProject {
            dir: TempDir::new().expect("create temp project"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Write the project's `.markdown-bundle.toml`.
    pub fn write_config(&self, contents: &str) {
        self.write_file(".markdown-bundle.toml", contents);
    }

    /// Load configuration with the project root as working directory.
    pub fn config(&self) -> Config {
        Config::load(LoadOptions::default().with_working_dir(self.path()))
            .expect("load project config")
    }

    /// Read a file relative to the project root.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read fixture file")
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}
