//! Common test utilities for usb-nas-cli integration tests

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway install directory
pub struct InstallDir {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

impl InstallDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the install directory
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }

    /// Sorted file names in the install directory
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.path)
            .expect("Failed to read install directory")
            .map(|e| {
                e.expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    pub fn log_path(&self) -> PathBuf {
        self.path.join("test.log")
    }
}

/// The real binary with logging redirected into `install` and no ambient
/// configuration
#[allow(deprecated)]
pub fn nas_cmd(install: &InstallDir) -> Command {
    let mut cmd = Command::cargo_bin("usb-nas-cli").expect("binary is built");
    cmd.env("USB_NAS_LOG_FILE", install.log_path())
        .env("USB_NAS_REPLACE_GRACE_MS", "0")
        .env_remove("USB_NAS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[allow(dead_code)]
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
