//! Configuration (usb-nas.yaml) and environment overrides
//!
//! Every field has a default, so the file is optional. Environment variables
//! are applied after the file:
//! - `USB_NAS_CONFIG`: alternative config file path
//! - `USB_NAS_VERSION_URL`, `USB_NAS_BASE_URL`: update endpoints
//! - `USB_NAS_LOG_FILE`: log file path
//! - `USB_NAS_REPLACE_GRACE_MS`: helper grace period
//! - `USB_NAS_SKIP_UPDATE`: disable the startup update check

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NasError, Result};

/// Config file name looked up next to the executable
pub const CONFIG_FILE: &str = "usb-nas.yaml";

/// Principal that represents every network user
pub const EVERYONE: &str = "Everyone";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub update: UpdateConfig,
    pub share: ShareConfig,
    pub account: AccountConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    /// Endpoint returning the latest version token (e.g. "1.0.3")
    pub version_url: String,
    /// Base address of versioned binaries
    pub base_url: String,
    pub binary_prefix: String,
    pub binary_extension: String,
    /// Upper bound the helper waits for the old binary to be released
    pub replace_grace_ms: u64,
    pub poll_interval_ms: u64,
    pub check_on_startup: bool,
    pub timeout_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            version_url: "http://127.0.0.1:8080/latestVersion.txt".to_string(),
            base_url: "http://127.0.0.1:8080".to_string(),
            binary_prefix: "usb-nas-cli".to_string(),
            binary_extension: "exe".to_string(),
            replace_grace_ms: 3000,
            poll_interval_ms: 250,
            check_on_startup: true,
            timeout_secs: 30,
        }
    }
}

/// Who gets full access to a created share
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Also grant the broad "Everyone" principal
    pub grant_everyone: bool,
    pub extra_grantees: Vec<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            grant_everyone: true,
            extra_grantees: Vec::new(),
        }
    }
}

impl ShareConfig {
    /// Grantee set for a share owned by `account`.
    ///
    /// The account always comes first; duplicates are dropped
    /// case-insensitively, as Windows principal names are.
    pub fn grantees(&self, account: &str) -> Vec<String> {
        let mut grantees = vec![account.to_string()];
        let everyone = self.grant_everyone.then(|| EVERYONE.to_string());
        for name in self.extra_grantees.iter().cloned().chain(everyone) {
            let name = name.trim().to_string();
            if name.is_empty() || grantees.iter().any(|g| g.eq_ignore_ascii_case(&name)) {
                continue;
            }
            grantees.push(name);
        }
        grantees
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountConfig {
    /// Local group the temporary account joins
    pub group: String,
    pub username_prefix: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            group: "Users".to_string(),
            username_prefix: "smbuser".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load configuration for an executable installed in `install_dir`
    pub fn load(install_dir: &Path) -> Result<Self> {
        let path = std::env::var_os("USB_NAS_CONFIG")
            .map_or_else(|| install_dir.join(CONFIG_FILE), PathBuf::from);

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let yaml = fs::read_to_string(path).map_err(|e| NasError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&yaml).map_err(|e| match e {
            NasError::Config { reason, .. } => NasError::Config {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `USB_NAS_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("USB_NAS_VERSION_URL") {
            self.update.version_url = url;
        }
        if let Some(url) = lookup("USB_NAS_BASE_URL") {
            self.update.base_url = url;
        }
        if let Some(file) = lookup("USB_NAS_LOG_FILE") {
            self.log.file = Some(PathBuf::from(file));
        }
        if let Some(grace) = lookup("USB_NAS_REPLACE_GRACE_MS") {
            self.update.replace_grace_ms =
                grace.trim().parse().map_err(|_| NasError::Config {
                    path: "USB_NAS_REPLACE_GRACE_MS".to_string(),
                    reason: format!("expected milliseconds, got '{grace}'"),
                })?;
        }
        if lookup("USB_NAS_SKIP_UPDATE").is_some() {
            self.update.check_on_startup = false;
        }
        Ok(())
    }

    /// Log file location, defaulting to `<prefix>.log` in `install_dir`
    pub fn log_file(&self, install_dir: &Path) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            install_dir.join(format!("{}.log", self.update.binary_prefix))
        })
    }
}
