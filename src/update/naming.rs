//! Installed binary naming
//!
//! - versioned: `<prefix>-v<version>.<ext>`
//! - staged download: the versioned name plus `.tmp`
//! - partial download: the versioned name, a random segment, then `.tmp`
//! - legacy: `<prefix>.<ext>` from before versioned installs

use std::path::{Path, PathBuf};

use crate::config::UpdateConfig;
use crate::error::Result;
use crate::version::{self, Version};

const STAGED_SUFFIX: &str = ".tmp";

/// What a file in the install directory is, judged by its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryFile {
    Versioned(Version),
    Staged(Version),
    /// A download that never completed
    Partial(Version),
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryNaming {
    prefix: String,
    extension: String,
}

impl BinaryNaming {
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &UpdateConfig) -> Self {
        Self::new(&config.binary_prefix, &config.binary_extension)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn file_name(&self, version: &Version) -> String {
        format!("{}-v{version}{}", self.prefix, self.dotted_extension())
    }

    pub fn staged_file_name(&self, version: &Version) -> String {
        format!("{}{STAGED_SUFFIX}", self.file_name(version))
    }

    /// Name prefix of an in-progress download of `version`
    pub fn partial_prefix(&self, version: &Version) -> String {
        format!("{}.", self.file_name(version))
    }

    /// Name suffix shared by staged and partial downloads
    pub fn staged_suffix(&self) -> &'static str {
        STAGED_SUFFIX
    }

    pub fn legacy_file_name(&self) -> String {
        format!("{}{}", self.prefix, self.dotted_extension())
    }

    /// Final install path of `version` in `dir`
    pub fn install_path(&self, dir: &Path, version: &Version) -> PathBuf {
        dir.join(self.file_name(version))
    }

    pub fn staged_path(&self, dir: &Path, version: &Version) -> PathBuf {
        dir.join(self.staged_file_name(version))
    }

    /// Classify a file name.
    ///
    /// `None` means the file is not one of ours. `Some(Err(_))` means it
    /// looks like a versioned binary but the version does not parse.
    pub fn classify(&self, file_name: &str) -> Option<Result<BinaryFile>> {
        if file_name == self.legacy_file_name() {
            return Some(Ok(BinaryFile::Legacy));
        }

        let rest = file_name.strip_prefix(&self.prefix)?.strip_prefix("-v")?;

        if let Some(staged) = rest.strip_suffix(STAGED_SUFFIX) {
            if let Some(version) = self.partial_version(staged) {
                return Some(Ok(BinaryFile::Partial(version)));
            }
            let text = staged.strip_suffix(&self.dotted_extension())?;
            return Some(version::parse(text).map(BinaryFile::Staged));
        }

        let text = rest.strip_suffix(&self.dotted_extension())?;
        Some(version::parse(text).map(BinaryFile::Versioned))
    }

    /// Version of `<version><ext>.<random>`, the tail of a partial download
    fn partial_version(&self, staged: &str) -> Option<Version> {
        let extension = self.dotted_extension();
        if staged
            .strip_suffix(&extension)
            .is_some_and(|text| version::parse(text).is_ok())
        {
            return None;
        }
        let (download, random) = staged.rsplit_once('.')?;
        if random.is_empty() || !random.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        version::parse(download.strip_suffix(&extension)?).ok()
    }

    fn dotted_extension(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }
}
