//! Removal of stale installed binaries
//!
//! Runs on every startup and again in the replace helper. Deletes, in the
//! install directory:
//! - versioned binaries strictly older than the reference version
//! - staged downloads not newer than the reference version
//! - partial downloads of any version
//! - the legacy unversioned binary
//!
//! Files whose version does not parse are skipped. The running executable is
//! never deleted.

use std::fs;
use std::path::{Path, PathBuf};

use super::naming::{BinaryFile, BinaryNaming};
use crate::error::Result;
use crate::version::Version;

#[derive(Debug, Default)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
    /// Files that matched but could not be deleted, e.g. still locked
    pub failed: Vec<(PathBuf, String)>,
    /// Matching names whose version did not parse
    pub skipped: Vec<String>,
}

pub fn prune_stale_binaries(
    dir: &Path,
    reference: &Version,
    naming: &BinaryNaming,
    keep: Option<&Path>,
) -> Result<PruneReport> {
    let mut report = PruneReport::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let stale = match naming.classify(&name) {
            None => continue,
            Some(Err(e)) => {
                log::debug!("[Prune] Skipping {name}: {e}");
                report.skipped.push(name);
                continue;
            }
            Some(Ok(BinaryFile::Versioned(version))) => version < *reference,
            Some(Ok(BinaryFile::Staged(version))) => version <= *reference,
            Some(Ok(BinaryFile::Partial(_))) => true,
            Some(Ok(BinaryFile::Legacy)) => true,
        };

        if !stale || keep.is_some_and(|k| is_same_file(k, &path)) {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("[Prune] Removed older executable: {name}");
                report.removed.push(path);
            }
            Err(e) => {
                log::warn!("[Prune] Could not remove {name}: {e}");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report.removed.sort();
    Ok(report)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
