//! Staging a downloaded binary and swapping it in
//!
//! The running executable cannot replace itself while it is locked, so the
//! swap is done by a helper: a copy of the current executable placed in the
//! temp directory and launched as `replace <staged> <target> <version>`.
//!
//! Helper steps, in order:
//! 1. validate the staged file (present, non-empty)
//! 2. rename the staged file to the versioned target
//! 3. prune older binaries, retrying until the grace period expires
//! 4. launch the target
//!
//! A failure in step 1 or 2 leaves the previous installation untouched.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::{Builder, NamedTempFile};

use super::naming::BinaryNaming;
use super::prune::prune_stale_binaries;
use super::transport::UpdateTransport;
use crate::error::{Result, update};
use crate::system::Spawner;
use crate::version::Version;

/// Subcommand the helper is launched with
pub const REPLACE_COMMAND: &str = "replace";

/// A downloaded binary waiting to be swapped in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArtifact {
    pub version: Version,
    pub staged_path: PathBuf,
    pub target_path: PathBuf,
}

impl UpdateArtifact {
    /// Helper command line arguments
    pub fn helper_args(&self) -> Vec<OsString> {
        vec![
            OsString::from(REPLACE_COMMAND),
            self.staged_path.clone().into_os_string(),
            self.target_path.clone().into_os_string(),
            OsString::from(self.version.to_string()),
        ]
    }
}

/// Timing for the helper's retry loops
#[derive(Debug, Clone, Copy)]
pub struct ReplaceTiming {
    pub grace: Duration,
    pub poll: Duration,
}

impl ReplaceTiming {
    pub fn from_millis(grace_ms: u64, poll_ms: u64) -> Self {
        Self {
            grace: Duration::from_millis(grace_ms),
            poll: Duration::from_millis(poll_ms.max(1)),
        }
    }
}

#[derive(Debug)]
pub struct ReplaceOutcome {
    pub target: PathBuf,
    pub removed: Vec<PathBuf>,
    /// Older binaries still present when the grace period ran out
    pub leftover: Vec<PathBuf>,
}

/// Download `version` into the install directory under its staged name.
///
/// The download goes to a partial file first; it only receives the staged
/// name once fully written, and is deleted on any failure. A partial file
/// left by a killed process is removed by the next startup prune.
pub fn stage(
    transport: &dyn UpdateTransport,
    naming: &BinaryNaming,
    install_dir: &Path,
    version: &Version,
) -> Result<UpdateArtifact> {
    let mut download = partial_download(naming, install_dir, version)?;

    let written = transport.fetch_binary(version, download.as_file_mut())?;
    if written == 0 {
        return Err(update::failed(format!("binary for {version} is empty")));
    }
    download.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(download.path(), fs::Permissions::from_mode(0o755))?;
    }

    let staged_path = naming.staged_path(install_dir, version);
    download
        .persist(&staged_path)
        .map_err(|e| update::failed(format!("staging {}: {}", staged_path.display(), e.error)))?;
    log::info!("[Update] Staged {version} at {}", staged_path.display());

    Ok(UpdateArtifact {
        version: *version,
        staged_path,
        target_path: naming.install_path(install_dir, version),
    })
}

fn partial_download(
    naming: &BinaryNaming,
    install_dir: &Path,
    version: &Version,
) -> Result<NamedTempFile> {
    let prefix = naming.partial_prefix(version);
    Builder::new()
        .prefix(&prefix)
        .suffix(naming.staged_suffix())
        .tempfile_in(install_dir)
        .map_err(|e| update::failed(format!("creating download file: {e}")))
}

/// File name of the helper copy in the temp directory
pub fn helper_file_name(naming: &BinaryNaming) -> String {
    let legacy = naming.legacy_file_name();
    match legacy.strip_prefix(naming.prefix()) {
        Some(ext) => format!("{}-update-helper{ext}", naming.prefix()),
        None => format!("{legacy}-update-helper"),
    }
}

/// Copy `current_exe` into `helper_dir` and launch it to perform the swap.
///
/// On success the caller should exit so its executable is released.
pub fn hand_off(
    artifact: &UpdateArtifact,
    current_exe: &Path,
    helper_dir: &Path,
    naming: &BinaryNaming,
    spawner: &dyn Spawner,
) -> Result<PathBuf> {
    let helper = helper_dir.join(helper_file_name(naming));
    fs::copy(current_exe, &helper).map_err(|e| {
        update::failed(format!("copying helper to {}: {e}", helper.display()))
    })?;

    spawner.spawn_detached(&helper, &artifact.helper_args())?;
    log::info!(
        "[Update] Handed off to helper {} for {}",
        helper.display(),
        artifact.version
    );
    Ok(helper)
}

/// Remove a helper copy left behind by a previous update
pub fn remove_stale_helper(helper_dir: &Path, naming: &BinaryNaming) -> bool {
    let helper = helper_dir.join(helper_file_name(naming));
    if !helper.exists() {
        return false;
    }
    match fs::remove_file(&helper) {
        Ok(()) => {
            log::info!("[Prune] Removed update helper {}", helper.display());
            true
        }
        Err(e) => {
            log::debug!("[Prune] Update helper still in use: {e}");
            false
        }
    }
}

/// Body of the `replace` helper
pub fn run_helper(
    artifact: &UpdateArtifact,
    naming: &BinaryNaming,
    timing: ReplaceTiming,
    spawner: &dyn Spawner,
) -> Result<ReplaceOutcome> {
    validate_staged(&artifact.staged_path)?;

    let install_dir = artifact
        .target_path
        .parent()
        .ok_or_else(|| update::failed("target has no parent directory"))?;

    let deadline = Instant::now() + timing.grace;
    retry_until(deadline, timing.poll, || {
        fs::rename(&artifact.staged_path, &artifact.target_path)
    })
    .map_err(|e| {
        update::failed(format!(
            "moving {} to {}: {e}",
            artifact.staged_path.display(),
            artifact.target_path.display()
        ))
    })?;
    log::info!("[Replace] Installed {}", artifact.target_path.display());

    // The new binary is installed; nothing below may keep it from launching
    let (removed, leftover) = prune_until(install_dir, artifact, naming, deadline, timing.poll);
    for path in &leftover {
        log::warn!(
            "[Replace] {} still locked, it will be removed on next start",
            path.display()
        );
    }

    spawner.spawn_detached(&artifact.target_path, &[])?;
    Ok(ReplaceOutcome {
        target: artifact.target_path.clone(),
        removed,
        leftover,
    })
}

/// Prune older binaries until none are locked or `deadline` passes.
///
/// Returns the removed files and those still present. A failed directory
/// scan is logged and ends pruning.
fn prune_until(
    install_dir: &Path,
    artifact: &UpdateArtifact,
    naming: &BinaryNaming,
    deadline: Instant,
    poll: Duration,
) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut removed = Vec::new();
    loop {
        let report = match prune_stale_binaries(
            install_dir,
            &artifact.version,
            naming,
            Some(&artifact.target_path),
        ) {
            Ok(report) => report,
            Err(e) => {
                log::warn!(
                    "[Replace] Could not scan {} for older binaries: {e}",
                    install_dir.display()
                );
                return (removed, Vec::new());
            }
        };
        removed.extend(report.removed);
        let failed: Vec<PathBuf> = report.failed.into_iter().map(|(path, _)| path).collect();
        if failed.is_empty() || Instant::now() >= deadline {
            return (removed, failed);
        }
        thread::sleep(poll);
    }
}

fn validate_staged(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .map_err(|e| update::failed(format!("staged binary {}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(update::failed(format!(
            "staged binary {} is not a file",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(update::failed(format!(
            "staged binary {} is empty",
            path.display()
        )));
    }
    Ok(())
}

fn retry_until<T>(
    deadline: Instant,
    poll: Duration,
    mut op: impl FnMut() -> std::io::Result<T>,
) -> std::io::Result<T> {
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if Instant::now() >= deadline => return Err(e),
            Err(e) => {
                log::debug!("[Replace] Retrying after: {e}");
                thread::sleep(poll);
            }
        }
    }
}

#[cfg(test)]
mod tests;
