//! Startup update check
//!
//! Never fatal: every failure is logged, reported to the operator, and the
//! program continues on the running version.

use std::fs;
use std::path::PathBuf;

use super::Environment;
use crate::config::Config;
use crate::system::{DetachedSpawner, Spawner};
use crate::ui::OperatorChannel;
use crate::update::{self, BinaryNaming, HttpTransport, UpdateCheck, UpdateTransport};
use crate::version::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Checking is disabled by configuration
    Skipped,
    UpToDate,
    /// The version could not be determined
    Unavailable,
    Declined(Version),
    Failed(Version),
    /// The helper is running; the caller must exit
    Launched(Version),
}

/// Paths the update flow works with
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    pub running: Version,
    pub naming: BinaryNaming,
    pub install_dir: PathBuf,
    pub current_exe: PathBuf,
    pub helper_dir: PathBuf,
}

impl UpdatePlan {
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            running: env.running,
            naming: env.naming.clone(),
            install_dir: env.install_dir.clone(),
            current_exe: env.current_exe.clone(),
            helper_dir: crate::paths::temp_dir_base(),
        }
    }
}

pub fn run(config: &Config, plan: &UpdatePlan, operator: &mut dyn OperatorChannel) -> UpdateOutcome {
    if !config.update.check_on_startup {
        log::info!("[Update] Update check disabled");
        return UpdateOutcome::Skipped;
    }

    let transport = match HttpTransport::new(&config.update) {
        Ok(transport) => transport.with_progress(true),
        Err(e) => {
            log::warn!("[Update] Error checking for updates: {e}");
            return UpdateOutcome::Unavailable;
        }
    };
    check_and_update(&transport, plan, operator, &DetachedSpawner)
}

pub fn check_and_update(
    transport: &dyn UpdateTransport,
    plan: &UpdatePlan,
    operator: &mut dyn OperatorChannel,
    spawner: &dyn Spawner,
) -> UpdateOutcome {
    let latest = match update::check_latest(transport, &plan.running) {
        Ok(UpdateCheck::UpToDate) => return UpdateOutcome::UpToDate,
        Ok(UpdateCheck::Available(latest)) => latest,
        Err(e) => {
            log::warn!("[Update] Error checking for updates: {e}");
            return UpdateOutcome::Unavailable;
        }
    };

    match operator.confirm_update(&latest, &plan.running) {
        Ok(true) => {}
        Ok(false) => {
            log::info!("[Update] Update to {latest} declined");
            return UpdateOutcome::Declined(latest);
        }
        Err(e) => {
            log::info!("[Update] No answer to update prompt ({e}), continuing");
            return UpdateOutcome::Declined(latest);
        }
    }

    log::info!("[Update] Updating {} -> {latest}", plan.running);
    operator.notify(&format!("Downloading version {latest}..."));

    let artifact = match update::stage(transport, &plan.naming, &plan.install_dir, &latest) {
        Ok(artifact) => artifact,
        Err(e) => return failed(operator, plan, latest, &e),
    };

    match update::hand_off(
        &artifact,
        &plan.current_exe,
        &plan.helper_dir,
        &plan.naming,
        spawner,
    ) {
        Ok(_) => UpdateOutcome::Launched(latest),
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&artifact.staged_path) {
                log::warn!(
                    "[Update] Could not remove {}: {cleanup}",
                    artifact.staged_path.display()
                );
            }
            failed(operator, plan, latest, &e)
        }
    }
}

fn failed(
    operator: &mut dyn OperatorChannel,
    plan: &UpdatePlan,
    latest: Version,
    error: &crate::error::NasError,
) -> UpdateOutcome {
    log::error!("[Update] Update to {latest} failed: {error}");
    operator.notify(&format!(
        "Update failed: {error}. Continuing with version {}.",
        plan.running
    ));
    UpdateOutcome::Failed(latest)
}
