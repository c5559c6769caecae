//! Interactive run
//!
//! Startup order: prune stale binaries, log the start, ensure elevation,
//! check for updates, then share drives until the operator stops.

use std::ffi::OsString;

use super::update::{UpdateOutcome, UpdatePlan};
use super::{Environment, prepare};
use crate::error::Result;
use crate::system::{Elevation, PrivilegeChecker, SystemRunner, ensure_elevated};
use crate::ui::TerminalOperator;
use crate::update::{prune_stale_binaries, remove_stale_helper};

pub fn run(verbose: bool) -> Result<()> {
    let env = prepare(verbose)?;
    prune_on_startup(&env);

    log::info!(
        "[Main] usb-nas-cli {} started from {}",
        env.running,
        env.current_exe.display()
    );

    let checker = PrivilegeChecker::new(SystemRunner);
    if ensure_elevated(&checker, &env.current_exe, &relaunch_args(verbose))?
        == Elevation::Relaunched
    {
        println!("Restarting with administrator privileges...");
        return Ok(());
    }

    let mut operator = TerminalOperator::new();
    let plan = UpdatePlan::from_environment(&env);
    if let UpdateOutcome::Launched(version) =
        super::update::run(&env.config, &plan, &mut operator)
    {
        println!("Restarting on version {version}...");
        return Ok(());
    }

    super::share::run(&env.config, &mut operator)?;
    log::info!("[Main] Exiting");
    Ok(())
}

/// Remove binaries older than the running one; failures never stop startup
fn prune_on_startup(env: &Environment) {
    match prune_stale_binaries(
        &env.install_dir,
        &env.running,
        &env.naming,
        Some(&env.current_exe),
    ) {
        Ok(report) => {
            for (path, reason) in &report.failed {
                log::warn!("[Prune] Left {} in place: {reason}", path.display());
            }
        }
        Err(e) => log::warn!("[Prune] Could not scan {}: {e}", env.install_dir.display()),
    }
    remove_stale_helper(&crate::paths::temp_dir_base(), &env.naming);
}

fn relaunch_args(verbose: bool) -> Vec<OsString> {
    if verbose {
        vec![OsString::from("--verbose")]
    } else {
        Vec::new()
    }
}
