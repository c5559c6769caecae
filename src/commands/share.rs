//! Interactive share loop
//!
//! One cycle: pick a drive, provision the session, show the access details,
//! wait for Ctrl+K, tear down. After every cycle, successful or not, the
//! operator is asked whether to share another drive; declining, EOF, or
//! cancel ends the program normally.

use crate::config::Config;
use crate::error::{NasError, Result};
use crate::session::{
    AccountProvisioner, CredentialMinter, NetUserAccounts, SessionManager, ShareProvisioner,
    SmbShares, TeardownReport,
};
use crate::system::{CimDriveCatalog, DriveCatalog, HostNetwork, NetworkIdentity, SystemRunner};
use crate::ui::OperatorChannel;

#[derive(Debug)]
pub enum CycleOutcome {
    Completed(TeardownReport),
    NoVolumes,
    /// The operator backed out before anything was provisioned
    Cancelled,
}

/// Run share cycles on the host until the operator stops
pub fn run(config: &Config, operator: &mut dyn OperatorChannel) -> Result<()> {
    let mut manager = SessionManager::new(
        NetUserAccounts::new(SystemRunner, config.account.group.clone()),
        SmbShares::new(SystemRunner),
        CredentialMinter::new(config.account.username_prefix.clone()),
        config.share.clone(),
    );
    let catalog = CimDriveCatalog::new(SystemRunner);

    run_loop(&mut manager, &catalog, &HostNetwork, operator)
}

pub fn run_loop<A: AccountProvisioner, S: ShareProvisioner>(
    manager: &mut SessionManager<A, S>,
    catalog: &dyn DriveCatalog,
    network: &dyn NetworkIdentity,
    operator: &mut dyn OperatorChannel,
) -> Result<()> {
    loop {
        match run_cycle(manager, catalog, network, operator) {
            Ok(CycleOutcome::Completed(report)) => {
                if !report.is_clean() {
                    log::warn!(
                        "[Share] Cycle for {} ended with cleanup errors",
                        report.share_name
                    );
                }
            }
            Ok(CycleOutcome::NoVolumes | CycleOutcome::Cancelled) => return Ok(()),
            Err(e) if e.is_input() => {
                log::info!("[Share] Input ended ({e}), exiting");
                return Ok(());
            }
            Err(e) => {
                log::error!("[Share] Cycle failed: {e}");
                operator.notify(&format!("Error: {e}"));
            }
        }

        match operator.confirm_another() {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e) => {
                log::info!("[Share] No answer to 'share another' ({e}), exiting");
                return Ok(());
            }
        }
    }
}

/// A single provision / wait / teardown cycle.
///
/// Errors from provisioning end the cycle; by then the manager has already
/// removed anything it created.
pub fn run_cycle<A: AccountProvisioner, S: ShareProvisioner>(
    manager: &mut SessionManager<A, S>,
    catalog: &dyn DriveCatalog,
    network: &dyn NetworkIdentity,
    operator: &mut dyn OperatorChannel,
) -> Result<CycleOutcome> {
    let volumes = catalog.list_sharable_volumes()?;
    if volumes.is_empty() {
        operator.notify("No drives detected.");
        return Ok(CycleOutcome::NoVolumes);
    }

    let Some(index) = operator.select_volume(&volumes)? else {
        return Ok(CycleOutcome::Cancelled);
    };
    let volume = volumes.get(index).ok_or_else(|| NasError::Input {
        message: format!("no drive at position {index}"),
    })?;
    log::info!("[Share] Selected {volume}");

    let ip = network.primary_address();
    let addresses = network.all_addresses();
    let session = manager.provision(volume, ip)?.clone();
    operator.show_session(&session, &addresses);

    // The share must not outlive a broken console, so any failure here
    // still leads to teardown.
    if let Err(e) = operator.wait_for_stop() {
        log::warn!("[Share] Stop wait failed, tearing down: {e}");
    }

    let report = manager.teardown()?;
    if report.is_clean() {
        operator.notify(&format!(
            "Share {} and user {} removed.",
            report.share_name, report.username
        ));
    } else {
        if let Some(ref e) = report.share_error {
            operator.notify(&format!("Error removing SMB share: {e}"));
        }
        if let Some(ref e) = report.account_error {
            operator.notify(&format!("Error deleting temp user: {e}"));
        }
    }
    Ok(CycleOutcome::Completed(report))
}
