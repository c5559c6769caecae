//! SMB shares via the `SmbShare` PowerShell cmdlets

use crate::error::{Result, share};
use crate::system::{CommandRunner, powershell_quote};

/// Message `Remove-SmbShare` prints when no share has the given name
const SHARE_NOT_FOUND: &str = "No MSFT_SMBShare objects found";

/// Creates and removes network shares
pub trait ShareProvisioner {
    /// Share `path` as `name` with full access for every grantee.
    ///
    /// A stale share of the same name is removed first.
    fn create(&self, name: &str, path: &str, grantees: &[String]) -> Result<()>;

    /// Remove share `name`; an absent share is not an error
    fn remove(&self, name: &str) -> Result<()>;
}

/// Share provisioner backed by `New-SmbShare` / `Remove-SmbShare`
pub struct SmbShares<R> {
    runner: R,
}

impl<R: CommandRunner> SmbShares<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> ShareProvisioner for SmbShares<R> {
    fn create(&self, name: &str, path: &str, grantees: &[String]) -> Result<()> {
        if grantees.is_empty() {
            return Err(share::failed(name, "no grantees given"));
        }

        // A crashed previous run may have left the share behind
        if let Err(e) = self.remove(name) {
            log::warn!("[Share] Could not clear stale share {name}: {e}");
        }

        let full_access = grantees
            .iter()
            .map(|g| powershell_quote(g))
            .collect::<Vec<_>>()
            .join(",");
        log::info!("[Share] Creating SMB share: {name} -> {path}, FullAccess={}", grantees.join(","));

        let script = format!(
            "New-SmbShare -Name {} -Path {} -FullAccess {full_access} -ErrorAction Stop",
            powershell_quote(name),
            powershell_quote(path),
        );
        let output = self.runner.powershell(&script)?;
        if output.success {
            Ok(())
        } else {
            Err(share::failed(name, output.describe()))
        }
    }

    fn remove(&self, name: &str) -> Result<()> {
        log::info!("[Share] Removing SMB share: {name}");
        let script = format!(
            "Remove-SmbShare -Name {} -Force -ErrorAction Stop",
            powershell_quote(name)
        );
        let output = self.runner.powershell(&script)?;

        if output.success {
            return Ok(());
        }
        if output.mentions(SHARE_NOT_FOUND) {
            log::debug!("[Share] {name} was already absent");
            return Ok(());
        }
        Err(share::failed(name, output.describe()))
    }
}
