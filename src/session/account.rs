//! Temporary local accounts via `net user` / `net localgroup`

use crate::error::{Result, account};
use crate::system::CommandRunner;

/// NET error 1378: already a member of the group
const ALREADY_MEMBER: u32 = 1378;
/// NET error 2221: the user name could not be found
const USER_NOT_FOUND: u32 = 2221;
/// NET error 2224: the account already exists
const ACCOUNT_EXISTS: u32 = 2224;

/// Creates and removes scoped local accounts
pub trait AccountProvisioner {
    /// Create `name` and add it to the access group.
    ///
    /// An existing account with the same name is an error, never reused.
    fn create(&self, name: &str, password: &str) -> Result<()>;

    /// Remove `name`; an absent account is not an error
    fn remove(&self, name: &str) -> Result<()>;
}

/// Account provisioner backed by the `net` command
pub struct NetUserAccounts<R> {
    runner: R,
    group: String,
}

impl<R: CommandRunner> NetUserAccounts<R> {
    pub fn new(runner: R, group: impl Into<String>) -> Self {
        Self {
            runner,
            group: group.into(),
        }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn join_group(&self, name: &str) -> Result<()> {
        let output = self
            .runner
            .run("net", &["localgroup", &self.group, name, "/add"])?;

        if output.success || output.reports_net_error(ALREADY_MEMBER) {
            return Ok(());
        }
        Err(account::failed(
            name,
            format!("could not join '{}': {}", self.group, output.describe()),
        ))
    }
}

impl<R: CommandRunner> AccountProvisioner for NetUserAccounts<R> {
    fn create(&self, name: &str, password: &str) -> Result<()> {
        log::info!("[Account] Creating temp user: {name}");
        let output = self.runner.run("net", &["user", name, password, "/add"])?;

        if !output.success {
            if output.reports_net_error(ACCOUNT_EXISTS) {
                return Err(account::exists(name));
            }
            return Err(account::failed(name, output.describe()));
        }

        // Do not leave a half-configured account behind
        if let Err(e) = self.join_group(name) {
            if let Err(cleanup) = self.remove(name) {
                log::error!("[Account] Could not remove {name} after failed group join: {cleanup}");
            }
            return Err(e);
        }

        log::debug!("[Account] {name} is a member of '{}'", self.group);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        log::info!("[Account] Deleting temp user: {name}");
        let output = self.runner.run("net", &["user", name, "/delete"])?;

        if output.success {
            return Ok(());
        }
        if output.reports_net_error(USER_NOT_FOUND) {
            log::debug!("[Account] {name} was already absent");
            return Ok(());
        }
        Err(account::failed(name, output.describe()))
    }
}
