//! Administrator check and elevated relaunch
//!
//! `net session` only succeeds in an elevated process, which makes it a cheap
//! probe that needs no extra API bindings.

use std::ffi::OsString;
use std::path::Path;

use super::runner::{CommandRunner, powershell_quote};
use crate::error::{NasError, Result};

/// Start-Process output when the UAC prompt is dismissed
const UAC_DECLINED: &str = "canceled by the user";

pub struct PrivilegeChecker<R> {
    runner: R,
}

/// Outcome of [`ensure_elevated`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Already elevated, carry on
    Elevated,
    /// An elevated copy was started; this process should exit
    Relaunched,
}

impl<R: CommandRunner> PrivilegeChecker<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn is_elevated(&self) -> bool {
        self.runner
            .run("net", &["session"])
            .is_ok_and(|output| output.success)
    }

    /// Start `exe` again through the UAC prompt
    pub fn relaunch_elevated(&self, exe: &Path, args: &[OsString]) -> Result<()> {
        let mut script = format!(
            "Start-Process -FilePath {} -Verb RunAs",
            powershell_quote(&exe.display().to_string())
        );
        if !args.is_empty() {
            let list = args
                .iter()
                .map(|a| powershell_quote(&a.to_string_lossy()))
                .collect::<Vec<_>>()
                .join(",");
            script.push_str(" -ArgumentList ");
            script.push_str(&list);
        }

        let output = self.runner.powershell(&script)?;
        if output.success {
            Ok(())
        } else if output.mentions(UAC_DECLINED) {
            Err(NasError::NotElevated)
        } else {
            Err(NasError::ElevationFailed {
                reason: output.describe(),
            })
        }
    }
}

/// Make sure the process is elevated, relaunching through UAC if it is not
pub fn ensure_elevated<R: CommandRunner>(
    checker: &PrivilegeChecker<R>,
    exe: &Path,
    args: &[OsString],
) -> Result<Elevation> {
    if checker.is_elevated() {
        return Ok(Elevation::Elevated);
    }

    log::info!("[Privilege] Not running as administrator. Restarting with elevated privileges...");
    checker.relaunch_elevated(exe, args)?;
    Ok(Elevation::Relaunched)
}
