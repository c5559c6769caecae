//! Self-update
//!
//! - [`naming`]: versioned install file names
//! - [`transport`]: fetching the latest version and binaries
//! - [`prune`]: removing stale binaries
//! - [`replace`]: staging a download and the helper-driven swap

pub mod naming;
pub mod prune;
pub mod replace;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use naming::BinaryNaming;
pub use prune::prune_stale_binaries;
pub use replace::{
    ReplaceTiming, UpdateArtifact, hand_off, remove_stale_helper, run_helper, stage,
};
pub use transport::{HttpTransport, UpdateTransport};

use crate::error::Result;
use crate::version::{self, Version};

/// Result of asking the update server for its latest version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate,
    Available(Version),
}

/// Compare the server's latest version against `running`.
///
/// Only a strictly greater version counts as an update.
pub fn check_latest(transport: &dyn UpdateTransport, running: &Version) -> Result<UpdateCheck> {
    let tag = transport.fetch_latest_version_tag()?;
    let latest = version::parse(&tag)?;
    log::info!("[Update] Latest version {latest}, running {running}");

    if version::is_newer(&latest, running) {
        Ok(UpdateCheck::Available(latest))
    } else {
        Ok(UpdateCheck::UpToDate)
    }
}
