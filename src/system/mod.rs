//! Host collaborators
//!
//! Thin wrappers over the operating system that the share and update logic
//! call into:
//! - [`runner`]: running `net` / `powershell` and capturing their output
//! - [`spawn`]: fire-and-forget process launch
//! - [`privilege`]: administrator check and elevated relaunch
//! - [`drives`]: sharable volume enumeration
//! - [`network`]: local addresses for access instructions

pub mod drives;
pub mod network;
pub mod privilege;
pub mod runner;
pub mod spawn;

#[cfg(test)]
pub mod testing;

pub use drives::{CimDriveCatalog, DriveCatalog, Volume};
pub use network::{HostNetwork, NetworkIdentity};
pub use privilege::{Elevation, PrivilegeChecker, ensure_elevated};
pub use runner::{CommandRunner, SystemRunner, powershell_quote};
pub use spawn::{DetachedSpawner, Spawner};
