//! Command implementations for usb-nas-cli

pub mod replace;
pub mod share;
pub mod start;
pub mod update;
pub mod version;

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::logging::{self, LogSink};
use crate::paths;
use crate::update::BinaryNaming;
use crate::version::Version;

/// Process-wide context shared by every command
#[derive(Debug, Clone)]
pub struct Environment {
    pub config: Config,
    pub running: Version,
    pub naming: BinaryNaming,
    pub install_dir: PathBuf,
    pub current_exe: PathBuf,
}

/// Locate the install, load configuration and start logging
pub fn prepare(verbose: bool) -> Result<Environment> {
    let current_exe = paths::current_exe()?;
    let install_dir = paths::parent_dir(&current_exe)?;
    prepare_in(install_dir, current_exe, verbose)
}

/// Like [`prepare`] for an install directory other than the executable's,
/// as when the update helper runs from the temp directory
pub fn prepare_in(install_dir: PathBuf, current_exe: PathBuf, verbose: bool) -> Result<Environment> {
    let config = Config::load(&install_dir)?;

    if let LogSink::Stderr { reason } = logging::init(&config.log_file(&install_dir), verbose) {
        eprintln!("Warning: could not open log file ({reason}), logging to stderr");
    }

    Ok(Environment {
        running: Version::current()?,
        naming: BinaryNaming::from_config(&config.update),
        config,
        install_dir,
        current_exe,
    })
}
