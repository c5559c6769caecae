//! Replace command arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ReplaceArgs {
    /// Staged download to install
    pub temp: PathBuf,

    /// Final versioned install path
    pub target: PathBuf,

    /// Version being installed
    pub version: String,
}
