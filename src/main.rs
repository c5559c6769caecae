//! usb-nas-cli - temporary SMB share for a single drive
//!
//! Shares one local or removable drive over SMB, guarded by a freshly minted
//! local account, and removes both when the operator presses Ctrl+K. Keeps
//! itself current through a helper-driven self-update.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod paths;
mod session;
mod system;
mod ui;
mod update;
mod version;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::start::run(cli.verbose),
        Some(Commands::Replace(args)) => commands::replace::run(args, cli.verbose),
        Some(Commands::Version) => commands::version::run(),
    };

    if let Err(e) = result {
        log::error!("[Main] Fatal: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
