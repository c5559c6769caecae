//! CLI definitions using clap derive API
//!
//! Without a subcommand the program runs interactively. The subcommands are
//! internal:
//! - replace: update helper mode, launched by the program itself
//! - version: build information

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod replace;

pub use replace::ReplaceArgs;

/// usb-nas-cli - share a drive over SMB with a temporary account
#[derive(Parser, Debug)]
#[command(
    name = "usb-nas-cli",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Share a local or removable drive over SMB with a temporary account",
    long_about = "usb-nas-cli shares one drive over SMB, guarded by a freshly created local \
                  account, and removes both the share and the account when you press Ctrl+K. \
                  Requires administrator privileges; it relaunches itself elevated if needed."
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Swap in a downloaded update (used by the update helper)
    #[command(hide = true)]
    Replace(ReplaceArgs),

    /// Show version information
    #[command(hide = true)]
    Version,
}
