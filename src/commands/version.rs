//! Version command implementation

use crate::error::Result;
use crate::version::CURRENT;

/// Run version command
pub fn run() -> Result<()> {
    println!("usb-nas-cli {CURRENT}");
    println!();
    println!("Build info:");
    println!("  Minimum Rust version: {}", rustc_version());
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn rustc_version() -> &'static str {
    env!("CARGO_PKG_RUST_VERSION")
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
