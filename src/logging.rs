//! Log stream setup
//!
//! Records go to an append-mode file; stderr is used when the file cannot be
//! opened. `RUST_LOG` takes precedence over the default filter.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Where log records ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    File,
    Stderr { reason: String },
}

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Install the global logger. Safe to call once per process.
pub fn init(log_file: &Path, verbose: bool) -> LogSink {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter(verbose)));
    builder.format_timestamp_secs();

    let sink = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
            LogSink::File
        }
        Err(e) => {
            builder.target(Target::Stderr);
            LogSink::Stderr {
                reason: format!("{}: {e}", log_file.display()),
            }
        }
    };

    // A logger may already be installed, e.g. in tests
    let _ = builder.try_init();
    sink
}
