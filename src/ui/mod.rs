//! Operator-facing terminal layer
//!
//! All interaction with the person at the keyboard goes through the
//! [`OperatorChannel`] trait so the share loop and update flow can be driven
//! by scripted operators in tests.

pub mod display;
pub mod progress;

pub use progress::DownloadProgress;

use std::io;

use console::{Key, Term};
use inquire::{Confirm, Select};

use crate::error::{NasError, Result};
use crate::session::Session;
use crate::system::Volume;
use crate::version::Version;

/// Key that ends an active share (Ctrl+K)
pub const STOP_KEY: char = '\u{b}';

pub trait OperatorChannel {
    /// Pick one of `volumes`; `None` when the operator backs out
    fn select_volume(&mut self, volumes: &[Volume]) -> Result<Option<usize>>;

    /// Ask before downloading `latest`
    fn confirm_update(&mut self, latest: &Version, running: &Version) -> Result<bool>;

    /// Show how to reach an active share
    fn show_session(&mut self, session: &Session, addresses: &[String]);

    /// Block until the stop key is pressed
    fn wait_for_stop(&mut self) -> Result<()>;

    /// Ask whether to run another share cycle
    fn confirm_another(&mut self) -> Result<bool>;

    /// One-line status message
    fn notify(&mut self, message: &str);
}

/// Interactive operator on the attached console
pub struct TerminalOperator {
    term: Term,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorChannel for TerminalOperator {
    fn select_volume(&mut self, volumes: &[Volume]) -> Result<Option<usize>> {
        let items: Vec<String> = volumes.iter().map(ToString::to_string).collect();
        let selection = Select::new("Select a drive to share", items)
            .with_starting_cursor(0)
            .with_page_size(10)
            .without_filtering()
            .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
            .raw_prompt_skippable()?;
        Ok(selection.map(|option| option.index))
    }

    fn confirm_update(&mut self, latest: &Version, running: &Version) -> Result<bool> {
        let answer = Confirm::new(&format!(
            "Update available: {latest} (current: {running}). Update now?"
        ))
        .with_default(false)
        .with_help_message("The program restarts on the new version after the download")
        .prompt()?;
        Ok(answer)
    }

    fn show_session(&mut self, session: &Session, addresses: &[String]) {
        display::print_access_instructions(session, addresses);
    }

    fn wait_for_stop(&mut self) -> Result<()> {
        let term = &self.term;
        wait_for_stop_key(term.is_term(), || term.read_key())
    }

    fn confirm_another(&mut self) -> Result<bool> {
        let answer = Confirm::new("Share another drive?")
            .with_default(false)
            .prompt_skippable()?;
        Ok(answer.unwrap_or(false))
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Read keys until [`STOP_KEY`] arrives.
///
/// Without a terminal no key can ever arrive (reads return `Key::Unknown`
/// immediately), so that case is an input error rather than a wait.
fn wait_for_stop_key(
    interactive: bool,
    mut read_key: impl FnMut() -> io::Result<Key>,
) -> Result<()> {
    if !interactive {
        return Err(NasError::Input {
            message: "no terminal to read the stop key from".to_string(),
        });
    }
    loop {
        let key = read_key().map_err(|e| NasError::Input {
            message: format!("reading key: {e}"),
        })?;
        if key == Key::Char(STOP_KEY) {
            return Ok(());
        }
    }
}

#[cfg(test)]
pub mod testing;
