//! Scripted host collaborators for tests

use std::cell::RefCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::runner::{CommandOutput, CommandRunner};
use super::spawn::Spawner;
use crate::error::{NasError, Result};

/// Records every invocation and answers from a list of rules.
///
/// A rule matches when the space-joined command line contains its pattern;
/// the first match wins and unmatched commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, Option<CommandOutput>)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, pattern: &str, output: CommandOutput) -> Self {
        self.rules.push((pattern.to_string(), Some(output)));
        self
    }

    /// Make matching commands fail to start
    pub fn unavailable(mut self, pattern: &str) -> Self {
        self.rules.push((pattern.to_string(), None));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.contains(pattern))
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());

        match self.rules.iter().find(|(pattern, _)| line.contains(pattern)) {
            Some((_, Some(output))) => Ok(output.clone()),
            Some((_, None)) => Err(NasError::Command {
                program: program.to_string(),
                reason: "not found".to_string(),
            }),
            None => Ok(CommandOutput::ok("")),
        }
    }
}

/// Records launches instead of starting processes
#[derive(Default)]
pub struct RecordingSpawner {
    fail: bool,
    launches: RefCell<Vec<(PathBuf, Vec<OsString>)>>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn launches(&self) -> Vec<(PathBuf, Vec<OsString>)> {
        self.launches.borrow().clone()
    }
}

impl Spawner for RecordingSpawner {
    fn spawn_detached(&self, program: &Path, args: &[OsString]) -> Result<()> {
        if self.fail {
            return Err(NasError::Command {
                program: program.display().to_string(),
                reason: "failed to launch".to_string(),
            });
        }
        self.launches
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        Ok(())
    }
}
