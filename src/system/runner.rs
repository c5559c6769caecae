//! Synchronous command execution with captured output

use std::process::Command;

use crate::error::{NasError, Result};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout and stderr joined, trimmed
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }

    /// Whether either stream contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }

    /// Whether the output reports NET error `code`, as either
    /// `System error <code>` or `NET HELPMSG <code>`
    pub fn reports_net_error(&self, code: u32) -> bool {
        self.mentions_code("System error ", code) || self.mentions_code("NET HELPMSG ", code)
    }

    fn mentions_code(&self, label: &str, code: u32) -> bool {
        let needle = format!("{label}{code}");
        [&self.stdout, &self.stderr].into_iter().any(|stream| {
            stream.match_indices(&needle).any(|(at, _)| {
                !stream[at + needle.len()..].starts_with(|c: char| c.is_ascii_digit())
            })
        })
    }

    /// Short failure description for error messages
    pub fn describe(&self) -> String {
        let status = self
            .code
            .map_or_else(|| "terminated".to_string(), |c| format!("exit code {c}"));
        let output = self.combined();
        if output.is_empty() {
            status
        } else {
            format!("{status}: {output}")
        }
    }
}

/// Runs a program to completion
///
/// Returns `Err` only when the program could not be started; a non-zero exit
/// is reported through [`CommandOutput::success`].
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a PowerShell script without loading a profile
    fn powershell(&self, script: &str) -> Result<CommandOutput> {
        self.run(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", script],
        )
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs commands on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| NasError::Command {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Quote a value as a PowerShell single-quoted string literal
pub fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
