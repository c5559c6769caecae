//! Fire-and-forget process launch
//!
//! The spawned process is never waited on; the caller usually exits right
//! after.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{NasError, Result};

pub trait Spawner {
    fn spawn_detached(&self, program: &Path, args: &[OsString]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn_detached(&self, program: &Path, args: &[OsString]) -> Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Detach from this console so the child outlives us
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            command.creation_flags(CREATE_NEW_PROCESS_GROUP | DETACHED_PROCESS);
        }

        command.spawn().map_err(|e| NasError::Command {
            program: program.display().to_string(),
            reason: format!("failed to launch: {e}"),
        })?;

        log::info!("[Spawn] Launched {}", program.display());
        Ok(())
    }
}
