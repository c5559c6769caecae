//! Replace command: the update helper

use super::prepare_in;
use crate::cli::ReplaceArgs;
use crate::error::Result;
use crate::paths;
use crate::system::DetachedSpawner;
use crate::update::{self, ReplaceTiming, UpdateArtifact};
use crate::version;

pub fn run(args: ReplaceArgs, verbose: bool) -> Result<()> {
    let install_dir = paths::parent_dir(&args.target)?;
    let env = prepare_in(install_dir, paths::current_exe()?, verbose)?;
    let version = version::parse(&args.version)?;
    log::info!(
        "[Replace] Helper {} installing {version}",
        env.current_exe.display()
    );

    let artifact = UpdateArtifact {
        version,
        staged_path: args.temp,
        target_path: args.target,
    };
    let timing = ReplaceTiming::from_millis(
        env.config.update.replace_grace_ms,
        env.config.update.poll_interval_ms,
    );

    match update::run_helper(&artifact, &env.naming, timing, &DetachedSpawner) {
        Ok(outcome) => {
            log::info!(
                "[Replace] Launched {} ({} older file(s) removed)",
                outcome.target.display(),
                outcome.removed.len()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("[Replace] Update to {version} failed: {e}");
            Err(e)
        }
    }
}
