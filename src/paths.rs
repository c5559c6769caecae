//! Locations of the running executable, its install directory, and a safe
//! temp directory base.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{NasError, Result};

/// Canonical path of the running executable, without a `\\?\` prefix on Windows
pub fn current_exe() -> Result<PathBuf> {
    let exe = env::current_exe().map_err(|e| NasError::Io {
        message: format!("Could not determine current executable path: {e}"),
    })?;
    Ok(dunce::canonicalize(&exe).unwrap_or(exe))
}

/// Parent directory of `path`, erroring for bare roots
pub fn parent_dir(path: &Path) -> Result<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| NasError::Io {
            message: format!("{} has no parent directory", path.display()),
        })
}

/// Returns a directory path suitable for temporary files.
/// Never returns a relative path, so the update helper is never copied under
/// the current working directory (e.g. when TMP=tmp).
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }

    #[test]
    fn test_current_exe_has_install_dir() {
        let exe = current_exe().unwrap();
        assert!(exe.is_absolute());
        assert_eq!(parent_dir(&exe).unwrap(), exe.parent().unwrap());
    }

    #[test]
    fn test_parent_dir_of_bare_name_fails() {
        assert!(parent_dir(Path::new("tool.exe")).is_err());
        assert_eq!(
            parent_dir(Path::new("/opt/tool.exe")).unwrap(),
            PathBuf::from("/opt")
        );
    }
}
