//! Presence checks for the external tools

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ToolPaths;
use crate::error::{FindError, Result};

/// Directories searched after `PATH`; `ldconfig` usually lives here and
/// unprivileged users often lack them on `PATH`.
const SBIN_DIRS: [&str; 2] = ["/sbin", "/usr/sbin"];

/// Locate `program` as an executable file.
///
/// A program containing a path separator is checked as-is; a bare name is
/// searched on `PATH`, then in the sbin directories.
pub fn locate(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return is_executable(program).then(|| program.to_path_buf());
    }

    let path_dirs = env::var_os("PATH")
        .map(|p| env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();

    path_dirs
        .into_iter()
        .chain(SBIN_DIRS.iter().map(PathBuf::from))
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

/// Fail with [`FindError::CollaboratorUnavailable`] naming the first missing tool
pub fn ensure_available(tools: &ToolPaths) -> Result<()> {
    for (label, program) in tools.entries() {
        match locate(program) {
            Some(found) => debug!(tool = label, path = %found.display(), "tool available"),
            None => {
                return Err(FindError::CollaboratorUnavailable {
                    tool: format!("{} ({})", label, program.display()),
                })
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
