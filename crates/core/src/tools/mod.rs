//! External collaborators
//!
//! The traversal and query engine never inspect binaries themselves. They
//! talk to three capabilities, each a small `Sync` trait so lookups can fan
//! out across the worker pool:
//!
//! - [`LinkerCache`] resolves a bare soname through the dynamic-linker cache
//! - [`DependencyLister`] lists a library's direct `DT_NEEDED` entries
//! - [`SymbolTableLister`] dumps the dynamic symbol table as `nm` text
//!
//! [`SystemTools`] bundles the implementations backed by `ldconfig`,
//! `readelf` + `ldd`, and `nm`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Context;

use crate::config::ToolPaths;

pub mod deps;
pub mod ldconfig;
pub mod nm;
pub mod probe;

pub use deps::ElfDependencies;
pub use ldconfig::Ldconfig;
pub use nm::Nm;

/// One direct link-time dependency of a library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDependency {
    /// Name as recorded in the library (e.g. `libc.so.6`)
    pub name: String,
    /// Absolute path the loader would use, `None` when "not found"
    pub path: Option<PathBuf>,
}

impl DirectDependency {
    pub fn resolved(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }
}

/// Dynamic-linker cache lookup (`ldconfig -p`)
pub trait LinkerCache: Sync {
    /// Absolute path for a bare library name, if the cache knows it
    fn resolve_bare_name(&self, name: &str) -> Option<PathBuf>;
}

/// Direct dependency enumeration
pub trait DependencyLister: Sync {
    /// Direct dependencies of `path` in link order.
    ///
    /// Unresolvable entries are returned with `path: None`, not as errors.
    fn list_direct_dependencies(&self, path: &Path) -> anyhow::Result<Vec<DirectDependency>>;
}

/// Dynamic symbol table extraction
pub trait SymbolTableLister: Sync {
    /// Raw symbol-table lines for `path`, in `nm` BSD format
    fn list_symbol_table(&self, path: &Path, demangle: bool) -> anyhow::Result<Vec<String>>;
}

/// Tool-backed implementations of all three collaborators
#[derive(Debug, Clone)]
pub struct SystemTools {
    pub cache: Ldconfig,
    pub deps: ElfDependencies,
    pub symbols: Nm,
}

impl SystemTools {
    pub fn new(paths: &ToolPaths) -> Self {
        Self {
            cache: Ldconfig::new(paths.ldconfig.clone()),
            deps: ElfDependencies::new(paths.readelf.clone(), paths.ldd.clone()),
            symbols: Nm::new(paths.nm.clone()),
        }
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new(&ToolPaths::default())
    }
}

/// Run `program args...`, capturing output.
///
/// Only a failure to spawn is an error; the exit status is left to the caller.
pub(crate) fn run_tool<I, S>(program: &Path, args: I) -> anyhow::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", program.display()))
}

/// Lossy stdout lines of a finished command
pub(crate) fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

/// First line of stderr, for warnings
pub(crate) fn stderr_summary(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
