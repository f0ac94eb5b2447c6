//! Query configuration
//!
//! Two plain structs: [`QueryOptions`] tunes a single query and [`ToolPaths`]
//! names the external programs backing the system collaborators. Both have
//! defaults that work on a stock Linux install; the CLI overrides them from
//! flags and environment variables.

use std::path::PathBuf;

/// Per-query knobs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Ask the symbol lister for demangled names
    pub demangle: bool,
    /// Worker-pool size for parallel expansion and symbol lookup.
    ///
    /// `None` lets rayon pick (one worker per CPU). `Some(0)` is treated the
    /// same way.
    pub jobs: Option<usize>,
}

impl QueryOptions {
    /// Options with demangling switched on
    pub fn demangled() -> Self {
        Self {
            demangle: true,
            ..Self::default()
        }
    }

    /// Effective worker count to hand to rayon (0 means "rayon default")
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or(0)
    }
}

/// Locations of the external tools used by [`crate::tools::SystemTools`]
///
/// Each entry is either a bare program name (looked up on `PATH`) or an
/// explicit path to an executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub nm: PathBuf,
    pub readelf: PathBuf,
    pub ldd: PathBuf,
    pub ldconfig: PathBuf,
}

impl ToolPaths {
    /// All tools as `(label, program)` pairs, in probe order
    pub fn entries(&self) -> [(&'static str, &PathBuf); 4] {
        [
            ("ldconfig", &self.ldconfig),
            ("readelf", &self.readelf),
            ("ldd", &self.ldd),
            ("nm", &self.nm),
        ]
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            nm: PathBuf::from("nm"),
            readelf: PathBuf::from("readelf"),
            ldd: PathBuf::from("ldd"),
            ldconfig: PathBuf::from("ldconfig"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = QueryOptions::default();
        assert!(!opts.demangle);
        assert_eq!(opts.worker_count(), 0);
    }

    #[test]
    fn test_demangled_options() {
        let opts = QueryOptions::demangled();
        assert!(opts.demangle);
        assert_eq!(opts.jobs, None);
    }

    #[test]
    fn test_default_tool_names() {
        let tools = ToolPaths::default();
        let labels: Vec<&str> = tools.entries().iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["ldconfig", "readelf", "ldd", "nm"]);
        assert_eq!(tools.nm, PathBuf::from("nm"));
    }
}
