//! Shared fixtures for integration tests
//!
//! `Fixture` lays out empty library files in a temp directory and answers the
//! collaborator calls from in-memory tables keyed by file name.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use symtrail_core::tools::{DependencyLister, DirectDependency, LinkerCache, SymbolTableLister};
use symtrail_core::{QueryOptions, SymbolFinder};
use tempfile::TempDir;

pub struct Fixture {
    dir: TempDir,
    deps: HashMap<String, Vec<DirectDependency>>,
    symbols: HashMap<String, Vec<String>>,
}

impl Fixture {
    pub fn new(libs: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for lib in libs {
            File::create(dir.path().join(lib)).unwrap();
        }
        Self {
            dir,
            deps: HashMap::new(),
            symbols: HashMap::new(),
        }
    }

    pub fn depends(mut self, lib: &str, on: &[&str]) -> Self {
        let base = self.dir.path().to_path_buf();
        let entry = self.deps.entry(lib.to_string()).or_default();
        for dep in on {
            entry.push(DirectDependency::resolved(*dep, base.join(dep)));
        }
        self
    }

    pub fn not_found(mut self, lib: &str, name: &str) -> Self {
        self.deps
            .entry(lib.to_string())
            .or_default()
            .push(DirectDependency::unresolved(name));
        self
    }

    pub fn exports(mut self, lib: &str, lines: &[&str]) -> Self {
        self.symbols
            .entry(lib.to_string())
            .or_default()
            .extend(lines.iter().map(|l| l.to_string()));
        self
    }

    pub fn root(&self, lib: &str) -> String {
        self.dir.path().join(lib).to_string_lossy().into_owned()
    }

    pub fn canonical(&self, lib: &str) -> PathBuf {
        self.dir.path().join(lib).canonicalize().unwrap()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn finder(&self, options: QueryOptions) -> SymbolFinder<'_> {
        SymbolFinder::new(self, self, self, options)
    }
}

fn key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl LinkerCache for Fixture {
    fn resolve_bare_name(&self, name: &str) -> Option<PathBuf> {
        let candidate = self.dir.path().join(name);
        candidate.exists().then_some(candidate)
    }
}

impl DependencyLister for Fixture {
    fn list_direct_dependencies(&self, path: &Path) -> anyhow::Result<Vec<DirectDependency>> {
        Ok(self.deps.get(&key(path)).cloned().unwrap_or_default())
    }
}

impl SymbolTableLister for Fixture {
    fn list_symbol_table(&self, path: &Path, _demangle: bool) -> anyhow::Result<Vec<String>> {
        Ok(self.symbols.get(&key(path)).cloned().unwrap_or_default())
    }
}
