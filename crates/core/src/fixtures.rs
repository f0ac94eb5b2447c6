//! In-memory collaborators over a temporary directory of empty "libraries"

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::config::QueryOptions;
use crate::finder::SymbolFinder;
use crate::tools::{DependencyLister, DirectDependency, LinkerCache, SymbolTableLister};
use crate::traversal::DependencyGraphBuilder;

/// A temp directory holding one empty file per library name
pub struct LibTree {
    dir: TempDir,
}

impl LibTree {
    pub fn new(names: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn path_str(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    pub fn canonical(&self, name: &str) -> PathBuf {
        self.path(name).canonicalize().unwrap()
    }

    #[cfg(unix)]
    pub fn symlink(&self, link: &str, target: &str) {
        std::os::unix::fs::symlink(self.path(target), self.path(link)).unwrap();
    }
}

/// Dependencies and symbol tables keyed by library file name
///
/// The linker cache is always empty here; bare-name resolution is covered by
/// the integration fixture.
pub struct FakeSystem {
    dir: PathBuf,
    deps: HashMap<String, Vec<DirectDependency>>,
    symbols: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    broken_symbols: HashSet<String>,
    listing_calls: AtomicUsize,
    symbol_calls: AtomicUsize,
}

impl FakeSystem {
    pub fn new(tree: &LibTree) -> Self {
        Self {
            dir: tree.dir.path().to_path_buf(),
            deps: HashMap::new(),
            symbols: HashMap::new(),
            failing: HashSet::new(),
            broken_symbols: HashSet::new(),
            listing_calls: AtomicUsize::new(0),
            symbol_calls: AtomicUsize::new(0),
        }
    }

    pub fn depends(mut self, lib: &str, on: &[&str]) -> Self {
        let entry = self.deps.entry(lib.to_string()).or_default();
        for dep in on {
            entry.push(DirectDependency::resolved(*dep, self.dir.join(dep)));
        }
        self
    }

    pub fn unresolved(mut self, lib: &str, name: &str) -> Self {
        self.deps
            .entry(lib.to_string())
            .or_default()
            .push(DirectDependency::unresolved(name));
        self
    }

    /// A dependency that resolves to a path with no file behind it
    pub fn missing(mut self, lib: &str, name: &str) -> Self {
        let path = self.dir.join("gone").join(name);
        self.deps
            .entry(lib.to_string())
            .or_default()
            .push(DirectDependency::resolved(name, path));
        self
    }

    pub fn symbols(mut self, lib: &str, lines: &[&str]) -> Self {
        self.symbols
            .insert(lib.to_string(), lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn failing(mut self, lib: &str) -> Self {
        self.failing.insert(lib.to_string());
        self
    }

    pub fn broken_symbols(mut self, lib: &str) -> Self {
        self.broken_symbols.insert(lib.to_string());
        self
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn symbol_calls(&self) -> usize {
        self.symbol_calls.load(Ordering::SeqCst)
    }

    pub fn builder(&self) -> DependencyGraphBuilder<'_> {
        DependencyGraphBuilder::new(self, self)
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

impl LinkerCache for FakeSystem {
    fn resolve_bare_name(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

impl DependencyLister for FakeSystem {
    fn list_direct_dependencies(&self, path: &Path) -> anyhow::Result<Vec<DirectDependency>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let lib = key(path);
        if self.failing.contains(&lib) {
            anyhow::bail!("cannot inspect {}", lib);
        }
        Ok(self.deps.get(&lib).cloned().unwrap_or_default())
    }
}

impl SymbolTableLister for FakeSystem {
    fn list_symbol_table(&self, path: &Path, demangle: bool) -> anyhow::Result<Vec<String>> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        let lib = key(path);
        if self.broken_symbols.contains(&lib) {
            anyhow::bail!("no readable symbol table in {}", lib);
        }
        let lines = self.symbols.get(&lib).cloned().unwrap_or_default();
        if demangle {
            Ok(lines.into_iter().map(|l| l.replace("_Z3foov", "foo()")).collect())
        } else {
            Ok(lines)
        }
    }
}
