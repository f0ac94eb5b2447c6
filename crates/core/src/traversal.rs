//! Breadth-first construction of the dependency closure
//!
//! The traversal is level-synchronous. Every node in the current frontier is
//! expanded concurrently (dependency listing plus canonicalization, the slow
//! part), then the results are merged into the graph one by one in frontier
//! order. That merge is the only place the seen-set changes, which makes the
//! discovery order, and so every first-discoverer parent, identical to a plain
//! FIFO traversal no matter how many workers ran the expansions.

use std::path::{Path, PathBuf};

use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::canonical::PathCanonicalizer;
use crate::error::{FindError, Result};
use crate::graph::{DependencyGraph, LibraryNode, UnresolvedDependency};
use crate::tools::{DependencyLister, LinkerCache};

/// Outcome of following one direct dependency
#[derive(Debug)]
enum Expanded {
    Found(PathBuf),
    Unresolved {
        name: String,
        attempted_path: Option<PathBuf>,
    },
}

/// Builds a [`DependencyGraph`] from a root reference
pub struct DependencyGraphBuilder<'a> {
    canonicalizer: PathCanonicalizer<'a>,
    lister: &'a dyn DependencyLister,
}

impl<'a> DependencyGraphBuilder<'a> {
    pub fn new(cache: &'a dyn LinkerCache, lister: &'a dyn DependencyLister) -> Self {
        Self {
            canonicalizer: PathCanonicalizer::new(cache),
            lister,
        }
    }

    /// Canonicalize `root` and traverse its full dependency closure.
    ///
    /// Parallel expansion uses the current rayon pool; wrap the call in
    /// `ThreadPool::install` to bound it.
    pub fn build(&self, root: &str) -> Result<DependencyGraph> {
        let root_path = self.canonicalizer.canonicalize(root);
        if !root_path.exists() {
            return Err(FindError::RootNotFound { path: root_path });
        }
        debug!(root = %root_path.display(), "starting traversal");

        let mut graph = DependencyGraph::new(LibraryNode::new(root_path));
        let mut frontier = vec![graph.root()];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            let jobs: Vec<(NodeIndex, PathBuf)> = frontier
                .iter()
                .filter_map(|&idx| graph.node(idx).map(|n| (idx, n.canonical_path.clone())))
                .collect();

            let expansions = jobs
                .par_iter()
                .map(|(idx, path)| self.expand(path).map(|deps| (*idx, path, deps)))
                .collect::<Result<Vec<_>>>()?;

            let mut next = Vec::new();
            for (parent, parent_path, deps) in expansions {
                for dep in deps {
                    match dep {
                        Expanded::Found(path) => {
                            let node = LibraryNode::new(path);
                            if let Some(child) = graph.insert_if_absent(parent, node) {
                                next.push(child);
                            }
                        }
                        Expanded::Unresolved {
                            name,
                            attempted_path,
                        } => {
                            warn!(
                                needed_by = %parent_path.display(),
                                dependency = %name,
                                "skipping unresolved dependency"
                            );
                            graph.record_unresolved(UnresolvedDependency {
                                needed_by: parent_path.clone(),
                                name,
                                attempted_path,
                            });
                        }
                    }
                }
            }

            debug!(depth, discovered = next.len(), "level expanded");
            frontier = next;
            depth += 1;
        }

        Ok(graph)
    }

    /// List and canonicalize the direct dependencies of one library
    fn expand(&self, path: &Path) -> Result<Vec<Expanded>> {
        let deps = self
            .lister
            .list_direct_dependencies(path)
            .map_err(|source| FindError::CollaboratorFailed {
                operation: "dependency listing",
                path: path.to_path_buf(),
                source,
            })?;
        debug!(library = %path.display(), direct = deps.len(), "listed dependencies");

        Ok(deps
            .into_iter()
            .map(|dep| match dep.path {
                None => Expanded::Unresolved {
                    name: dep.name,
                    attempted_path: None,
                },
                Some(resolved) => {
                    let canonical = self.canonicalizer.canonicalize_path(&resolved);
                    if canonical.exists() {
                        Expanded::Found(canonical)
                    } else {
                        Expanded::Unresolved {
                            name: dep.name,
                            attempted_path: Some(resolved),
                        }
                    }
                }
            })
            .collect())
    }
}
