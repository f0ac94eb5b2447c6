//! Graph data structures for the dependency closure
//!
//! Uses `petgraph::StableGraph` so node indices double as discovery order:
//! nodes are only ever appended, never removed, during a run.
//!
//! Two edge kinds coexist. `Discovery` edges form a spanning tree rooted at
//! the query root: every non-root node has exactly one, pointing from the
//! node that first reached it. `Shared` edges record every later dependency
//! on an already-known node; they are kept for diagnostics and never
//! consulted when reconstructing chains.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

/// One shared library or executable in the closure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryNode {
    /// Symlink-resolved absolute path; the identity of the node
    pub canonical_path: PathBuf,
    /// Final path component, for display only
    pub display_name: String,
}

impl LibraryNode {
    pub fn new(canonical_path: PathBuf) -> Self {
        let display_name = canonical_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| canonical_path.display().to_string());
        Self {
            canonical_path,
            display_name,
        }
    }
}

/// An edge between a library and one of its dependencies
#[derive(Debug, Clone, Serialize)]
pub struct Edge {
    pub edge_type: EdgeType,
}

/// Types of relationships between libraries
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EdgeType {
    /// Parent first reached child; part of the spanning tree
    Discovery,
    /// Parent also depends on child, which was already discovered elsewhere
    Shared,
}

/// A direct dependency that could not be followed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDependency {
    /// Library that asked for it
    pub needed_by: PathBuf,
    /// Name as recorded in the library
    pub name: String,
    /// Path the collaborator resolved it to, if any (it did not exist)
    pub attempted_path: Option<PathBuf>,
}

/// The dependency closure of one root
///
/// Owned by the traversal while it is being built, then handed read-only to
/// the query and report stages.
#[derive(Debug)]
pub struct DependencyGraph {
    inner: StableGraph<LibraryNode, Edge>,
    /// Canonical path to node, for O(1) insert-if-absent
    by_path: HashMap<PathBuf, NodeIndex>,
    root: NodeIndex,
    unresolved: Vec<UnresolvedDependency>,
}

impl DependencyGraph {
    /// Create a graph containing only the root
    pub fn new(root: LibraryNode) -> Self {
        let mut inner = StableGraph::new();
        let path = root.canonical_path.clone();
        let root = inner.add_node(root);
        let mut by_path = HashMap::new();
        by_path.insert(path, root);
        Self {
            inner,
            by_path,
            root,
            unresolved: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Record that `parent` depends on `child`.
    ///
    /// Returns the new index when `child` had not been seen, so the caller can
    /// enqueue it. An already-known child only gains a `Shared` edge (none for
    /// a self-reference) and `None` is returned.
    pub fn insert_if_absent(&mut self, parent: NodeIndex, child: LibraryNode) -> Option<NodeIndex> {
        if let Some(&existing) = self.by_path.get(&child.canonical_path) {
            if existing != parent {
                self.inner.add_edge(
                    parent,
                    existing,
                    Edge {
                        edge_type: EdgeType::Shared,
                    },
                );
            }
            return None;
        }

        let path = child.canonical_path.clone();
        let idx = self.inner.add_node(child);
        self.by_path.insert(path, idx);
        self.inner.add_edge(
            parent,
            idx,
            Edge {
                edge_type: EdgeType::Discovery,
            },
        );
        Some(idx)
    }

    pub fn record_unresolved(&mut self, dependency: UnresolvedDependency) {
        self.unresolved.push(dependency);
    }

    /// The first discoverer of `idx`; `None` for the root
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .find(|e| e.weight().edge_type == EdgeType::Discovery)
            .map(|e| e.source())
    }

    /// Get a node by index
    pub fn node(&self, idx: NodeIndex) -> Option<&LibraryNode> {
        self.inner.node_weight(idx)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeIndex> {
        self.by_path.get(path).copied()
    }

    /// Number of distinct libraries visited
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count edges of one kind
    pub fn edge_count(&self, edge_type: EdgeType) -> usize {
        self.inner
            .edge_weights()
            .filter(|e| e.edge_type == edge_type)
            .count()
    }

    /// Node indices in discovery order (root first)
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    /// Node weights in discovery order (root first)
    pub fn nodes(&self) -> impl Iterator<Item = &LibraryNode> {
        self.inner.node_weights()
    }

    pub fn unresolved(&self) -> &[UnresolvedDependency] {
        &self.unresolved
    }
}
