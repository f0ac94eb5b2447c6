//! Result assembly
//!
//! Combines the graph and the per-library matches into a [`QueryOutcome`].
//! "Not found" is an ordinary outcome here, carrying the same tally as a
//! successful query so callers can still say how much was searched.

use std::path::PathBuf;

use serde::Serialize;

use crate::chain::{self, Chain};
use crate::graph::{DependencyGraph, EdgeType, UnresolvedDependency};
use crate::pattern::SymbolPattern;
use crate::query::{NodeMatches, SymbolMatch};
use crate::symbol::Presence;

/// What a matching library does with the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Summary {
    DefinedOnly,
    ReferencedOnly,
    BothDefinedAndReferenced,
}

impl Summary {
    /// Summarize a non-empty match list; `None` when it is empty
    pub fn of(matches: &[SymbolMatch]) -> Option<Self> {
        let defines = matches.iter().any(|m| m.presence == Presence::Defined);
        let references = matches.iter().any(|m| m.presence == Presence::Undefined);
        match (defines, references) {
            (true, true) => Some(Summary::BothDefinedAndReferenced),
            (true, false) => Some(Summary::DefinedOnly),
            (false, true) => Some(Summary::ReferencedOnly),
            (false, false) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Summary::DefinedOnly => "defines",
            Summary::ReferencedOnly => "references",
            Summary::BothDefinedAndReferenced => "defines and references",
        }
    }
}

/// One matching library
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub display_name: String,
    pub canonical_path: PathBuf,
    pub chain: Chain,
    pub summary: Summary,
    pub matches: Vec<SymbolMatch>,
}

/// Global counters for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Distinct libraries in the closure, root included
    pub nodes_visited: usize,
    pub nodes_matching: usize,
    /// Matches that supply a definition (including weak definitions)
    pub defined: usize,
    /// Matches that only reference the symbol (including weak references)
    pub undefined: usize,
    /// Dependency edges that could not be followed
    pub unresolved_dependencies: usize,
    /// Dependency edges into libraries already discovered elsewhere
    pub shared_edges: usize,
    /// Matching lines whose binding code was not recognized
    pub unrecognized_lines: usize,
}

/// A query that found at least one matching library
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub root: PathBuf,
    pub pattern: SymbolPattern,
    /// Matching libraries in discovery order
    pub nodes: Vec<NodeReport>,
    pub tally: Tally,
    pub unresolved: Vec<UnresolvedDependency>,
}

/// A query whose pattern matched nowhere in the closure
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundReport {
    pub root: PathBuf,
    pub pattern: SymbolPattern,
    pub tally: Tally,
    pub unresolved: Vec<UnresolvedDependency>,
}

/// Final outcome of a completed query
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryOutcome {
    Found(QueryResult),
    NotFound(NotFoundReport),
}

impl QueryOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, QueryOutcome::Found(_))
    }

    pub fn tally(&self) -> &Tally {
        match self {
            QueryOutcome::Found(result) => &result.tally,
            QueryOutcome::NotFound(report) => &report.tally,
        }
    }
}

/// Build the outcome for `graph` and its per-library matches
pub fn aggregate(
    graph: &DependencyGraph,
    found: Vec<NodeMatches>,
    pattern: &SymbolPattern,
) -> QueryOutcome {
    let mut tally = Tally {
        nodes_visited: graph.node_count(),
        unresolved_dependencies: graph.unresolved().len(),
        shared_edges: graph.edge_count(EdgeType::Shared),
        ..Tally::default()
    };

    let mut nodes = Vec::new();
    for NodeMatches { node, matches } in found {
        let (Some(library), Some(summary)) = (graph.node(node), Summary::of(&matches)) else {
            continue;
        };
        for m in &matches {
            match m.presence {
                Presence::Defined => tally.defined += 1,
                Presence::Undefined => tally.undefined += 1,
            }
            if !m.code.is_recognized() {
                tally.unrecognized_lines += 1;
            }
        }
        nodes.push(NodeReport {
            display_name: library.display_name.clone(),
            canonical_path: library.canonical_path.clone(),
            chain: chain::reconstruct(graph, node),
            summary,
            matches,
        });
    }
    tally.nodes_matching = nodes.len();

    let root = graph
        .node(graph.root())
        .map(|n| n.canonical_path.clone())
        .unwrap_or_default();
    let unresolved = graph.unresolved().to_vec();

    if nodes.is_empty() {
        QueryOutcome::NotFound(NotFoundReport {
            root,
            pattern: pattern.clone(),
            tally,
            unresolved,
        })
    } else {
        QueryOutcome::Found(QueryResult {
            root,
            pattern: pattern.clone(),
            nodes,
            tally,
            unresolved,
        })
    }
}
