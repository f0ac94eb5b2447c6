//! Per-library symbol lookup
//!
//! Every node of the finished graph gets exactly one symbol-table lookup.
//! Lookups are independent and each writes only its own result slot, so they
//! run in parallel on the current rayon pool. Results come back in discovery
//! order and only for libraries with at least one match.

use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{FindError, Result};
use crate::graph::DependencyGraph;
use crate::pattern::SymbolPattern;
use crate::symbol::{classify_line, BindingCode, Classification, Presence};
use crate::tools::SymbolTableLister;

/// One symbol-table line that matched the query, scoped to one library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMatch {
    /// Symbol name, demangled when requested
    pub name: String,
    pub classification: Classification,
    pub presence: Presence,
    pub code: BindingCode,
    pub address: Option<u64>,
    /// The line exactly as the lister produced it
    pub raw_line: String,
}

/// Matches for a single library; never empty
#[derive(Debug, Clone)]
pub struct NodeMatches {
    pub node: NodeIndex,
    pub matches: Vec<SymbolMatch>,
}

/// Runs the symbol query over every node of a graph
pub struct SymbolQueryEngine<'a> {
    lister: &'a dyn SymbolTableLister,
    demangle: bool,
}

impl<'a> SymbolQueryEngine<'a> {
    pub fn new(lister: &'a dyn SymbolTableLister, demangle: bool) -> Self {
        Self { lister, demangle }
    }

    /// Look up `pattern` in every library of `graph`
    pub fn query(
        &self,
        graph: &DependencyGraph,
        pattern: &SymbolPattern,
    ) -> Result<Vec<NodeMatches>> {
        let jobs: Vec<_> = graph
            .node_indices()
            .filter_map(|idx| graph.node(idx).map(|n| (idx, n)))
            .collect();

        let slots = jobs
            .par_iter()
            .map(|(idx, node)| -> Result<Option<NodeMatches>> {
                let lines = self
                    .lister
                    .list_symbol_table(&node.canonical_path, self.demangle)
                    .map_err(|source| FindError::CollaboratorFailed {
                        operation: "symbol table lookup",
                        path: node.canonical_path.clone(),
                        source,
                    })?;
                let matches = match_lines(&lines, pattern);
                debug!(
                    library = %node.display_name,
                    lines = lines.len(),
                    matched = matches.len(),
                    "symbol table scanned"
                );
                for m in matches.iter().filter(|m| !m.code.is_recognized()) {
                    warn!(
                        library = %node.canonical_path.display(),
                        line = %m.raw_line,
                        "unrecognized symbol code, counting as defined"
                    );
                }
                Ok((!matches.is_empty()).then(|| NodeMatches {
                    node: *idx,
                    matches,
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Classify every line and keep those whose symbol name matches
pub fn match_lines(lines: &[String], pattern: &SymbolPattern) -> Vec<SymbolMatch> {
    lines
        .iter()
        .filter_map(|line| classify_line(line).map(|sym| (line, sym)))
        .filter(|(_, sym)| pattern.matches(&sym.name))
        .map(|(line, sym)| SymbolMatch {
            name: sym.name,
            classification: sym.classification,
            presence: sym.presence,
            code: sym.code,
            address: sym.address,
            raw_line: line.clone(),
        })
        .collect()
}
