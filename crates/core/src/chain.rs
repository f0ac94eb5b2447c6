//! Discovery chain reconstruction
//!
//! A chain is the root-first list of display names along the spanning-tree
//! path to a node. When a library is reachable through several parents only
//! the first-discovered path exists in the tree, so the chain is *a* way the
//! library was reached, not the only one.

use petgraph::stable_graph::NodeIndex;
use serde::Serialize;
use std::fmt;

use crate::graph::DependencyGraph;

/// Separator used when a chain is displayed
pub const CHAIN_SEPARATOR: &str = " > ";

/// Root-first sequence of library display names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Chain(pub Vec<String>);

impl Chain {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(CHAIN_SEPARATOR))
    }
}

/// Walk parent links from `idx` up to the root and return the chain.
///
/// Bounded by the node count, so a corrupted parent map cannot loop forever.
pub fn reconstruct(graph: &DependencyGraph, idx: NodeIndex) -> Chain {
    let mut names = Vec::new();
    let mut current = Some(idx);
    while let Some(node_idx) = current {
        if names.len() > graph.node_count() {
            break;
        }
        if let Some(node) = graph.node(node_idx) {
            names.push(node.display_name.clone());
        }
        current = graph.parent(node_idx);
    }
    names.reverse();
    Chain(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LibraryNode;
    use std::path::PathBuf;

    fn lib(path: &str) -> LibraryNode {
        LibraryNode::new(PathBuf::from(path))
    }

    #[test]
    fn test_root_chain_is_itself() {
        let graph = DependencyGraph::new(lib("/bin/R"));
        let chain = reconstruct(&graph, graph.root());
        assert_eq!(chain.names(), &["R".to_string()]);
        assert_eq!(chain.to_string(), "R");
    }

    #[test]
    fn test_chain_root_first() {
        let mut graph = DependencyGraph::new(lib("/bin/R"));
        let a = graph.insert_if_absent(graph.root(), lib("/lib/A")).unwrap();
        let c = graph.insert_if_absent(a, lib("/lib/C")).unwrap();

        let chain = reconstruct(&graph, c);
        assert_eq!(chain.to_string(), "R > A > C");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_chain_ignores_shared_edges() {
        let mut graph = DependencyGraph::new(lib("/bin/R"));
        let root = graph.root();
        let x = graph.insert_if_absent(root, lib("/lib/X")).unwrap();
        let y = graph.insert_if_absent(root, lib("/lib/Y")).unwrap();
        let z = graph.insert_if_absent(x, lib("/lib/Z")).unwrap();
        graph.insert_if_absent(y, lib("/lib/Z"));

        assert_eq!(reconstruct(&graph, z).to_string(), "R > X > Z");
    }

    #[test]
    fn test_reconstruct_is_repeatable() {
        let mut graph = DependencyGraph::new(lib("/bin/R"));
        let a = graph.insert_if_absent(graph.root(), lib("/lib/A")).unwrap();

        assert_eq!(reconstruct(&graph, a), reconstruct(&graph, a));
    }

    #[test]
    fn test_chain_serializes_as_list() {
        let chain = Chain(vec!["R".into(), "A".into()]);
        assert_eq!(serde_json::to_string(&chain).unwrap(), r#"["R","A"]"#);
    }
}
