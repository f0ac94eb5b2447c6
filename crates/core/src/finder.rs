//! The query entry point
//!
//! [`SymbolFinder`] runs the two phases in order: build the whole dependency
//! closure, then query every library in it. Both phases run inside one
//! bounded rayon pool created per query.

use rayon::ThreadPoolBuilder;
use tracing::info;

use crate::config::{QueryOptions, ToolPaths};
use crate::error::Result;
use crate::pattern::SymbolPattern;
use crate::query::SymbolQueryEngine;
use crate::report::{self, QueryOutcome};
use crate::tools::{probe, DependencyLister, LinkerCache, SymbolTableLister, SystemTools};
use crate::traversal::DependencyGraphBuilder;

/// Finds which libraries in a root's closure define or reference a symbol
pub struct SymbolFinder<'a> {
    cache: &'a dyn LinkerCache,
    deps: &'a dyn DependencyLister,
    symbols: &'a dyn SymbolTableLister,
    options: QueryOptions,
}

impl<'a> SymbolFinder<'a> {
    pub fn new(
        cache: &'a dyn LinkerCache,
        deps: &'a dyn DependencyLister,
        symbols: &'a dyn SymbolTableLister,
        options: QueryOptions,
    ) -> Self {
        Self {
            cache,
            deps,
            symbols,
            options,
        }
    }

    /// Finder over the tool-backed collaborators in `tools`
    pub fn with_system_tools(tools: &'a SystemTools, options: QueryOptions) -> Self {
        Self::new(&tools.cache, &tools.deps, &tools.symbols, options)
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Run one query.
    ///
    /// Errors are fatal (missing root, collaborator failure); a pattern that
    /// matches nowhere is [`QueryOutcome::NotFound`].
    pub fn find(&self, root: &str, pattern: &SymbolPattern) -> Result<QueryOutcome> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.worker_count())
            .build()?;

        pool.install(|| {
            let graph = DependencyGraphBuilder::new(self.cache, self.deps).build(root)?;
            info!(
                root,
                libraries = graph.node_count(),
                unresolved = graph.unresolved().len(),
                "dependency closure built"
            );

            let found = SymbolQueryEngine::new(self.symbols, self.options.demangle)
                .query(&graph, pattern)?;
            let outcome = report::aggregate(&graph, found, pattern);
            info!(
                pattern = %pattern,
                matching = outcome.tally().nodes_matching,
                "query finished"
            );
            Ok(outcome)
        })
    }
}

/// Probe the system tools, then run one query with them
pub fn find_symbol(
    root: &str,
    pattern: &SymbolPattern,
    tools: &ToolPaths,
    options: &QueryOptions,
) -> Result<QueryOutcome> {
    probe::ensure_available(tools)?;
    let system = SystemTools::new(tools);
    SymbolFinder::with_system_tools(&system, options.clone()).find(root, pattern)
}
