//! symtrail core library
//!
//! Finds which shared libraries in the dynamic-dependency closure of a root
//! binary define, weakly define, or reference a symbol, and how each of them
//! was reached from the root.
//!
//! ```no_run
//! use symtrail_core::{find_symbol, QueryOptions, SymbolPattern, ToolPaths};
//!
//! # fn main() -> Result<(), symtrail_core::FindError> {
//! let outcome = find_symbol(
//!     "/usr/bin/python3",
//!     &SymbolPattern::literal("PyList_New"),
//!     &ToolPaths::default(),
//!     &QueryOptions::default(),
//! )?;
//! println!("searched {} libraries", outcome.tally().nodes_visited);
//! # Ok(())
//! # }
//! ```

pub mod canonical;
pub mod chain;
pub mod config;
pub mod error;
pub mod finder;
pub mod graph;
pub mod pattern;
pub mod query;
pub mod report;
pub mod symbol;
pub mod tools;
pub mod traversal;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use chain::Chain;
pub use config::{QueryOptions, ToolPaths};
pub use error::FindError;
pub use finder::{find_symbol, SymbolFinder};
pub use graph::{DependencyGraph, LibraryNode};
pub use pattern::{PatternKind, SymbolPattern};
pub use query::SymbolMatch;
pub use report::{NodeReport, NotFoundReport, QueryOutcome, QueryResult, Summary, Tally};
pub use symbol::{Classification, Presence};
