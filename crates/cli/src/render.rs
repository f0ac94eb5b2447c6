//! Human-readable rendering of a query outcome.
//!
//! Color scheme:
//! - Library headers bold blue, chains dimmed
//! - Definitions green, references yellow, weak bindings magenta
//! - Unresolved dependencies red

use std::io::{self, Write};

use owo_colors::{OwoColorize, Style};

use symtrail_core::report::{NotFoundReport, QueryResult};
use symtrail_core::{Classification, NodeReport, QueryOutcome, SymbolMatch, Tally};

/// Styles for each piece of output; everything is plain when disabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_blue().bold())
    }

    fn chain(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    fn symbol(&self, m: &SymbolMatch) -> String {
        let style = match m.classification {
            Classification::Defined => Style::new().green(),
            Classification::Weak => Style::new().magenta(),
            Classification::Undefined => Style::new().yellow(),
        };
        self.paint(&m.name, style)
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_red())
    }
}

pub fn write_outcome(
    out: &mut impl Write,
    outcome: &QueryOutcome,
    palette: &Palette,
) -> io::Result<()> {
    match outcome {
        QueryOutcome::Found(result) => write_found(out, result, palette),
        QueryOutcome::NotFound(report) => write_not_found(out, report, palette),
    }
}

fn write_found(out: &mut impl Write, result: &QueryResult, palette: &Palette) -> io::Result<()> {
    for node in &result.nodes {
        write_node(out, node, palette)?;
    }
    write_unresolved(out, &result.unresolved, palette)?;
    writeln!(out, "{}", tally_line(&result.tally))
}

fn write_node(out: &mut impl Write, node: &NodeReport, palette: &Palette) -> io::Result<()> {
    writeln!(
        out,
        "{} {} ({})",
        palette.header(&node.display_name),
        node.summary.label(),
        node.canonical_path.display()
    )?;
    writeln!(out, "  via {}", palette.chain(&node.chain.to_string()))?;
    for m in &node.matches {
        writeln!(out, "    {} {}", m.code, palette.symbol(m))?;
    }
    writeln!(out)
}

fn write_unresolved(
    out: &mut impl Write,
    unresolved: &[symtrail_core::graph::UnresolvedDependency],
    palette: &Palette,
) -> io::Result<()> {
    for dep in unresolved {
        writeln!(
            out,
            "{} {} (needed by {})",
            palette.warning("unresolved:"),
            dep.name,
            dep.needed_by.display()
        )?;
    }
    Ok(())
}

fn write_not_found(
    out: &mut impl Write,
    report: &NotFoundReport,
    palette: &Palette,
) -> io::Result<()> {
    writeln!(
        out,
        "{} not found in {} libraries reachable from {}",
        report.pattern,
        report.tally.nodes_visited,
        report.root.display()
    )?;
    write_unresolved(out, &report.unresolved, palette)
}

fn tally_line(tally: &Tally) -> String {
    format!(
        "{} of {} libraries matched: {} defined, {} undefined",
        tally.nodes_matching, tally.nodes_visited, tally.defined, tally.undefined
    )
}
