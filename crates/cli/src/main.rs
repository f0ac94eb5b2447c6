use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use symtrail_core::{find_symbol, PatternKind, QueryOptions, QueryOutcome, SymbolPattern, ToolPaths};

mod render;

use render::Palette;

/// symtrail - find which library in a dependency closure provides a symbol
#[derive(Parser, Debug)]
#[command(name = "symtrail")]
#[command(version)] // Auto-pull version from Cargo.toml
#[command(
    about = "Find which shared library in a binary's dependency closure defines or references a symbol",
    long_about = None
)]
struct Cli {
    /// Root executable or shared library (path or bare soname)
    root: String,

    /// Symbol pattern (literal substring unless --regex or --glob)
    pattern: String,

    /// Treat PATTERN as a regular expression
    #[arg(short = 'E', long, conflicts_with = "glob")]
    regex: bool,

    /// Treat PATTERN as a shell glob matched against the whole name
    #[arg(short = 'G', long)]
    glob: bool,

    /// Demangle C++ symbol names before matching
    #[arg(short = 'C', long)]
    demangle: bool,

    /// Worker threads for dependency and symbol lookups (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// When to color the output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// `nm` program
    #[arg(long, env = "SYMTRAIL_NM", default_value = "nm")]
    nm: PathBuf,

    /// `readelf` program
    #[arg(long, env = "SYMTRAIL_READELF", default_value = "readelf")]
    readelf: PathBuf,

    /// `ldd` program
    #[arg(long, env = "SYMTRAIL_LDD", default_value = "ldd")]
    ldd: PathBuf,

    /// `ldconfig` program
    #[arg(long, env = "SYMTRAIL_LDCONFIG", default_value = "ldconfig")]
    ldconfig: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl Cli {
    fn pattern_kind(&self) -> PatternKind {
        if self.regex {
            PatternKind::Regex
        } else if self.glob {
            PatternKind::Glob
        } else {
            PatternKind::Literal
        }
    }

    fn options(&self) -> QueryOptions {
        QueryOptions {
            demangle: self.demangle,
            jobs: self.jobs,
        }
    }

    fn tools(&self) -> ToolPaths {
        ToolPaths {
            nm: self.nm.clone(),
            readelf: self.readelf.clone(),
            ldd: self.ldd.clone(),
            ldconfig: self.ldconfig.clone(),
        }
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn use_color(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
            }
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<QueryOutcome> {
    let pattern = SymbolPattern::new(&cli.pattern, cli.pattern_kind())?;
    debug!(tools = ?cli.tools(), options = ?cli.options(), "starting query");
    let outcome = find_symbol(&cli.root, &pattern, &cli.tools(), &cli.options())
        .with_context(|| format!("searching the dependencies of {}", cli.root))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &outcome)?;
        writeln!(out)?;
    } else {
        render::write_outcome(&mut out, &outcome, &Palette::new(cli.use_color()))?;
    }
    Ok(outcome)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(&cli) {
        Ok(outcome) if outcome.is_found() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("symtrail: error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
