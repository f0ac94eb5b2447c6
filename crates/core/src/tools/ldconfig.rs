//! Dynamic-linker cache lookup via `ldconfig -p`

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{run_tool, stderr_summary, stdout_lines, LinkerCache};

/// [`LinkerCache`] backed by `ldconfig -p`
#[derive(Debug, Clone)]
pub struct Ldconfig {
    program: PathBuf,
}

impl Ldconfig {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl LinkerCache for Ldconfig {
    fn resolve_bare_name(&self, name: &str) -> Option<PathBuf> {
        let output = match run_tool(&self.program, ["-p"]) {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "linker cache lookup failed");
                return None;
            }
        };
        if !output.status.success() {
            warn!(stderr = %stderr_summary(&output), "ldconfig -p exited with {}", output.status);
            return None;
        }

        let found = lookup(
            stdout_lines(&output).iter().map(String::as_str),
            name,
            host_abi_tag(),
        );
        debug!(name, path = ?found, "linker cache lookup");
        found
    }
}

/// ABI tag `ldconfig -p` prints for native 64-bit libraries on this host
///
/// `None` on hosts whose native entries carry no distinguishing tag; there the
/// first entry wins.
fn host_abi_tag() -> Option<&'static str> {
    match std::env::consts::ARCH {
        "x86_64" => Some("x86-64"),
        "aarch64" => Some("AArch64"),
        "powerpc64" | "s390x" | "sparc64" => Some("64bit"),
        _ => None,
    }
}

/// One parsed cache line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<'a> {
    name: &'a str,
    flags: &'a str,
    path: &'a str,
}

/// One `ldconfig -p` entry: `\tlibz.so.1 (libc6,x86-64) => /lib/x86_64-linux-gnu/libz.so.1`
fn parse_entry(line: &str) -> Option<Entry<'_>> {
    let (lhs, path) = line.split_once("=>")?;
    let name = lhs.split_whitespace().next()?;
    let flags = lhs
        .split_once('(')
        .and_then(|(_, rest)| rest.rsplit_once(')'))
        .map(|(flags, _)| flags)
        .unwrap_or("");
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(Entry { name, flags, path })
}

/// Cache entry for `name`, preferring one tagged with `abi`
///
/// The cache can list the same soname once per ABI (`(libc6,x86-64)` next to
/// the 32-bit `(libc6)`). An entry whose flags carry `abi` wins; with no such
/// entry, or no tag to look for, the first entry in cache order is used.
fn lookup<'a>(
    lines: impl Iterator<Item = &'a str>,
    name: &str,
    abi: Option<&str>,
) -> Option<PathBuf> {
    let candidates: Vec<Entry<'a>> = lines
        .filter_map(parse_entry)
        .filter(|entry| entry.name == name)
        .collect();

    let preferred = abi.and_then(|tag| {
        candidates
            .iter()
            .find(|entry| entry.flags.split(',').any(|flag| flag.trim() == tag))
    });
    preferred
        .or_else(|| candidates.first())
        .map(|entry| PathBuf::from(entry.path))
}
