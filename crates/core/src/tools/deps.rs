//! Direct dependency enumeration via `readelf -d` and `ldd`
//!
//! `ldd` reports the whole transitive closure flattened into one list, so it
//! cannot tell direct from indirect dependencies. `readelf -dW` gives the
//! ordered `DT_NEEDED` names of this object only; `ldd` is then consulted
//! purely as a name-to-path map to resolve those names the way the loader
//! would.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{run_tool, stderr_summary, stdout_lines, DependencyLister, DirectDependency};

/// [`DependencyLister`] backed by `readelf` and `ldd`
#[derive(Debug, Clone)]
pub struct ElfDependencies {
    readelf: PathBuf,
    ldd: PathBuf,
}

impl ElfDependencies {
    pub fn new(readelf: PathBuf, ldd: PathBuf) -> Self {
        Self { readelf, ldd }
    }

    fn needed_names(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let output = run_tool(&self.readelf, [OsStr::new("-dW"), path.as_os_str()])?;
        if !output.status.success() {
            warn!(
                path = %path.display(),
                stderr = %stderr_summary(&output),
                "readelf could not read dynamic section"
            );
            return Ok(Vec::new());
        }
        Ok(stdout_lines(&output)
            .iter()
            .filter_map(|line| parse_needed(line))
            .collect())
    }

    fn loader_map(&self, path: &Path) -> anyhow::Result<LoaderMap> {
        let output = run_tool(&self.ldd, [path.as_os_str()])?;
        if !output.status.success() {
            // Static executables and non-ELF files land here
            warn!(
                path = %path.display(),
                stderr = %stderr_summary(&output),
                "ldd reported no dynamic dependencies"
            );
            return Ok(LoaderMap::default());
        }
        Ok(LoaderMap::parse(stdout_lines(&output).iter().map(String::as_str)))
    }
}

impl DependencyLister for ElfDependencies {
    fn list_direct_dependencies(&self, path: &Path) -> anyhow::Result<Vec<DirectDependency>> {
        let needed = self.needed_names(path)?;
        if needed.is_empty() {
            return Ok(Vec::new());
        }
        let loader = self.loader_map(path)?;
        Ok(needed
            .into_iter()
            .map(|name| {
                let path = loader.resolve(&name);
                DirectDependency { name, path }
            })
            .collect())
    }
}

/// `0x0000000000000001 (NEEDED)  Shared library: [libc.so.6]`
fn parse_needed(line: &str) -> Option<String> {
    let (_, rest) = line.split_once("(NEEDED)")?;
    let start = rest.find('[')?;
    let end = rest.rfind(']')?;
    if end <= start + 1 {
        return None;
    }
    Some(rest[start + 1..end].to_string())
}

/// What `ldd` said about each name it printed
#[derive(Debug, Default, PartialEq, Eq)]
struct LoaderMap {
    /// `name => path` and `name => not found` entries
    named: HashMap<String, Option<PathBuf>>,
    /// Bare absolute entries such as the program interpreter
    absolute: Vec<PathBuf>,
}

impl LoaderMap {
    fn parse<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut map = LoaderMap::default();
        for line in lines {
            let line = line.trim();
            if let Some((name, target)) = line.split_once("=>") {
                let name = name.trim().to_string();
                let target = strip_load_address(target.trim());
                let path = if target.is_empty() || target == "not found" {
                    None
                } else {
                    Some(PathBuf::from(target))
                };
                map.named.entry(name).or_insert(path);
            } else {
                let target = strip_load_address(line);
                // linux-vdso.so.1 and friends are virtual and have no file
                if target.starts_with('/') {
                    map.absolute.push(PathBuf::from(target));
                }
            }
        }
        map
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if let Some(entry) = self.named.get(name) {
            return entry.clone();
        }
        if name.starts_with('/') {
            return Some(PathBuf::from(name));
        }
        self.absolute
            .iter()
            .find(|p| p.file_name().and_then(|f| f.to_str()) == Some(name))
            .cloned()
    }
}

/// Drop a trailing ` (0x00007f...)` load address
fn strip_load_address(s: &str) -> &str {
    match s.rfind(" (0x") {
        Some(idx) if s.ends_with(')') => s[..idx].trim_end(),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READELF: &str = "\
Dynamic section at offset 0x2dc8 contains 27 entries:
  Tag        Type                         Name/Value
 0x0000000000000001 (NEEDED)             Shared library: [libfoo.so.1]
 0x0000000000000001 (NEEDED)             Shared library: [libc.so.6]
 0x0000000000000001 (NEEDED)             Shared library: [ld-linux-x86-64.so.2]
 0x000000000000000e (SONAME)             Library soname: [libbar.so.2]
 0x000000000000000c (INIT)               0x1000
";

    const LDD: &str = "\
\tlinux-vdso.so.1 (0x00007ffc6d5f1000)
\tlibfoo.so.1 => not found
\tlibc.so.6 => /lib/x86_64-linux-gnu/libc.so.6 (0x00007f0e1a400000)
\tlibm.so.6 => /lib/x86_64-linux-gnu/libm.so.6 (0x00007f0e1a319000)
\t/lib64/ld-linux-x86-64.so.2 (0x00007f0e1a6a3000)
";

    #[test]
    fn test_parse_needed_in_order() {
        let needed: Vec<String> = READELF.lines().filter_map(parse_needed).collect();
        assert_eq!(needed, vec!["libfoo.so.1", "libc.so.6", "ld-linux-x86-64.so.2"]);
    }

    #[test]
    fn test_soname_is_not_needed() {
        assert_eq!(
            parse_needed(" 0x000000000000000e (SONAME)             Library soname: [libbar.so.2]"),
            None
        );
    }

    #[test]
    fn test_loader_map_entries() {
        let map = LoaderMap::parse(LDD.lines());
        assert_eq!(
            map.resolve("libc.so.6"),
            Some(PathBuf::from("/lib/x86_64-linux-gnu/libc.so.6"))
        );
        assert_eq!(map.resolve("libfoo.so.1"), None);
        assert!(map.named.contains_key("libfoo.so.1"));
    }

    #[test]
    fn test_interpreter_resolved_by_file_name() {
        let map = LoaderMap::parse(LDD.lines());
        assert_eq!(
            map.resolve("ld-linux-x86-64.so.2"),
            Some(PathBuf::from("/lib64/ld-linux-x86-64.so.2"))
        );
    }

    #[test]
    fn test_vdso_ignored() {
        let map = LoaderMap::parse(LDD.lines());
        assert_eq!(map.absolute, vec![PathBuf::from("/lib64/ld-linux-x86-64.so.2")]);
        assert_eq!(map.resolve("linux-vdso.so.1"), None);
    }

    #[test]
    fn test_absolute_needed_name() {
        let map = LoaderMap::default();
        assert_eq!(map.resolve("/opt/lib/libx.so"), Some(PathBuf::from("/opt/lib/libx.so")));
    }

    #[test]
    fn test_strip_load_address() {
        assert_eq!(strip_load_address("/lib/libc.so.6 (0x00007f0e1a400000)"), "/lib/libc.so.6");
        assert_eq!(strip_load_address("not found"), "not found");
    }

    #[test]
    fn test_missing_readelf_is_error() {
        let deps = ElfDependencies::new(PathBuf::from("/no/readelf"), PathBuf::from("/no/ldd"));
        assert!(deps.list_direct_dependencies(Path::new("/bin/sh")).is_err());
    }
}
