//! Dynamic symbol table extraction via `nm -D`

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{run_tool, stderr_summary, stdout_lines, SymbolTableLister};

/// [`SymbolTableLister`] backed by `nm -D`
#[derive(Debug, Clone)]
pub struct Nm {
    program: PathBuf,
}

impl Nm {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SymbolTableLister for Nm {
    fn list_symbol_table(&self, path: &Path, demangle: bool) -> anyhow::Result<Vec<String>> {
        let mut args = vec![OsStr::new("-D")];
        if demangle {
            args.push(OsStr::new("-C"));
        }
        args.push(path.as_os_str());

        let output = run_tool(&self.program, args)?;
        if !output.status.success() {
            // "no symbols" for objects without a dynamic symbol table
            warn!(
                path = %path.display(),
                stderr = %stderr_summary(&output),
                "nm produced no symbol table"
            );
            return Ok(Vec::new());
        }
        Ok(stdout_lines(&output))
    }
}
