//! Library identity canonicalization
//!
//! Every library reference, whether a bare soname like `libc.so.6` or a path
//! like `/usr/lib/libfoo.so -> libfoo.so.1.2`, is reduced to one symlink-free
//! absolute path. That path is the dedup key for the whole traversal.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::tools::LinkerCache;

/// Turns library references into canonical absolute paths
pub struct PathCanonicalizer<'a> {
    cache: &'a dyn LinkerCache,
}

impl<'a> PathCanonicalizer<'a> {
    pub fn new(cache: &'a dyn LinkerCache) -> Self {
        Self { cache }
    }

    /// Canonicalize a reference.
    ///
    /// Never fails: a path that cannot be resolved comes back in absolute but
    /// unresolved form. A bare name the cache does not know is resolved
    /// against the working directory like any relative path. The caller
    /// decides what a non-existent result means.
    pub fn canonicalize(&self, reference: &str) -> PathBuf {
        if is_bare_name(reference) {
            if let Some(found) = self.cache.resolve_bare_name(reference) {
                return resolve_path(&found);
            }
        }
        resolve_path(Path::new(reference))
    }

    /// Canonicalize something that is already known to be a path
    pub fn canonicalize_path(&self, path: &Path) -> PathBuf {
        resolve_path(path)
    }
}

/// A bare name has no directory component at all
fn is_bare_name(reference: &str) -> bool {
    !reference.contains(MAIN_SEPARATOR) && !reference.contains('/')
}

fn resolve_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
