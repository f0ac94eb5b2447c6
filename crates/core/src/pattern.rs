//! Symbol name patterns
//!
//! A query pattern is either a literal substring, a regular expression
//! (`regex` crate syntax, unanchored), or a shell-style glob (`globset`,
//! anchored to the whole name).

use globset::{Glob, GlobMatcher};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{FindError, Result};

/// How the user-supplied pattern text should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PatternKind {
    #[default]
    Literal,
    Regex,
    Glob,
}

/// A compiled symbol pattern
#[derive(Debug, Clone)]
pub enum SymbolPattern {
    Literal(String),
    Regex(Regex),
    Glob { source: String, matcher: GlobMatcher },
}

impl SymbolPattern {
    /// Compile `text` according to `kind`
    pub fn new(text: &str, kind: PatternKind) -> Result<Self> {
        match kind {
            PatternKind::Literal => Ok(Self::literal(text)),
            PatternKind::Regex => Regex::new(text)
                .map(SymbolPattern::Regex)
                .map_err(|e| invalid(text, e)),
            PatternKind::Glob => Glob::new(text)
                .map(|glob| SymbolPattern::Glob {
                    source: text.to_string(),
                    matcher: glob.compile_matcher(),
                })
                .map_err(|e| invalid(text, e)),
        }
    }

    /// Literal substring pattern (never fails)
    pub fn literal(text: &str) -> Self {
        SymbolPattern::Literal(text.to_string())
    }

    /// Does `text` satisfy this pattern?
    pub fn matches(&self, text: &str) -> bool {
        match self {
            SymbolPattern::Literal(needle) => text.contains(needle.as_str()),
            SymbolPattern::Regex(re) => re.is_match(text),
            SymbolPattern::Glob { matcher, .. } => matcher.is_match(text),
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            SymbolPattern::Literal(_) => PatternKind::Literal,
            SymbolPattern::Regex(_) => PatternKind::Regex,
            SymbolPattern::Glob { .. } => PatternKind::Glob,
        }
    }

    /// The pattern text as the user wrote it
    pub fn as_str(&self) -> &str {
        match self {
            SymbolPattern::Literal(s) => s,
            SymbolPattern::Regex(re) => re.as_str(),
            SymbolPattern::Glob { source, .. } => source,
        }
    }
}

impl fmt::Display for SymbolPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SymbolPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn invalid(pattern: &str, err: impl fmt::Display) -> FindError {
    FindError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_substring() {
        let p = SymbolPattern::literal("alloc");
        assert!(p.matches("malloc"));
        assert!(p.matches("alloc_pages"));
        assert!(!p.matches("free"));
    }

    #[test]
    fn test_literal_treats_regex_chars_literally() {
        let p = SymbolPattern::new("foo.*", PatternKind::Literal).unwrap();
        assert!(!p.matches("foobar"));
        assert!(p.matches("foo.*bar"));
    }

    #[test]
    fn test_regex_anchors() {
        let p = SymbolPattern::new("^mem(cpy|set)$", PatternKind::Regex).unwrap();
        assert!(p.matches("memcpy"));
        assert!(p.matches("memset"));
        assert!(!p.matches("wmemcpy"));
        assert_eq!(p.kind(), PatternKind::Regex);
    }

    #[test]
    fn test_glob_matches_whole_name() {
        let p = SymbolPattern::new("pthread_*", PatternKind::Glob).unwrap();
        assert!(p.matches("pthread_create"));
        assert!(!p.matches("__pthread_create"));
        assert_eq!(p.as_str(), "pthread_*");
    }

    #[test]
    fn test_invalid_regex() {
        let err = SymbolPattern::new("(unclosed", PatternKind::Regex).unwrap_err();
        match err {
            FindError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_glob() {
        assert!(SymbolPattern::new("[abc", PatternKind::Glob).is_err());
    }

    #[test]
    fn test_serializes_as_text() {
        let p = SymbolPattern::new("^foo", PatternKind::Regex).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"^foo\"");
    }
}
