//! Symbol-table line classification
//!
//! `nm -D` prints one of two line shapes:
//!
//! ```text
//! 0000000000001139 T foo          defined: address, code, name
//!                  U bar          undefined: code, name (no address)
//! ```
//!
//! [`classify_line`] tells the shapes apart by checking whether the first
//! token is hexadecimal *and* followed by at least two more tokens, then maps
//! the single-letter code onto a [`Classification`] and a [`Presence`].

use serde::Serialize;
use std::fmt;

/// Coarse symbol kind reported per match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Defined,
    Weak,
    Undefined,
}

/// Whether a match counts as a definition or a reference in tallies.
///
/// Weak symbols split here: `W`/`V` carry an address and supply a (weak)
/// definition, `w`/`v` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Presence {
    Defined,
    Undefined,
}

/// The binding/section code as it appeared in the line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum BindingCode {
    Known(char),
    /// Anything nm is not documented to print; classified as defined
    Unrecognized(String),
}

impl BindingCode {
    pub fn is_recognized(&self) -> bool {
        matches!(self, BindingCode::Known(_))
    }
}

impl fmt::Display for BindingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingCode::Known(c) => write!(f, "{}", c),
            BindingCode::Unrecognized(s) if s.is_empty() => write!(f, "?"),
            BindingCode::Unrecognized(s) => write!(f, "{}", s),
        }
    }
}

/// One parsed symbol-table line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedSymbol {
    /// Symbol name, possibly demangled (may contain spaces)
    pub name: String,
    /// Address field, present for the defined-symbol shape
    pub address: Option<u64>,
    pub code: BindingCode,
    pub classification: Classification,
    pub presence: Presence,
}

/// Codes `nm` documents for its BSD output format
const KNOWN_CODES: &str = "AaBbCcDdGgIiNnpRrSsTtUuVvWw";

/// Parse and classify one line of `nm` output.
///
/// Returns `None` for blank lines. Lines with an unknown code, or too few
/// fields to carry one, still produce a symbol (classified `Defined`) with
/// [`BindingCode::Unrecognized`] so callers can surface them.
pub fn classify_line(line: &str) -> Option<ClassifiedSymbol> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (first, rest) = split_token(trimmed);
    let (address, code_token, name) = match parse_address(first) {
        Some(addr) if token_count(rest) >= 2 => {
            let (code, name) = split_token(rest);
            (Some(addr), code, name)
        }
        _ if rest.is_empty() => {
            // A lone token: no code field at all
            return Some(unrecognized(trimmed.to_string(), None, String::new()));
        }
        _ => (None, first, rest),
    };

    let code = match single_char(code_token) {
        Some(c) if KNOWN_CODES.contains(c) => BindingCode::Known(c),
        _ => return Some(unrecognized(name.to_string(), address, code_token.to_string())),
    };

    let (classification, presence) = match code {
        BindingCode::Known('U') => (Classification::Undefined, Presence::Undefined),
        BindingCode::Known('w') | BindingCode::Known('v') => {
            (Classification::Weak, Presence::Undefined)
        }
        BindingCode::Known('W') | BindingCode::Known('V') => {
            (Classification::Weak, Presence::Defined)
        }
        _ => (Classification::Defined, Presence::Defined),
    };

    Some(ClassifiedSymbol {
        name: name.to_string(),
        address,
        code,
        classification,
        presence,
    })
}

fn unrecognized(name: String, address: Option<u64>, code: String) -> ClassifiedSymbol {
    ClassifiedSymbol {
        name,
        address,
        code: BindingCode::Unrecognized(code),
        classification: Classification::Defined,
        presence: Presence::Defined,
    }
}

/// Split off the first whitespace-delimited token; the remainder is trimmed
fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn token_count(s: &str) -> usize {
    s.split_whitespace().count()
}

fn parse_address(token: &str) -> Option<u64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(token, 16).ok()
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
