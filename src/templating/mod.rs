//! Placeholder substitution engine.
//!
//! Two kinds of rewriting happen when a templated artifact is published:
//!
//! 1. **Literal substitution** ([`substitute_literals`]): every declared
//!    placeholder byte string is replaced by its dependency's resolved
//!    identifier. All placeholders are compiled into a single alternation and
//!    applied in one left-to-right pass, so a byte range consumed by one
//!    replacement can never be rewritten again by another. Placeholders that
//!    are substrings of each other are ordered longest-first; the regex
//!    alternation is preference-ordered, so the longest candidate wins at any
//!    given position.
//!
//! 2. **Group templates** ([`expand_groups`], [`expand_replacement`]): a
//!    regexp source derives a dependency name from each match via a template
//!    with `{}` / `{n}` / `{name}` placeholders bound to capture groups, and
//!    splices the resolved identifier back through a replacement template in
//!    which `{}` is the identifier token.
//!
//! Matching is byte-oriented (`regex::bytes`) because published artifacts are
//! not required to be valid UTF-8.

use anyhow::Result;
use regex::bytes::{Captures, Regex};
use std::collections::HashMap;

use crate::core::IpubError;
use crate::store::ProductId;

/// Escape a literal byte pattern for inclusion in a `(?-u)` bytes regex.
///
/// ASCII alphanumerics pass through; every other byte is emitted as a `\x`
/// escape, which also keeps non-UTF-8 placeholder bytes matchable.
fn escape_literal(pattern: &[u8]) -> String {
    let mut escaped = String::with_capacity(pattern.len() * 2);
    for &byte in pattern {
        if byte.is_ascii_alphanumeric() {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("\\x{byte:02x}"));
        }
    }
    escaped
}

/// Replace every occurrence of each literal placeholder with its value.
///
/// All rules are applied simultaneously in a single scan: the placeholders
/// are compiled into one alternation (longest placeholder first) and each
/// match is replaced by its rule's value exactly once. An empty rule set or
/// an input containing no occurrences returns the data unchanged.
///
/// # Errors
///
/// Returns [`IpubError::PatternError`] if the generated alternation fails to
/// compile, which indicates a placeholder the escaper cannot express.
pub fn substitute_literals(data: &[u8], rules: &[(Vec<u8>, Vec<u8>)]) -> Result<Vec<u8>> {
    if rules.is_empty() {
        return Ok(data.to_vec());
    }

    let mut patterns: Vec<&[u8]> = rules.iter().map(|(pattern, _)| pattern.as_slice()).collect();
    // Longest first: the alternation is preference-ordered, so this makes
    // overlapping placeholders resolve to the longest match deterministically.
    patterns.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternation = format!(
        "(?-u){}",
        patterns.iter().map(|p| escape_literal(p)).collect::<Vec<_>>().join("|")
    );
    let regex = Regex::new(&alternation).map_err(|e| IpubError::PatternError {
        pattern: String::from_utf8_lossy(patterns[0]).into_owned(),
        reason: e.to_string(),
    })?;

    let values: HashMap<&[u8], &[u8]> =
        rules.iter().map(|(pattern, value)| (pattern.as_slice(), value.as_slice())).collect();

    let replaced = regex.replace_all(data, |caps: &Captures<'_>| values[&caps[0]].to_vec());
    Ok(replaced.into_owned())
}

/// Expand `{}` / `{n}` / `{name}` placeholders against a match's capture
/// groups, yielding a dependency name.
///
/// Positional `{}` consumes groups 1, 2, ... in order; when the pattern has
/// no capture groups at all it refers to the whole match. `{0}` always names
/// the whole match, `{{` and `}}` are literal braces.
///
/// # Errors
///
/// Returns [`IpubError::GroupFormat`] when a placeholder has no
/// corresponding capture group, or when a `{` is never closed.
pub fn expand_groups(template: &str, caps: &Captures<'_>) -> Result<String> {
    // Implicit positionals skip group 0 whenever real capture groups exist.
    let mut next_positional = if caps.len() > 1 { 1 } else { 0 };
    let expanded = expand(template, |token| {
        let group = if token.is_empty() {
            let index = next_positional;
            next_positional += 1;
            caps.get(index)
        } else if let Ok(index) = token.parse::<usize>() {
            caps.get(index)
        } else {
            caps.name(token)
        };
        group.map(|m| m.as_bytes().to_vec()).ok_or_else(|| group_error(template, token))
    })?;
    Ok(String::from_utf8_lossy(&expanded).into_owned())
}

/// Expand a regexp source's replacement template for one match.
///
/// `{}` is the identifier token and is substituted by `id` at every
/// occurrence; `{n}` and `{name}` re-inject capture groups from the match.
pub fn expand_replacement(template: &str, caps: &Captures<'_>, id: &ProductId) -> Result<Vec<u8>> {
    expand(template, |token| {
        if token.is_empty() {
            return Ok(id.as_bytes().to_vec());
        }
        let group = if let Ok(index) = token.parse::<usize>() {
            caps.get(index)
        } else {
            caps.name(token)
        };
        group.map(|m| m.as_bytes().to_vec()).ok_or_else(|| group_error(template, token))
    })
}

fn group_error(template: &str, token: &str) -> anyhow::Error {
    IpubError::GroupFormat {
        template: template.to_string(),
        placeholder: token.to_string(),
    }
    .into()
}

fn expand<F>(template: &str, mut resolve: F) -> Result<Vec<u8>>
where
    F: FnMut(&str) -> Result<Vec<u8>>,
{
    let mut out = Vec::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push(b'{');
                    continue;
                }
                let mut token = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    token.push(inner);
                }
                if !closed {
                    return Err(IpubError::GroupFormat {
                        template: template.to_string(),
                        placeholder: template[start..].to_string(),
                    }
                    .into());
                }
                out.extend_from_slice(&resolve(&token)?);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                out.push(b'}');
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Ok(out)
}
