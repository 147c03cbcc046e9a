//! Lexical primitives — anchored match-and-consume over a text buffer.
//!
//! Every grammar token in the signature parser goes through these two
//! helpers. Patterns must anchor themselves with `^`; a match that does not
//! start at the front of the buffer is treated as a miss.

use anyhow::{bail, Result};
use regex::{Captures, Regex};

/// Match `pattern` at the start of `text` and consume it.
///
/// Returns the captures and the remaining text after the match. Use this for
/// tokens that are mandatory at the call site: a miss is a hard error
/// carrying the pattern and input for diagnostics.
pub fn match_and_consume<'t>(pattern: &Regex, text: &'t str) -> Result<(Captures<'t>, &'t str)> {
    match try_consume(pattern, text) {
        Some(consumed) => Ok(consumed),
        None => bail!("`{}` did not match `{}`", pattern.as_str(), text),
    }
}

/// Like [`match_and_consume`], but an absent token is `None` rather than an
/// error. Use this for optional grammar elements (array markers, the next
/// argument in a list).
pub fn try_consume<'t>(pattern: &Regex, text: &'t str) -> Option<(Captures<'t>, &'t str)> {
    let caps = pattern.captures(text)?;
    let full = caps.get(0)?;
    if full.start() != 0 {
        return None;
    }
    let remainder = &text[full.end()..];
    Some((caps, remainder))
}
