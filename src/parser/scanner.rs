//! Structural scanner for raw Stan source.
//!
//! Locates doc-comment + signature pairs with a single coarse regex; the
//! recursive-descent parser in [`super::signature`] is then responsible for
//! turning each span into a structured signature. Nested parentheses inside
//! an argument list (e.g. default-value expressions) are not supported by
//! the structural pattern.

use regex::Regex;
use std::sync::LazyLock;

const TYPED_IDENTIFIER: &str = r"(?:array\s*\[[,\s]*\]\s*)?\w+\s+\w+";

static FUNCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?s)(?:/\*\*(?P<doc>.*?)\*/\s*)?(?P<signature>{ti}\(\s*(?:{ti})*(?:\s*,\s*{ti})*\s*\))",
        ti = TYPED_IDENTIFIER
    ))
    .unwrap()
});

/// A candidate signature span located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature {
    /// Verbatim contents of the preceding `/** ... */` block, if any.
    pub doc: Option<String>,
    /// The signature span with embedded newlines flattened to spaces.
    pub text: String,
    /// 1-based line number of the end of the span.
    pub line: usize,
}

/// Find all doc-comment + signature pairs in `source`.
pub fn scan(source: &str) -> Vec<RawSignature> {
    FUNCTION_PATTERN
        .captures_iter(source)
        .map(|caps| {
            let span = caps.name("signature").map(|m| m.as_str()).unwrap_or("");
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            RawSignature {
                doc: caps.name("doc").map(|m| m.as_str().to_string()),
                text: span.replace('\n', " "),
                line: source[..end].matches('\n').count() + 1,
            }
        })
        .collect()
}
