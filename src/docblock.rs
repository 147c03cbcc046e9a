//! Doc-comment reformatting — a pure string transform.
//!
//! Stan doc comments use Doxygen-style markers inside `/** ... */` blocks:
//!
//! ```text
//! /**
//!  * Sum two values.
//!  * @param x First value.
//!  * @return The sum.
//!  */
//! ```
//!
//! [`normalize`] strips the comment decoration line by line and rewrites the
//! `@` markers into field-list form (`:param x:`, `:return:`, `:throws:`,
//! `:see:`); [`parse`] then groups the field lines for the renderer.

use regex::Regex;
use std::sync::LazyLock;

static NAMED_FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(?P<field>param)\s+(?P<value>\w+)").unwrap());

static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(?P<field>return|throws)").unwrap());

static SEE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@see\s+(?P<target>.*)").unwrap());

static PARAM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:param (?P<name>\w+):\s*(?P<text>.*)$").unwrap());

static RETURN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:return:\s*(?P<text>.*)$").unwrap());

static THROWS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:throws:\s*(?P<text>.*)$").unwrap());

static SEE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:see:\s*(?P<target>.*)$").unwrap());

/// Strip `/**`, `*/`, or `*` (with at most one following space) from the
/// front of a line.
fn strip_comment_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("/**") {
        return rest;
    }
    if let Some(rest) = trimmed.strip_prefix("*/") {
        return rest;
    }
    if let Some(rest) = trimmed.strip_prefix('*') {
        return rest.strip_prefix(' ').unwrap_or(rest);
    }
    trimmed
}

fn normalize_line(line: &str) -> String {
    let line = strip_comment_prefix(line).trim_end();
    let line = line.strip_suffix("*/").map(str::trim_end).unwrap_or(line);
    let line = SEE_PATTERN.replace_all(line, ":see: ${target}");
    let line = NAMED_FIELD_PATTERN.replace_all(&line, ":${field} ${value}:");
    FIELD_PATTERN.replace_all(&line, ":${field}:").into_owned()
}

/// Normalize a raw doc-comment block into field-list lines.
pub fn normalize(doc: &str) -> Vec<String> {
    doc.lines().map(normalize_line).collect()
}

/// A doc comment grouped into description and fields, in appearance order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub description: String,
    /// `@param <name>` entries as (name, text) pairs.
    pub params: Vec<(String, String)>,
    pub returns: Vec<String>,
    pub throws: Vec<String>,
    /// `@see` cross-reference targets, resolved later against the registry.
    pub see_also: Vec<String>,
}

impl DocBlock {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.params.is_empty()
            && self.returns.is_empty()
            && self.throws.is_empty()
            && self.see_also.is_empty()
    }
}

enum Field {
    Description,
    Param(usize),
    Return(usize),
    Throws(usize),
}

/// Parse a raw doc-comment block.
///
/// Lines before the first field marker form the description. A field's text
/// continues until the next marker or a blank line.
pub fn parse(doc: &str) -> DocBlock {
    let mut block = DocBlock::default();
    let mut description: Vec<String> = Vec::new();
    let mut open = Field::Description;

    for line in normalize(doc) {
        if let Some(caps) = PARAM_LINE.captures(&line) {
            block
                .params
                .push((caps["name"].to_string(), caps["text"].to_string()));
            open = Field::Param(block.params.len() - 1);
        } else if let Some(caps) = RETURN_LINE.captures(&line) {
            block.returns.push(caps["text"].to_string());
            open = Field::Return(block.returns.len() - 1);
        } else if let Some(caps) = THROWS_LINE.captures(&line) {
            block.throws.push(caps["text"].to_string());
            open = Field::Throws(block.throws.len() - 1);
        } else if let Some(caps) = SEE_LINE.captures(&line) {
            let target = caps["target"].trim();
            if !target.is_empty() {
                block.see_also.push(target.to_string());
            }
            open = Field::Description;
        } else if line.trim().is_empty() {
            if matches!(open, Field::Description) {
                description.push(String::new());
            }
            open = Field::Description;
        } else {
            match open {
                Field::Description => description.push(line),
                Field::Param(index) => append(&mut block.params[index].1, &line),
                Field::Return(index) => append(&mut block.returns[index], &line),
                Field::Throws(index) => append(&mut block.throws[index], &line),
            }
        }
    }

    block.description = description.join("\n").trim().to_string();
    block
}

fn append(text: &mut String, line: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(line.trim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_decoration() {
        let doc = "/**\n * Sum two values.\n * @param x First value.\n */";
        assert_eq!(
            normalize(doc),
            vec!["", "Sum two values.", ":param x: First value.", ""]
        );
    }

    #[test]
    fn normalize_rewrites_unnamed_fields() {
        assert_eq!(normalize(" * @return The sum."), vec![":return: The sum."]);
        assert_eq!(
            normalize(" * @throws If x is negative."),
            vec![":throws: If x is negative."]
        );
    }

    #[test]
    fn normalize_rewrites_see() {
        assert_eq!(
            normalize(" * @see add(real, real)"),
            vec![":see: add(real, real)"]
        );
    }

    #[test]
    fn normalize_strips_trailing_block_close() {
        assert_eq!(normalize("Last line. */"), vec!["Last line."]);
    }

    #[test]
    fn parse_groups_fields() {
        let doc = "\n * Sum two values.\n *\n * @param x First value.\n * @param y Second\n *   value.\n * @return The sum.\n * @see basic\n ";
        let block = parse(doc);
        assert_eq!(block.description, "Sum two values.");
        assert_eq!(
            block.params,
            vec![
                ("x".to_string(), "First value.".to_string()),
                ("y".to_string(), "Second value.".to_string()),
            ]
        );
        assert_eq!(block.returns, vec!["The sum."]);
        assert_eq!(block.see_also, vec!["basic"]);
    }

    #[test]
    fn parse_multi_paragraph_description() {
        let doc = "First paragraph.\n\nSecond paragraph.";
        let block = parse(doc);
        assert_eq!(block.description, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn parse_empty_doc() {
        assert!(parse("").is_empty());
        assert!(parse("/**\n */").is_empty());
    }

    #[test]
    fn blank_line_closes_a_field() {
        let doc = "@param x First.\n\nTrailing prose.";
        let block = parse(doc);
        assert_eq!(block.params, vec![("x".to_string(), "First.".to_string())]);
        assert_eq!(block.description, "Trailing prose.");
    }
}
