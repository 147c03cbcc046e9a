//! GitHub-flavored markdown renderer.
//!
//! One document per source file: an index of all signatures, then a block
//! per function with its signature, description, and field sections. Link
//! targets use the registry anchors via explicit `<a id>` elements, so
//! overloads sharing an identifier stay individually addressable.

use crate::render::{DocModel, FunctionEntry, Link, Renderer};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &DocModel) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", doc.title));

        if !doc.functions.is_empty() {
            output.push_str("## Index\n\n");
            for function in &doc.functions {
                output.push_str(&format!(
                    "* [{}](#{})\n",
                    function.signature, function.anchor
                ));
            }
            output.push('\n');
        }

        for function in &doc.functions {
            output.push_str(&render_function(function, doc));
            output.push('\n');
        }

        output
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_function(function: &FunctionEntry, doc: &DocModel) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("<a id=\"{}\"></a>\n", function.anchor));
    lines.push(format!("### {}\n", function.signature.identifier()));
    lines.push("```stan".to_string());
    lines.push(function.signature.to_string());
    lines.push("```".to_string());
    lines.push(String::new());

    if !function.doc.description.is_empty() {
        lines.push(function.doc.description.clone());
        lines.push(String::new());
    }

    if !function.doc.params.is_empty() {
        lines.push("#### Parameters\n".to_string());
        for (name, text) in &function.doc.params {
            lines.push(format!("* **{}**: {}", name, text));
        }
        lines.push(String::new());
    }

    if !function.doc.returns.is_empty() {
        lines.push("#### Returns\n".to_string());
        for text in &function.doc.returns {
            lines.push(format!("* {}", text));
        }
        lines.push(String::new());
    }

    if !function.doc.throws.is_empty() {
        lines.push("#### Throws\n".to_string());
        for text in &function.doc.throws {
            lines.push(format!("* {}", text));
        }
        lines.push(String::new());
    }

    if !function.see_also.is_empty() {
        lines.push("#### See also\n".to_string());
        for link in &function.see_also {
            lines.push(format!("* {}", render_link(link, doc)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render a resolved cross-reference. Same-document targets link to the
/// bare anchor; other documents go through their markdown file. Unresolved
/// references degrade to plain text.
fn render_link(link: &Link, doc: &DocModel) -> String {
    match &link.target {
        Some(target) if target.document == doc.title => {
            format!("[{}](#{})", link.text, target.anchor)
        }
        Some(target) => format!("[{}]({}.md#{})", link.text, target.document, target.anchor),
        None => link.text.clone(),
    }
}
