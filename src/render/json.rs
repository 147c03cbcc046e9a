//! JSON renderer — structured output for tooling integration.

use crate::model::TypedIdentifier;
use crate::render::{DocModel, FunctionEntry, Renderer};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &DocModel) -> String {
        let mut out = String::new();
        out.push_str("{\n");
        out.push_str(&format!("  \"document\": \"{}\",\n", json_escape(&doc.title)));
        out.push_str(&format!("  \"source\": \"{}\",\n", json_escape(&doc.source)));
        out.push_str("  \"functions\": [\n");
        for (i, function) in doc.functions.iter().enumerate() {
            out.push_str(&render_function_json(function));
            if i < doc.functions.len() - 1 {
                out.push_str(",\n");
            } else {
                out.push('\n');
            }
        }
        out.push_str("  ]\n");
        out.push_str("}\n");
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_function_json(function: &FunctionEntry) -> String {
    let mut out = String::new();
    out.push_str("    {\n");

    out.push_str(&format!(
        "      \"name\": \"{}\",\n",
        json_escape(function.signature.identifier())
    ));
    out.push_str(&format!(
        "      \"anchor\": \"{}\",\n",
        json_escape(&function.anchor)
    ));
    out.push_str(&format!(
        "      \"signature\": \"{}\",\n",
        json_escape(&function.signature.to_string())
    ));

    out.push_str("      \"return\": ");
    out.push_str(&render_typed_identifier(&function.signature.head, false));
    out.push_str(",\n");

    if let Some(args) = &function.signature.args {
        out.push_str("      \"args\": [");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&render_typed_identifier(arg, true));
        }
        out.push_str("],\n");
    }

    if !function.doc.description.is_empty() {
        out.push_str(&format!(
            "      \"description\": \"{}\",\n",
            json_escape(&function.doc.description)
        ));
    }

    if !function.doc.params.is_empty() {
        out.push_str("      \"params\": [\n");
        for (i, (name, text)) in function.doc.params.iter().enumerate() {
            let comma = if i < function.doc.params.len() - 1 { "," } else { "" };
            out.push_str(&format!(
                "        {{ \"name\": \"{}\", \"text\": \"{}\" }}{}\n",
                json_escape(name),
                json_escape(text),
                comma
            ));
        }
        out.push_str("      ],\n");
    }

    if !function.doc.returns.is_empty() {
        write_string_array(&mut out, "returns", &function.doc.returns);
    }

    if !function.doc.throws.is_empty() {
        write_string_array(&mut out, "throws", &function.doc.throws);
    }

    if !function.see_also.is_empty() {
        out.push_str("      \"see_also\": [\n");
        for (i, link) in function.see_also.iter().enumerate() {
            let comma = if i < function.see_also.len() - 1 { "," } else { "" };
            let target = match &link.target {
                Some(target) => format!(
                    "{{ \"document\": \"{}\", \"anchor\": \"{}\" }}",
                    json_escape(&target.document),
                    json_escape(&target.anchor)
                ),
                None => "null".to_string(),
            };
            out.push_str(&format!(
                "        {{ \"text\": \"{}\", \"target\": {} }}{}\n",
                json_escape(&link.text),
                target,
                comma
            ));
        }
        out.push_str("      ],\n");
    }

    // Remove the trailing comma from the last field
    let trimmed = out.trim_end().trim_end_matches(',').to_string();
    out = trimmed;
    out.push('\n');
    out.push_str("    }");
    out
}

fn render_typed_identifier(typed: &TypedIdentifier, with_identifier: bool) -> String {
    let mut fields = Vec::new();
    if with_identifier {
        fields.push(format!(
            "\"identifier\": {}",
            match &typed.identifier {
                Some(identifier) => format!("\"{}\"", json_escape(identifier)),
                None => "null".to_string(),
            }
        ));
    }
    fields.push(format!(
        "\"type\": {}",
        match &typed.base_type {
            Some(base_type) => format!("\"{}\"", json_escape(base_type)),
            None => "null".to_string(),
        }
    ));
    fields.push(format!(
        "\"dims\": {}",
        match typed.dims {
            Some(dims) => dims.to_string(),
            None => "null".to_string(),
        }
    ));
    format!("{{ {} }}", fields.join(", "))
}

fn write_string_array(out: &mut String, name: &str, items: &[String]) {
    out.push_str(&format!("      \"{}\": [", name));
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("\"{}\"", json_escape(item)));
    }
    out.push_str("],\n");
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
