//! Renderer module — trait-based format dispatch.
//!
//! Renderers are pure sinks: the build loop hands them a fully resolved
//! [`DocModel`] (signatures parsed, cross-references already looked up in
//! the registry) and they produce output text.

pub mod json;
pub mod markdown;

use crate::docblock::DocBlock;
use crate::model::Signature;
use anyhow::{anyhow, Result};

/// One output document: everything extracted from a single source file.
#[derive(Debug)]
pub struct DocModel {
    /// Document name, derived from the source file name.
    pub title: String,
    /// Path of the source file the signatures came from.
    pub source: String,
    pub functions: Vec<FunctionEntry>,
}

/// One documented function, ready to render.
#[derive(Debug)]
pub struct FunctionEntry {
    /// Registry anchor; becomes the link target in the output.
    pub anchor: String,
    pub signature: Signature,
    pub doc: DocBlock,
    /// Resolved `@see` cross-references, in appearance order.
    pub see_also: Vec<Link>,
}

/// A cross-reference after resolution. `target = None` renders as plain
/// text (the unlinked fallback for unresolved references).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub target: Option<LinkTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub document: String,
    pub anchor: String,
}

/// Trait for rendering a DocModel into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &DocModel) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
