//! standoc — generate cross-referenced documentation from Stan source files.
//!
//! Scans `.stan`/`.stanfunctions` files for `/** ... */` doc comments and the
//! function signatures they document, registers every signature in a
//! per-build registry, then renders one output document per source file with
//! `@see` references resolved against the full registry.
//!
//! Two modes:
//!
//! - **stdin mode**: `standoc < funcs.stan` writes markdown to stdout
//! - **file mode**: `standoc -o docs lib/*.stan` writes one file per input

mod diag;
mod docblock;
mod lex;
mod model;
mod parser;
mod registry;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use diag::Diagnostics;
use model::SourceLocation;
use registry::{parse_member_specs, Entry, Registry};
use render::{DocModel, FunctionEntry, Link, LinkTarget};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "standoc",
    about = "Generate cross-referenced documentation from Stan source files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Restrict and order the documented functions, as a semicolon-separated
    /// list of names or overload keys, e.g. "basic; add(real, real)"
    #[arg(long)]
    members: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        // stdin mode: read one document, write to stdout
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: scan stdin as a single document and render to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut registry = Registry::new();
    let mut diagnostics = Diagnostics::default();
    register_source(&mut registry, "stdin", "<stdin>", &input, &mut diagnostics);

    let member_specs = cli.members.as_deref().map(parse_member_specs);
    let selected = match &member_specs {
        Some(specs) => Some(registry.filtered_members(specs, &mut diagnostics)?),
        None => None,
    };
    let model = build_doc_model(
        &registry,
        "stdin",
        "<stdin>",
        selected.as_deref(),
        &mut diagnostics,
    )?;

    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&model));
    report(&mut diagnostics);
    Ok(())
}

/// file mode: register all inputs, then render one document per input file.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let mut diagnostics = Diagnostics::default();
    let input_files = expand_globs(&cli.files, &mut diagnostics)?;

    // Pass 1: scan and register every signature before resolving anything,
    // so cross-references can point at later files.
    let mut registry = Registry::new();
    let mut documents: Vec<(String, String)> = Vec::new();
    for path in &input_files {
        let source = path.to_string_lossy().to_string();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                diagnostics.warn(format!("cannot read `{}`: {}", source, error), None);
                continue;
            }
        };
        let name = derive_document_name(&source);
        register_source(&mut registry, &name, &source, &content, &mut diagnostics);
        documents.push((name, source));
    }

    let member_specs = cli.members.as_deref().map(parse_member_specs);
    let selected = match &member_specs {
        Some(specs) => Some(registry.filtered_members(specs, &mut diagnostics)?),
        None => None,
    };

    // Pass 2: resolve references and render.
    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();
    for (name, source) in &documents {
        let model = build_doc_model(&registry, name, source, selected.as_deref(), &mut diagnostics)?;
        if model.functions.is_empty() {
            continue;
        }
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(&model))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    report(&mut diagnostics);
    Ok(())
}

/// Scan one source text and register every signature span found in it.
/// A span the parser rejects is skipped with a warning; the rest of the
/// file is still processed.
fn register_source(
    registry: &mut Registry,
    document: &str,
    source_file: &str,
    content: &str,
    diagnostics: &mut Diagnostics,
) {
    let raw_signatures = parser::scanner::scan(content);
    if raw_signatures.is_empty() {
        diagnostics.warn(
            format!("no signatures found in `{}`; is it empty?", source_file),
            None,
        );
        return;
    }
    for raw in raw_signatures {
        let location = SourceLocation {
            file: source_file.to_string(),
            line: raw.line,
        };
        if let Err(error) =
            registry.add_function(document, &raw.text, raw.doc.clone(), Some(location.clone()))
        {
            diagnostics.warn(
                format!("skipping signature `{}`: {:#}", raw.text, error),
                Some(&location),
            );
        }
    }
}

/// Assemble the render model for one document, resolving its `@see`
/// cross-references against the full registry.
fn build_doc_model(
    registry: &Registry,
    document: &str,
    source: &str,
    selected: Option<&[&Entry]>,
    diagnostics: &mut Diagnostics,
) -> Result<DocModel> {
    let entries: Vec<&Entry> = match selected {
        Some(selected) => selected
            .iter()
            .copied()
            .filter(|entry| entry.document == document)
            .collect(),
        None => registry
            .entries()
            .iter()
            .filter(|entry| entry.document == document)
            .collect(),
    };

    let mut functions = Vec::new();
    for entry in entries {
        let doc = entry
            .signature
            .doc
            .as_deref()
            .map(docblock::parse)
            .unwrap_or_default();
        let mut see_also = Vec::new();
        for target in &doc.see_also {
            let resolved =
                registry.resolve_xref(target, entry.signature.location.as_ref(), diagnostics)?;
            see_also.push(Link {
                text: target.clone(),
                target: resolved.map(|entry| LinkTarget {
                    document: entry.document.clone(),
                    anchor: entry.anchor.clone(),
                }),
            });
        }
        functions.push(FunctionEntry {
            anchor: entry.anchor.clone(),
            signature: entry.signature.clone(),
            doc,
            see_also,
        });
    }

    Ok(DocModel {
        title: document.to_string(),
        source: source.to_string(),
        functions,
    })
}

fn report(diagnostics: &mut Diagnostics) {
    for warning in diagnostics.take() {
        eprintln!("warning: {}", warning);
    }
}

/// File extensions recognized as Stan source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["stan", "stanfunctions"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String], diagnostics: &mut Diagnostics) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // If it's a directory, scan for supported extensions (non-recursive)
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        // Try as glob
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            diagnostics.warn(format!("no files matched: {}", pattern), None);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output document name (without extension) from a source path.
/// "lib/funcs.stan" → "funcs", "utils.stanfunctions" → "utils"
fn derive_document_name(source: &str) -> String {
    let filename = source.rsplit('/').next().unwrap_or(source);
    filename
        .strip_suffix(".stan")
        .or_else(|| filename.strip_suffix(".stanfunctions"))
        .unwrap_or(filename)
        .to_string()
}
