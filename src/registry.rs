//! Per-build registry of documented functions.
//!
//! One registry lives for one build pass: signatures are appended while the
//! input documents are parsed, then queried (member filtering, reference
//! resolution) over the by-then-immutable entry list. Entries are never
//! mutated or removed after insertion.

use crate::diag::Diagnostics;
use crate::model::{MatchScore, Signature, SourceLocation};
use crate::parser::signature::{parse_signature, ParseOptions};
use anyhow::{bail, Context, Result};

/// One registered function: which document it lives in, the anchor that
/// links to it there, and its parsed signature.
#[derive(Debug, Clone)]
pub struct Entry {
    pub document: String,
    pub anchor: String,
    pub signature: Signature,
}

/// Object listing row: (name, display name, kind, document, anchor, priority).
pub type ObjectEntry = (String, String, &'static str, String, String, i32);

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    anchor_counter: u64,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Anchors only need to be unique within one registry lifetime; a
    /// monotonic counter keeps output deterministic across builds.
    fn next_anchor(&mut self, identifier: &str) -> String {
        self.anchor_counter += 1;
        format!("{}-{}", identifier, self.anchor_counter)
    }

    /// Parse `text` as a fully-qualified signature and register it under
    /// `document`, returning the generated anchor.
    ///
    /// A signature that cannot be parsed, or that lacks a concrete argument
    /// list, fails the whole registration.
    pub fn add_function(
        &mut self,
        document: &str,
        text: &str,
        doc: Option<String>,
        location: Option<SourceLocation>,
    ) -> Result<String> {
        let mut signature = parse_signature(text, &ParseOptions::default())
            .with_context(|| format!("cannot parse signature `{}`", text))?;
        if signature.args.is_none() {
            bail!("signature `{}` is missing its argument list", text);
        }
        signature.doc = doc;
        signature.location = location;
        let anchor = self.next_anchor(signature.identifier());
        self.entries.push(Entry {
            document: document.to_string(),
            anchor: anchor.clone(),
            signature,
        });
        Ok(anchor)
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Listing of every registered object for the host's object inventory.
    /// Priority is always 1 (default).
    pub fn get_objects(&self) -> Vec<ObjectEntry> {
        self.entries
            .iter()
            .map(|entry| {
                let name = entry.signature.identifier().to_string();
                (
                    name.clone(),
                    name,
                    "function",
                    entry.document.clone(),
                    entry.anchor.clone(),
                    1,
                )
            })
            .collect()
    }

    /// Collect the entries matched by each member spec, preserving spec
    /// order. A spec matching several overloads yields them all in sequence;
    /// a spec matching nothing is a warning, not a failure.
    pub fn filtered_members<'a>(
        &'a self,
        specs: &[Signature],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<&'a Entry>> {
        let mut members = Vec::new();
        for spec in specs {
            let mut matched = 0;
            for entry in &self.entries {
                if spec.matches(&entry.signature)? != MatchScore::None {
                    members.push(entry);
                    matched += 1;
                }
            }
            if matched == 0 {
                diagnostics.warn(format!("found no match for `{}`", spec), None);
            }
        }
        Ok(members)
    }

    /// Resolve a cross-reference target to a registered entry.
    ///
    /// A full match wins immediately (fully-qualified overloads are assumed
    /// unique). Otherwise name-only matches are collected: none is a
    /// "not found" warning, several are reported as ambiguous and the
    /// first-inserted entry is chosen deterministically.
    pub fn resolve_xref<'a>(
        &'a self,
        target: &str,
        from: Option<&SourceLocation>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<&'a Entry>> {
        let reference = parse_reference(target);
        let mut results: Vec<&Entry> = Vec::new();
        for entry in &self.entries {
            match reference.matches(&entry.signature)? {
                MatchScore::Full => {
                    results = vec![entry];
                    break;
                }
                MatchScore::NameOnly => results.push(entry),
                MatchScore::None => {}
            }
        }
        let Some(chosen) = results.first().copied() else {
            diagnostics.warn(format!("reference target not found `{}`", reference), from);
            return Ok(None);
        };
        if results.len() > 1 {
            let candidates: Vec<String> = results
                .iter()
                .map(|entry| entry.signature.describe())
                .collect();
            diagnostics.warn(
                format!(
                    "multiple functions found for reference `{}`: {} (using `{}`); qualify the \
                     target by specifying argument types in the format \
                     `name(arg1_type, arg2_type)`, e.g. `add(array [,] real, int)`",
                    reference,
                    candidates.join("; "),
                    chosen.signature
                ),
                from,
            );
        }
        Ok(Some(chosen))
    }
}

/// Parse a reference fragment, reverting to a bare name when the signature
/// shape does not parse.
pub fn parse_reference(target: &str) -> Signature {
    match parse_signature(target, &ParseOptions::reference()) {
        Ok(signature) => signature,
        Err(_) => Signature::name_only(target),
    }
}

/// Parse a semicolon-separated member spec list, e.g.
/// `basic; add(real, real)`.
pub fn parse_member_specs(text: &str) -> Vec<Signature> {
    text.split(';')
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(parse_reference)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(signatures: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for (index, text) in signatures.iter().enumerate() {
            registry
                .add_function(
                    "funcs",
                    text,
                    None,
                    Some(SourceLocation {
                        file: "funcs.stan".to_string(),
                        line: index + 1,
                    }),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn add_returns_unique_anchors() {
        let mut registry = Registry::new();
        let a = registry
            .add_function("doc", "real foobar(int x)", None, None)
            .unwrap();
        let b = registry
            .add_function("doc", "real foobar(int x, int y)", None, None)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.entries().len(), 2);
    }

    #[test]
    fn add_rejects_name_only_text() {
        let mut registry = Registry::new();
        let err = registry
            .add_function("doc", "foobar", None, None)
            .unwrap_err();
        assert!(err.to_string().contains("missing its argument list"));
    }

    #[test]
    fn add_rejects_malformed_signature() {
        let mut registry = Registry::new();
        assert!(registry
            .add_function("doc", "real f(real x", None, None)
            .is_err());
    }

    #[test]
    fn get_objects_lists_all_entries() {
        let registry = registry_with(&["real foobar(int x)", "void basic()"]);
        let objects = registry.get_objects();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].0, "foobar");
        assert_eq!(objects[1].0, "basic");
        assert_eq!(objects[0].2, "function");
        assert_eq!(objects[0].5, 1);
    }

    #[test]
    fn resolve_name_only_ambiguity_is_deterministic() {
        let registry = registry_with(&["real foobar(int x)", "real foobar(int x, int y)"]);
        for _ in 0..3 {
            let mut diagnostics = Diagnostics::default();
            let entry = registry
                .resolve_xref("foobar", None, &mut diagnostics)
                .unwrap()
                .unwrap();
            assert_eq!(entry.signature.to_string(), "real foobar(int x)");
            let warnings: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("multiple functions found"));
            assert!(warnings[0].contains("real foobar(int x) at funcs.stan:1"));
            assert!(warnings[0].contains("real foobar(int x, int y) at funcs.stan:2"));
        }
    }

    #[test]
    fn resolve_full_match_wins_over_name_only() {
        let registry = registry_with(&["void overload(real x, int y)"]);
        let mut diagnostics = Diagnostics::default();
        let entry = registry
            .resolve_xref("overload(real, int)", None, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(entry.signature.to_string(), "void overload(real x, int y)");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn resolve_mismatched_types_not_found() {
        let registry = registry_with(&["void overload(real x, int y)"]);
        let mut diagnostics = Diagnostics::default();
        let resolved = registry
            .resolve_xref("overload(real, real)", None, &mut diagnostics)
            .unwrap();
        assert!(resolved.is_none());
        let warnings: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("reference target not found"));
    }

    #[test]
    fn resolve_unparseable_target_falls_back_to_name() {
        let registry = registry_with(&["void basic()"]);
        let mut diagnostics = Diagnostics::default();
        let entry = registry
            .resolve_xref("basic", None, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(entry.signature.identifier(), "basic");
    }

    #[test]
    fn filtered_members_preserves_spec_order() {
        let registry = registry_with(&[
            "real func(int x)",
            "real other(int x)",
            "real func2(int x)",
            "real func(int x, int y)",
            "real func2(int x, int y)",
        ]);
        let specs = parse_member_specs("func; func2(int, int); missing");
        let mut diagnostics = Diagnostics::default();
        let members = registry.filtered_members(&specs, &mut diagnostics).unwrap();
        let rendered: Vec<String> = members
            .iter()
            .map(|entry| entry.signature.to_string())
            .collect();
        assert_eq!(
            rendered,
            [
                "real func(int x)",
                "real func(int x, int y)",
                "real func2(int x, int y)",
            ]
        );
        let warnings: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
        assert_eq!(warnings, ["found no match for `missing`"]);
    }

    #[test]
    fn member_specs_parse_fragments_and_bare_names() {
        let specs = parse_member_specs("basic; add(real, real); ");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].args, None);
        assert_eq!(specs[1].args.as_ref().unwrap().len(), 2);
    }
}
