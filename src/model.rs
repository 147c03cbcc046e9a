//! Data model for parsed Stan signatures — format-agnostic.

use anyhow::{bail, Result};
use std::fmt;

/// A (type, identifier) pair with optional array dimensionality.
///
/// Building block of both signatures and arguments. Represents a full
/// parameter (`real x`), a bare type (`real`, argument-type-only matching),
/// or an anonymous placeholder when both fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedIdentifier {
    pub identifier: Option<String>,
    pub base_type: Option<String>,
    /// Number of free array axes (`array [,]` → 2). `None` means scalar.
    pub dims: Option<usize>,
}

impl TypedIdentifier {
    /// The type part with its array marker, e.g. `array [,] real`.
    fn full_type(&self) -> Option<String> {
        let base = self.base_type.as_ref()?;
        match self.dims {
            Some(dims) if dims > 0 => {
                Some(format!("array [{}] {}", ",".repeat(dims - 1), base))
            }
            _ => Some(base.clone()),
        }
    }
}

impl fmt::Display for TypedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(full_type) = self.full_type() {
            parts.push(full_type);
        }
        if let Some(identifier) = &self.identifier {
            parts.push(identifier.clone());
        }
        if parts.is_empty() {
            return write!(f, "...");
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Where a signature was found in its source file. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A parsed Stan function signature.
///
/// `head` carries the return type and function name. `args = None` means the
/// argument list was not specified (a name-only reference that matches any
/// overload); `Some(vec![])` is a concrete empty list. Argument order is
/// fixed at parse time — it encodes positional overload identity.
#[derive(Debug, Clone)]
pub struct Signature {
    pub head: TypedIdentifier,
    pub args: Option<Vec<TypedIdentifier>>,
    /// Original input text, kept for diagnostics.
    pub text: String,
    /// Raw associated comment block, if any.
    pub doc: Option<String>,
    pub location: Option<SourceLocation>,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.args == other.args
    }
}

impl Eq for Signature {}

/// How strongly a reference signature matches a candidate.
///
/// Name alone is the weakest signal; full type-and-position equality is the
/// strongest. The return type, when specified, is a hard gate applied once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchScore {
    None,
    NameOnly,
    Full,
}

impl Signature {
    /// A bare name-only signature, used as the fallback when a reference
    /// fragment cannot be parsed as a signature.
    pub fn name_only(identifier: &str) -> Self {
        Signature {
            head: TypedIdentifier {
                identifier: Some(identifier.to_string()),
                base_type: None,
                dims: None,
            },
            args: None,
            text: identifier.to_string(),
            doc: None,
            location: None,
        }
    }

    pub fn identifier(&self) -> &str {
        self.head.identifier.as_deref().unwrap_or("...")
    }

    /// Score this (possibly partial) reference against a fully-qualified
    /// candidate, for the purposes of resolving overloaded functions.
    ///
    /// Candidates always come from the registry, which only stores concrete
    /// argument lists; a candidate without one is an error.
    pub fn matches(&self, candidate: &Signature) -> Result<MatchScore> {
        let Some(candidate_args) = &candidate.args else {
            bail!(
                "candidate signature `{}` is missing its argument list",
                candidate
            );
        };
        if self.head.identifier != candidate.head.identifier {
            return Ok(MatchScore::None);
        }
        if let Some(return_type) = &self.head.base_type {
            if candidate.head.base_type.as_ref() != Some(return_type) {
                return Ok(MatchScore::None);
            }
        }
        let Some(args) = &self.args else {
            return Ok(MatchScore::NameOnly);
        };
        if args.len() != candidate_args.len() {
            return Ok(MatchScore::None);
        }
        for (reference, candidate) in args.iter().zip(candidate_args) {
            if reference.base_type != candidate.base_type || reference.dims != candidate.dims {
                return Ok(MatchScore::None);
            }
            if reference.identifier.is_some() && reference.identifier != candidate.identifier {
                return Ok(MatchScore::None);
            }
        }
        Ok(MatchScore::Full)
    }

    /// Re-serialized signature plus its source location, for diagnostics.
    pub fn describe(&self) -> String {
        match &self.location {
            Some(location) => format!("{} at {}", self, location),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if let Some(args) = &self.args {
            let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}
