//! Recursive-descent parser for the Stan function-signature grammar.
//!
//! ```text
//! signature := [ type WS ] identifier "(" [ arglist ] ")"
//! arglist   := arg ("," WS* arg)*
//! arg       := type [ WS identifier ]
//! type      := [ "array" WS* "[" dims "]" WS* ] base_type
//! dims      := "" | "," | ",," | ...      dim count = comma count + 1
//! ```
//!
//! Reference fragments (cross-reference targets, member filters) relax the
//! grammar: no return type, no argument identifiers. See [`ParseOptions`].

use crate::lex;
use crate::model::{Signature, TypedIdentifier};
use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:array\s*\[(?P<dims>[,\s]*)\])?\s*(?P<base_type>\w+)").unwrap()
});

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<identifier>\w+)\s*").unwrap());

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+").unwrap());

static OPEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(\s*").unwrap());

static CLOSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\)\s*").unwrap());

static SEPARATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^,\s*").unwrap());

/// Which parts of the signature grammar the caller expects.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Expect a return type before the function name.
    pub want_type: bool,
    /// Expect the function name itself.
    pub want_identifier: bool,
    /// Expect each argument to carry an identifier after its type.
    pub want_arg_identifiers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            want_type: true,
            want_identifier: true,
            want_arg_identifiers: true,
        }
    }
}

impl ParseOptions {
    /// Options for reference fragments: `identifier ["(" type ("," type)* ")"]`.
    pub fn reference() -> Self {
        ParseOptions {
            want_type: false,
            want_identifier: true,
            want_arg_identifiers: false,
        }
    }
}

/// Parse a typed identifier from the front of `text`.
///
/// With `want_type`, consumes an optional `array [..]` dimension marker and a
/// base type token. With both flags, mandatory whitespace separates type and
/// identifier. The token patterns consume their own trailing whitespace, so
/// callers need no extra skipping between tokens.
pub fn parse_typed_identifier(
    text: &str,
    want_type: bool,
    want_identifier: bool,
) -> Result<(TypedIdentifier, &str)> {
    if !want_type && !want_identifier {
        bail!("requested neither a type nor an identifier from `{}`", text);
    }
    let mut parsed = TypedIdentifier::default();
    let mut remainder = text;
    if want_type {
        let (caps, rest) = lex::match_and_consume(&TYPE_PATTERN, remainder)?;
        parsed.base_type = Some(caps["base_type"].to_string());
        parsed.dims = caps
            .name("dims")
            .map(|dims| dims.as_str().matches(',').count() + 1);
        remainder = rest;
    }
    if want_type && want_identifier {
        let (_, rest) = lex::match_and_consume(&WHITESPACE_PATTERN, remainder)?;
        remainder = rest;
    }
    if want_identifier {
        let (caps, rest) = lex::match_and_consume(&IDENTIFIER_PATTERN, remainder)?;
        parsed.identifier = Some(caps["identifier"].to_string());
        remainder = rest;
    }
    Ok((parsed, remainder))
}

/// Parse a signature, returning the unconsumed remainder.
///
/// If no opening parenthesis follows the leading typed identifier, the
/// signature has no argument list (`args = None`) — the name-only reference
/// shape. Otherwise arguments are parsed until the first span that is not a
/// typed identifier; the closing parenthesis is then mandatory, and its
/// absence is a hard parse failure.
pub fn parse_signature_partial<'t>(
    text: &'t str,
    options: &ParseOptions,
) -> Result<(Signature, &'t str)> {
    let (head, remainder) =
        parse_typed_identifier(text, options.want_type, options.want_identifier)?;
    let mut signature = Signature {
        head,
        args: None,
        text: text.to_string(),
        doc: None,
        location: None,
    };
    let Some((_, mut remainder)) = lex::try_consume(&OPEN_PATTERN, remainder) else {
        return Ok((signature, remainder));
    };
    let mut args = Vec::new();
    loop {
        let Ok((arg, after_arg)) =
            parse_typed_identifier(remainder, true, options.want_arg_identifiers)
        else {
            break;
        };
        args.push(arg);
        match lex::try_consume(&SEPARATOR_PATTERN, after_arg) {
            Some((_, after_separator)) => remainder = after_separator,
            None => {
                remainder = after_arg;
                break;
            }
        }
    }
    let (_, remainder) = lex::match_and_consume(&CLOSE_PATTERN, remainder)?;
    signature.args = Some(args);
    Ok((signature, remainder))
}

/// Parse a signature, ignoring any unconsumed trailing text.
pub fn parse_signature(text: &str, options: &ParseOptions) -> Result<Signature> {
    let (signature, _) = parse_signature_partial(text, options)?;
    Ok(signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str, options: &ParseOptions) -> Signature {
        let signature = parse_signature(text, options).unwrap();
        assert_eq!(signature.to_string(), text);
        signature
    }

    // Signature examples from the Stan user's guide chapter on functions.

    #[test]
    fn parse_basic() {
        let signature = roundtrip("void basic()", &ParseOptions::default());
        assert_eq!(signature.identifier(), "basic");
        assert_eq!(signature.head.base_type.as_deref(), Some("void"));
        assert_eq!(signature.args.as_deref(), Some(&[][..]));
    }

    #[test]
    fn parse_two_args() {
        let signature = roundtrip("real relative_diff(real x, real y)", &ParseOptions::default());
        let args = signature.args.unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].identifier.as_deref(), Some("x"));
        assert_eq!(args[1].identifier.as_deref(), Some("y"));
        assert_eq!(args[1].base_type.as_deref(), Some("real"));
    }

    #[test]
    fn parse_vector_arg() {
        let signature = roundtrip("real entropy(vector theta)", &ParseOptions::default());
        let args = signature.args.unwrap();
        assert_eq!(args[0].base_type.as_deref(), Some("vector"));
        assert_eq!(args[0].dims, None);
    }

    #[test]
    fn parse_array_dims() {
        let signature = roundtrip("array [] real baz(array [,] real x)", &ParseOptions::default());
        assert_eq!(signature.head.base_type.as_deref(), Some("real"));
        assert_eq!(signature.head.dims, Some(1));
        let args = signature.args.unwrap();
        assert_eq!(args[0].identifier.as_deref(), Some("x"));
        assert_eq!(args[0].dims, Some(2));
    }

    #[test]
    fn parse_anonymous_args() {
        let options = ParseOptions {
            want_arg_identifiers: false,
            ..ParseOptions::default()
        };
        let signature = roundtrip("void overloaded(array [,,] real)", &options);
        let args = signature.args.unwrap();
        assert_eq!(args[0].identifier, None);
        assert_eq!(args[0].base_type.as_deref(), Some("real"));
        assert_eq!(args[0].dims, Some(3));
    }

    #[test]
    fn parse_reference_fragment() {
        let signature = roundtrip("overloaded(array [,] real)", &ParseOptions::reference());
        assert_eq!(signature.head.base_type, None);
        assert_eq!(signature.identifier(), "overloaded");
        assert_eq!(signature.args.unwrap()[0].dims, Some(2));
    }

    #[test]
    fn parse_name_only_reference() {
        let signature = roundtrip("foobar", &ParseOptions::reference());
        assert_eq!(signature.args, None);
    }

    #[test]
    fn spacing_is_normalized() {
        let signature =
            parse_signature("array[ ,] real f(real  x,int y)", &ParseOptions::default()).unwrap();
        assert_eq!(signature.to_string(), "array [,] real f(real x, int y)");
    }

    #[test]
    fn missing_close_paren_is_hard_failure() {
        assert!(parse_signature("real f(real x", &ParseOptions::default()).is_err());
        assert!(parse_signature("real f(real x,", &ParseOptions::default()).is_err());
    }

    #[test]
    fn missing_base_type_is_hard_failure() {
        assert!(parse_signature("()", &ParseOptions::default()).is_err());
    }

    #[test]
    fn remainder_is_returned() {
        let (signature, remainder) =
            parse_signature_partial("real f(real x) { return x; }", &ParseOptions::default())
                .unwrap();
        assert_eq!(signature.to_string(), "real f(real x)");
        assert_eq!(remainder, "{ return x; }");
    }

    #[test]
    fn typed_identifier_needs_a_request() {
        assert!(parse_typed_identifier("real x", false, false).is_err());
    }

    #[test]
    fn typed_identifier_type_only() {
        let (parsed, remainder) = parse_typed_identifier("array [,] real, int", true, false).unwrap();
        assert_eq!(parsed.base_type.as_deref(), Some("real"));
        assert_eq!(parsed.dims, Some(2));
        assert_eq!(parsed.identifier, None);
        assert_eq!(remainder, ", int");
    }

    #[test]
    fn bracket_without_commas_is_one_dim() {
        let (parsed, _) = parse_typed_identifier("array [] real x", true, true).unwrap();
        assert_eq!(parsed.dims, Some(1));
    }

    // Matching table for parsed reference/candidate pairs.
    #[test]
    fn match_table() {
        use crate::model::MatchScore::{Full, NameOnly, None as NoMatch};
        let cases = [
            ("overload", "void overload(real x, int y)", NameOnly),
            ("overload(real, real)", "void overload(real x, int y)", NoMatch),
            ("overload(real)", "void overload(real x, int y)", NoMatch),
            ("overload(real, int)", "void overload(real x, int y)", Full),
            ("overload(real, int)", "void overload(real x, array [,] int y)", NoMatch),
            (
                "overload(real, array [,,] int)",
                "void overload(real x, array [,] int y)",
                NoMatch,
            ),
            (
                "overload(real, array [,] int)",
                "void overload(real x, array [,] int y)",
                Full,
            ),
            ("overloaded", "void overload(real x, int y)", NoMatch),
            ("overloaded(real, int)", "void overload(real x, int y)", NoMatch),
        ];
        for (target, candidate, expected) in cases {
            let target = parse_signature(target, &ParseOptions::reference()).unwrap();
            let candidate = parse_signature(candidate, &ParseOptions::default()).unwrap();
            assert_eq!(
                target.matches(&candidate).unwrap(),
                expected,
                "`{}` against `{}`",
                target,
                candidate
            );
        }
    }
}
