//! Step pattern compiler.
//!
//! Turns a Cucumber-style expression such as
//! `I send a {word} request to {string}` into an anchored [`Regex`] plus
//! the ordered list of placeholder kinds used to coerce each capture.
//!
//! Supported placeholders:
//! - `{string}`: a double-quoted literal (quotes excluded from the value);
//!   in [`StringMode::Lenient`] also a bare non-whitespace token
//! - `{int}`: one or more ASCII digits, coerced to `i64`
//! - `{word}`: a non-whitespace token, verbatim
//!
//! Everything else in the pattern, including unknown `{...}` groups, is
//! matched literally.

use crate::args::Arg;
use crate::error::PatternError;
use regex::Regex;
use std::fmt;

/// How `{string}` placeholders match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringMode {
    /// Only `"quoted text"`.
    Strict,
    /// `"quoted text"` or a single unquoted token.
    #[default]
    Lenient,
}

/// The kind of a placeholder, recorded per capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    String,
    Int,
    Word,
}

impl ParamKind {
    const PLACEHOLDERS: [(&'static str, ParamKind); 3] = [
        ("{string}", ParamKind::String),
        ("{int}", ParamKind::Int),
        ("{word}", ParamKind::Word),
    ];

    /// Regex fragment for this placeholder.
    fn capture(self, mode: StringMode) -> &'static str {
        match (self, mode) {
            (Self::String, StringMode::Strict) => r#""([^"]*)""#,
            (Self::String, StringMode::Lenient) => r#"(?:"([^"]*)"|(\S+))"#,
            (Self::Int, _) => r"(\d+)",
            (Self::Word, _) => r"(\S+)",
        }
    }

    /// Number of capture groups the fragment contributes.
    fn groups(self, mode: StringMode) -> usize {
        match (self, mode) {
            (Self::String, StringMode::Lenient) => 2,
            _ => 1,
        }
    }

    /// Coerce captured text. `None` means the capture cannot become this
    /// kind (an `{int}` beyond `i64`).
    fn coerce(self, raw: &str) -> Option<Arg> {
        match self {
            Self::Int => raw.parse::<i64>().ok().map(Arg::Int),
            Self::String => {
                let unquoted = raw.strip_prefix('"').unwrap_or(raw);
                let unquoted = unquoted.strip_suffix('"').unwrap_or(unquoted);
                Some(Arg::Str(unquoted.to_string()))
            }
            Self::Word => Some(Arg::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Word => write!(f, "word"),
        }
    }
}

/// A compiled step pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
    params: Vec<ParamKind>,
    mode: StringMode,
}

impl CompiledPattern {
    /// Compile `pattern`, anchoring it to match whole step texts only.
    pub fn compile(pattern: &str, mode: StringMode) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(pattern.len() * 2 + 2);
        let mut params = Vec::new();
        expr.push('^');

        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            expr.push_str(&regex::escape(literal));
            match ParamKind::PLACEHOLDERS
                .iter()
                .find(|(placeholder, _)| tail.starts_with(placeholder))
            {
                Some((placeholder, kind)) => {
                    expr.push_str(kind.capture(mode));
                    params.push(*kind);
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    expr.push_str(r"\{");
                    rest = &tail[1..];
                }
            }
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            params,
            mode,
        })
    }

    /// The pattern as registered.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled, anchored expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Placeholder kinds in occurrence order.
    pub fn param_kinds(&self) -> &[ParamKind] {
        &self.params
    }

    /// Match `text` in full and return the coerced captures.
    ///
    /// Returns `None` when the text does not match or a capture cannot be
    /// coerced to its kind.
    pub fn captures(&self, text: &str) -> Option<Vec<Arg>> {
        let caps = self.regex.captures(text)?;
        let mut args = Vec::with_capacity(self.params.len());
        let mut group = 1;
        for kind in &self.params {
            let width = kind.groups(self.mode);
            let raw = (group..group + width)
                .find_map(|i| caps.get(i))
                .map_or("", |m| m.as_str());
            group += width;
            args.push(kind.coerce(raw)?);
        }
        Some(args)
    }

    /// `true` when `text` matches in full.
    pub fn is_match(&self, text: &str) -> bool {
        self.captures(text).is_some()
    }
}
