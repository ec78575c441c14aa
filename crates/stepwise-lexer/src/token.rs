//! Line tokens for the stepwise lexer.
//!
//! Feature files are line-oriented, so the lexer emits one [`Line`] per
//! source line, classified by [`LineKind`].

use std::fmt;
use stepwise_types::Keyword;

/// Header that opens a scenario block.
pub const SCENARIO_HEADER: &str = "Scenario:";

/// Delimiter that opens and closes a doc-string.
pub const DOC_STRING_FENCE: &str = "\"\"\"";

// ─────────────────────────────────────────────────────────────────────
// Line
// ─────────────────────────────────────────────────────────────────────

/// A single classified source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// What kind of line this is.
    pub kind: LineKind,
    /// The line as written, without its terminator.
    pub raw: String,
    /// 1-based line number.
    pub line: u32,
}

impl Line {
    /// Create a new line token.
    pub fn new(kind: LineKind, raw: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            raw: raw.into(),
            line,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// LineKind
// ─────────────────────────────────────────────────────────────────────

/// Every line shape the parser distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `Scenario: name`, carrying the trimmed name.
    ScenarioHeader(String),
    /// `Given|When|Then|And|But text`, carrying the trimmed text.
    Step(Keyword, String),
    /// A line that is exactly `"""` once trimmed.
    DocStringFence,
    /// `| a | b |`, carrying the trimmed cells.
    TableRow(Vec<String>),
    /// Anything else: blank lines, `Feature:` headers, comments, prose.
    Other,
}

impl LineKind {
    pub fn is_table_row(&self) -> bool {
        matches!(self, Self::TableRow(_))
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScenarioHeader(name) => write!(f, "{SCENARIO_HEADER} {name}"),
            Self::Step(keyword, text) => write!(f, "{keyword} {text}"),
            Self::DocStringFence => f.write_str(DOC_STRING_FENCE),
            Self::TableRow(cells) => write!(f, "| {} |", cells.join(" | ")),
            Self::Other => f.write_str("<other>"),
        }
    }
}
