//! Core stepwise lexer. Classifies feature text line by line.
//!
//! Features:
//! - `Scenario:` headers, Given/When/Then/And/But steps
//! - `"""` doc-string fences and `|` table rows
//! - CRLF and LF line endings
//! - Lenient: unrecognised lines become [`LineKind::Other`], never errors

use stepwise_types::{Keyword, SourceFile};

use crate::token::{Line, LineKind, DOC_STRING_FENCE, SCENARIO_HEADER};

/// The stepwise lexer.
///
/// Converts a [`SourceFile`] into one [`Line`] per source line. Context
/// (whether a line sits inside a doc-string) is the parser's concern, so
/// each line is classified on its own.
pub struct Lexer<'src> {
    source_file: &'src SourceFile,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self { source_file }
    }

    /// Lex the entire source file.
    pub fn lex(self) -> Vec<Line> {
        if self.source_file.source.is_empty() {
            return Vec::new();
        }
        self.source_file
            .lines()
            .map(|(number, raw)| Line::new(classify(raw), raw, number))
            .collect()
    }
}

/// Classify a single line of feature text.
pub fn classify(raw: &str) -> LineKind {
    let line = raw.trim();

    if let Some(name) = line.strip_prefix(SCENARIO_HEADER) {
        return LineKind::ScenarioHeader(name.trim().to_string());
    }

    for keyword in Keyword::ALL {
        if let Some(text) = line
            .strip_prefix(keyword.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
        {
            return LineKind::Step(keyword, text.trim().to_string());
        }
    }

    if line == DOC_STRING_FENCE {
        return LineKind::DocStringFence;
    }

    if line.starts_with('|') {
        return LineKind::TableRow(split_row(line));
    }

    LineKind::Other
}

/// Split a `| a | b |` row into trimmed cells.
///
/// Only the empty cells produced by the outer pipes are dropped; an empty
/// cell between two pipes is kept as `""`.
fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(String::from).collect()
}
