//! Parsed feature nodes: scenarios, steps, doc-strings, data tables.
//!
//! Every node preserves source order. [`BTreeMap`] appears only in
//! [`DataTable::rows_hash`], whose output is a lookup, not a sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Keywords
// ══════════════════════════════════════════════════════════════════════════════

/// The resolved type of a step, used for definition lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Given,
    When,
    Then,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step keyword as written in the feature text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl Keyword {
    /// All recognised step keywords, in the order the lexer tries them.
    pub const ALL: [Keyword; 5] = [
        Keyword::Given,
        Keyword::When,
        Keyword::Then,
        Keyword::And,
        Keyword::But,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Resolve this keyword to a step kind.
    ///
    /// `And`/`But` take the kind of the previous step in the same scenario,
    /// falling back to `Given` when there is none.
    pub fn resolve(self, previous: Option<StepKind>) -> StepKind {
        match self {
            Self::Given => StepKind::Given,
            Self::When => StepKind::When,
            Self::Then => StepKind::Then,
            Self::And | Self::But => previous.unwrap_or(StepKind::Given),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Scenarios & Steps
// ══════════════════════════════════════════════════════════════════════════════

/// `Scenario: name` followed by its steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// 1-based line of the `Scenario:` header.
    pub line: u32,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            steps: Vec::new(),
        }
    }

    /// Kind of the most recently parsed step, if any.
    pub fn last_kind(&self) -> Option<StepKind> {
        self.steps.last().map(|s| s.kind)
    }
}

/// A single Given/When/Then step with its optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Resolved kind (`And`/`But` already inherited).
    pub kind: StepKind,
    /// Keyword as written.
    pub keyword: Keyword,
    /// Step text after the keyword.
    pub text: String,
    /// 1-based source line.
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_table: Option<DataTable>,
}

impl Step {
    pub fn new(kind: StepKind, keyword: Keyword, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            keyword,
            text: text.into(),
            line,
            doc_string: None,
            data_table: None,
        }
    }

    pub fn has_doc_string(&self) -> bool {
        self.doc_string.is_some()
    }

    pub fn has_data_table(&self) -> bool {
        self.data_table.is_some()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Data Tables
// ══════════════════════════════════════════════════════════════════════════════

/// A pipe-delimited table attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert rows to a key/value map.
    ///
    /// Column 0 is the key and column 1 the value; further columns are
    /// ignored and rows with fewer than two cells are skipped. A repeated
    /// key keeps its last value.
    pub fn rows_hash(&self) -> BTreeMap<String, String> {
        self.rows
            .iter()
            .filter(|row| row.len() >= 2)
            .map(|row| (row[0].clone(), row[1].clone()))
            .collect()
    }
}
