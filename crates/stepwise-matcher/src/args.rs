//! Call arguments handed to a step implementation.
//!
//! Arguments arrive in a fixed order: the coerced placeholder captures,
//! then the doc-string (trimmed) if the step has one, then the data table
//! if the step has one.

use crate::error::ArgError;
use std::fmt;
use stepwise_types::DataTable;

/// One positional step argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// `{int}` capture.
    Int(i64),
    /// `{string}` or `{word}` capture.
    Str(String),
    /// The step's doc-string.
    DocString(String),
    /// The step's data table.
    Table(DataTable),
}

impl Arg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "an int",
            Self::Str(_) => "a string",
            Self::DocString(_) => "a doc string",
            Self::Table(_) => "a data table",
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::DocString(s) => write!(f, "\"\"\"{s}\"\"\""),
            Self::Table(t) => write!(f, "<table {} rows>", t.rows.len()),
        }
    }
}

/// Ordered arguments for one step invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepArgs {
    args: Vec<Arg>,
}

impl StepArgs {
    pub fn new(args: Vec<Arg>) -> Self {
        Self { args }
    }

    pub fn push(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }

    fn at(&self, index: usize) -> Result<&Arg, ArgError> {
        self.args.get(index).ok_or(ArgError::Missing { index })
    }

    /// Integer argument at `index`.
    pub fn int(&self, index: usize) -> Result<i64, ArgError> {
        match self.at(index)? {
            Arg::Int(n) => Ok(*n),
            other => Err(ArgError::WrongKind {
                index,
                expected: "an int",
                found: other.kind_name(),
            }),
        }
    }

    /// Text argument at `index`. A doc-string in that position also reads
    /// as text.
    pub fn str(&self, index: usize) -> Result<&str, ArgError> {
        match self.at(index)? {
            Arg::Str(s) | Arg::DocString(s) => Ok(s),
            other => Err(ArgError::WrongKind {
                index,
                expected: "a string",
                found: other.kind_name(),
            }),
        }
    }

    /// The doc-string, wherever it sits.
    pub fn doc_string(&self) -> Result<&str, ArgError> {
        self.args
            .iter()
            .find_map(|a| match a {
                Arg::DocString(s) => Some(s.as_str()),
                _ => None,
            })
            .ok_or(ArgError::NoDocString)
    }

    /// The data table, wherever it sits.
    pub fn table(&self) -> Result<&DataTable, ArgError> {
        self.args
            .iter()
            .find_map(|a| match a {
                Arg::Table(t) => Some(t),
                _ => None,
            })
            .ok_or(ArgError::NoDataTable)
    }
}

impl From<Vec<Arg>> for StepArgs {
    fn from(args: Vec<Arg>) -> Self {
        Self::new(args)
    }
}
