//! stepwise lexer: converts feature text into classified lines.

pub mod lexer;
pub mod token;

pub use lexer::{classify, Lexer};
pub use token::{Line, LineKind, DOC_STRING_FENCE, SCENARIO_HEADER};
