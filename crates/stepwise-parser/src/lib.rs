//! stepwise parser: converts classified lines into scenarios.

mod parser;

pub use parser::Parser;

use stepwise_lexer::Lexer;
use stepwise_types::{Scenario, SourceFile};

/// Lex and parse feature text in one call.
pub fn parse_feature(text: &str) -> Vec<Scenario> {
    let source = SourceFile::new("<feature>", text);
    Parser::new(Lexer::new(&source).lex()).parse()
}
