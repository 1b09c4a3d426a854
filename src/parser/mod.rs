//! Shortcode parser: tokenizer, backtracking token stream and grammar

pub mod ast;
mod grammar;
pub mod lexer;
mod stream;

pub use ast::*;
pub use grammar::MAX_NESTING;

use crate::syntax::Syntax;
use grammar::Grammar;

/// Anything that can turn text into root-level shortcode occurrences
///
/// Parsing never fails: malformed markup simply yields no occurrence for
/// that span.
pub trait ShortcodeParser {
    fn parse(&self, text: &str) -> Vec<ParsedShortcode>;
}

/// Backtracking recursive-descent parser
#[derive(Debug, Clone, Default)]
pub struct RegularParser {
    syntax: Syntax,
}

impl RegularParser {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }
}

impl ShortcodeParser for RegularParser {
    fn parse(&self, text: &str) -> Vec<ParsedShortcode> {
        let tokens = lexer::tokenize(text, &self.syntax);
        Grammar::new(tokens).document()
    }
}

/// Parse text with the default syntax
pub fn parse(text: &str) -> Vec<ParsedShortcode> {
    RegularParser::default().parse(text)
}
