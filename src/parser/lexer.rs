//! Tokenizer for shortcode markup
//!
//! Syntax literals are configurable at runtime, so they are matched by hand
//! first; everything else goes through a small logos lexer.

use logos::Logos;

use crate::syntax::Syntax;

/// Token categories produced by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Open,
    Close,
    Marker,
    Separator,
    Delimiter,
    Whitespace,
    String,
}

/// A token borrowing its text from the tokenized input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Codepoint index of the first character in the input
    pub offset: usize,
}

/// Rules applied wherever no syntax literal matches
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"\s+")]
    Whitespace,

    #[regex(r"[\w-]+")]
    Word,

    // Escaped pair, e.g. `\]`
    #[regex(r"\\(.|\n)")]
    Escape,
}

/// Split the whole input into tokens
///
/// Every codepoint belongs to exactly one token. Literals are tried in the
/// order open, close, marker, separator, delimiter, regardless of length.
pub fn tokenize<'a>(input: &'a str, syntax: &Syntax) -> Vec<Token<'a>> {
    let literals = [
        (TokenKind::Open, syntax.opening_tag()),
        (TokenKind::Close, syntax.closing_tag()),
        (TokenKind::Marker, syntax.closing_tag_marker()),
        (TokenKind::Separator, syntax.parameter_value_separator()),
        (TokenKind::Delimiter, syntax.parameter_value_delimiter()),
    ];

    let mut tokens = Vec::new();
    let mut byte = 0;
    let mut offset = 0;

    while byte < input.len() {
        let rest = &input[byte..];
        let (kind, len) = literals
            .iter()
            .find(|(_, literal)| !literal.is_empty() && rest.starts_with(*literal))
            .map(|(kind, literal)| (*kind, literal.len()))
            .unwrap_or_else(|| scan(rest));

        let text = &rest[..len];
        tokens.push(Token { kind, text, offset });
        offset += text.chars().count();
        byte += len;
    }

    tokens
}

/// Match the generic rules at the start of `rest`, falling back to one codepoint
fn scan(rest: &str) -> (TokenKind, usize) {
    let mut lexer = Lexeme::lexer(rest);
    let matched = lexer.next();
    let span = lexer.span();

    match matched {
        Some(Ok(Lexeme::Whitespace)) if span.start == 0 => (TokenKind::Whitespace, span.end),
        Some(Ok(_)) if span.start == 0 => (TokenKind::String, span.end),
        _ => (
            TokenKind::String,
            rest.chars().next().map_or(rest.len(), char::len_utf8),
        ),
    }
}
