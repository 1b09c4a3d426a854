//! Recursive-descent rules over the token stream
//!
//! Rules never undo their own consumption on failure. Every speculative
//! attempt is wrapped by its caller in a frame, which is then committed,
//! captured or rolled back.
//!
//! An occurrence attempt depends only on where it starts and how deeply it
//! is nested, so each attempt is remembered and replayed instead of
//! re-parsed. Nesting is capped at [`MAX_NESTING`] levels; deeper opening
//! tags are read as literal content.

use std::collections::HashMap;

use super::ast::{Parameters, ParsedShortcode, Positions};
use super::lexer::{Token, TokenKind};
use super::stream::TokenStream;

/// Sentinel for a rule that did not match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NoMatch;

type Rule<T> = Result<T, NoMatch>;

/// Deepest level at which an occurrence can be nested inside another
pub const MAX_NESTING: usize = 256;

/// A matched occurrence still missing its source text
#[derive(Clone)]
struct Occurrence {
    name: String,
    parameters: Parameters,
    bbcode: Option<String>,
    content: Option<String>,
    offset: usize,
    positions: Positions,
}

impl Occurrence {
    fn into_shortcode(self, text: String) -> ParsedShortcode {
        ParsedShortcode {
            name: self.name,
            parameters: self.parameters,
            bbcode: self.bbcode,
            content: self.content,
            text,
            offset: self.offset,
            positions: self.positions,
        }
    }
}

/// Outcome of an earlier occurrence attempt and where it left the stream
struct Attempt {
    result: Rule<Occurrence>,
    end: usize,
}

pub(crate) struct Grammar<'a> {
    stream: TokenStream<'a>,
    depth: usize,
    /// Keyed by (tokens consumed at the start, nesting depth)
    attempts: HashMap<(usize, usize), Attempt>,
}

impl<'a> Grammar<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            depth: 0,
            attempts: HashMap::new(),
        }
    }

    /// Collect every root-level occurrence
    ///
    /// Text between occurrences and spans that fail to parse are skipped.
    pub fn document(mut self) -> Vec<ParsedShortcode> {
        let mut shortcodes = Vec::new();

        loop {
            while !self.stream.is_empty() && self.stream.lookahead(&[TokenKind::Open]).is_none() {
                self.stream.skip();
            }
            if self.stream.is_empty() {
                break;
            }

            self.stream.open_frame();
            match self.occurrence() {
                Ok(occurrence) => {
                    let text = self.stream.capture_frame();
                    shortcodes.push(occurrence.into_shortcode(text));
                }
                // Whatever the failed attempt consumed stays consumed
                Err(NoMatch) => self.stream.commit_frame(),
            }
        }

        shortcodes
    }

    fn occurrence(&mut self) -> Rule<Occurrence> {
        if self.depth >= MAX_NESTING {
            return Err(NoMatch);
        }

        let key = (self.stream.consumed(), self.depth);
        if let Some(attempt) = self.attempts.get(&key) {
            let (result, end) = (attempt.result.clone(), attempt.end);
            self.stream.advance_to(end);
            return result;
        }

        let result = self.parse_occurrence();
        self.attempts.insert(
            key,
            Attempt {
                result: result.clone(),
                end: self.stream.consumed(),
            },
        );
        result
    }

    fn parse_occurrence(&mut self) -> Rule<Occurrence> {
        let open = self.expect(&[TokenKind::Open], true)?;
        let base = open.offset;
        let name = self.expect(&[TokenKind::String], true)?;
        let bbcode = self.bbcode()?;
        let parameters_at = self.stream.position().ok_or(NoMatch)?;
        let parameters = self.arguments()?;

        let mut occurrence = Occurrence {
            name: name.text.to_string(),
            parameters,
            bbcode,
            content: None,
            offset: base,
            positions: Positions {
                name: name.offset - base,
                parameters: parameters_at - base,
                marker: None,
                content: None,
            },
        };

        if let Some(marker) = self.stream.consume(&[TokenKind::Marker], true) {
            self.expect(&[TokenKind::Close], false)?;
            occurrence.positions.marker = Some(marker.offset - base);
            return Ok(occurrence);
        }

        self.expect(&[TokenKind::Close], false)?;

        self.stream.open_frame();
        self.depth += 1;
        let body = match self.stream.position() {
            Some(at) => self.content(name.text).ok().map(|content| (at, content)),
            None => None,
        };
        self.depth -= 1;
        let Some((content_at, content)) = body else {
            // No matching closing tag: the opening tag stands alone
            self.stream.rollback_frame();
            return Ok(occurrence);
        };
        self.stream.commit_frame();

        let closing_name = self.closing_tag()?;
        if closing_name.text != name.text {
            return Err(NoMatch);
        }

        occurrence.content = Some(content);
        occurrence.positions.content = Some(content_at - base);
        occurrence.positions.marker = Some(closing_name.marker - base);
        Ok(occurrence)
    }

    fn content(&mut self, name: &str) -> Rule<String> {
        let mut content = String::new();

        loop {
            while let Some(token) = self
                .stream
                .consume(&[TokenKind::String, TokenKind::Whitespace], false)
            {
                content.push_str(token.text);
            }

            self.stream.open_frame();
            if self.occurrence().is_ok() {
                content.push_str(&self.stream.capture_frame());
                continue;
            }
            self.stream.rollback_frame();

            self.stream.open_frame();
            let closes = self
                .closing_tag()
                .is_ok_and(|closing| closing.text == name);
            self.stream.rollback_frame();
            if closes {
                return Ok(content);
            }

            if let Some(token) = self.stream.consume_any(false) {
                content.push_str(token.text);
            }
            if self.stream.is_empty() {
                return Err(NoMatch);
            }
        }
    }

    /// `[/name]`, returning the name and the marker offset
    fn closing_tag(&mut self) -> Rule<ClosingName<'a>> {
        self.expect(&[TokenKind::Open], true)?;
        let marker = self.expect(&[TokenKind::Marker], true)?;
        let name = self.expect(&[TokenKind::String], true)?;
        self.expect(&[TokenKind::Close], false)?;
        Ok(ClosingName {
            text: name.text,
            marker: marker.offset,
        })
    }

    fn bbcode(&mut self) -> Rule<Option<String>> {
        if self.stream.consume(&[TokenKind::Separator], false).is_none() {
            return Ok(None);
        }
        self.value().map(Some)
    }

    fn arguments(&mut self) -> Rule<Parameters> {
        let mut parameters = Parameters::new();

        loop {
            self.stream.consume(&[TokenKind::Whitespace], false);
            if self
                .stream
                .lookahead(&[TokenKind::Marker, TokenKind::Close])
                .is_some()
            {
                return Ok(parameters);
            }

            let name = self.expect(&[TokenKind::String], true)?;
            if self.stream.consume(&[TokenKind::Separator], true).is_none() {
                parameters.insert(name.text, None);
                continue;
            }
            let value = self.value()?;
            self.stream.consume(&[TokenKind::Whitespace], false);
            parameters.insert(name.text, Some(value));
        }
    }

    fn value(&mut self) -> Rule<String> {
        if self.stream.consume(&[TokenKind::Delimiter], false).is_some() {
            let mut value = String::new();
            while self.stream.lookahead(&[TokenKind::Delimiter]).is_none() {
                let token = self.stream.consume_any(false).ok_or(NoMatch)?;
                value.push_str(token.text);
            }
            self.expect(&[TokenKind::Delimiter], false)?;
            return Ok(value);
        }

        self.expect(&[TokenKind::String], false)
            .map(|token| token.text.to_string())
    }

    fn expect(&mut self, kinds: &[TokenKind], skip_whitespace: bool) -> Rule<Token<'a>> {
        self.stream.consume(kinds, skip_whitespace).ok_or(NoMatch)
    }
}

struct ClosingName<'a> {
    text: &'a str,
    marker: usize,
}
