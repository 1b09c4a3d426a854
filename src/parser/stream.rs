//! Consumable token queue with nested backtrack frames

use std::collections::VecDeque;

use super::lexer::{Token, TokenKind};

/// Token queue consumed front to back
///
/// Frames record consumed tokens so a speculative parse can be kept,
/// turned back into source text, or undone. Frames form a strict stack and
/// every frame operation targets the innermost one. All open frames record
/// the same tokens in the same order, so each frame is a mark into one shared
/// recording and an outer frame always sees a suffix of what it recorded.
#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: VecDeque<Token<'a>>,
    recorded: Vec<Token<'a>>,
    frames: Vec<usize>,
    consumed: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens: tokens.into(),
            recorded: Vec::new(),
            frames: Vec::new(),
            consumed: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Offset of the front token, `None` at end of stream
    pub fn position(&self) -> Option<usize> {
        self.tokens.front().map(|t| t.offset)
    }

    /// Number of tokens taken off the front so far, net of rollbacks
    ///
    /// Identifies the remaining input: the same count always leaves the same
    /// tokens on the stream.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Peek at the front token if its kind is one of `kinds`
    pub fn lookahead(&self, kinds: &[TokenKind]) -> Option<Token<'a>> {
        self.tokens
            .front()
            .filter(|t| kinds.contains(&t.kind))
            .copied()
    }

    /// Consume the front token if its kind is one of `kinds`
    pub fn consume(&mut self, kinds: &[TokenKind], skip_whitespace: bool) -> Option<Token<'a>> {
        self.lookahead(kinds)?;
        self.take(skip_whitespace)
    }

    /// Consume the front token whatever its kind
    pub fn consume_any(&mut self, skip_whitespace: bool) -> Option<Token<'a>> {
        self.take(skip_whitespace)
    }

    /// Consume tokens until `consumed()` reaches `target`
    pub fn advance_to(&mut self, target: usize) {
        while self.consumed < target && self.take(false).is_some() {}
    }

    /// Drop the front token without recording it in any frame
    pub fn skip(&mut self) {
        if self.tokens.pop_front().is_some() {
            self.consumed += 1;
        }
    }

    fn take(&mut self, skip_whitespace: bool) -> Option<Token<'a>> {
        let token = self.tokens.pop_front()?;
        self.consumed += 1;
        if !self.frames.is_empty() {
            self.recorded.push(token);
        }
        if skip_whitespace {
            self.consume(&[TokenKind::Whitespace], false);
        }
        Some(token)
    }

    pub fn open_frame(&mut self) {
        self.frames.push(self.recorded.len());
    }

    /// Close the innermost frame, keeping its tokens consumed
    pub fn commit_frame(&mut self) {
        self.frames.pop();
        self.release();
    }

    /// Close the innermost frame and return the source text it consumed
    pub fn capture_frame(&mut self) -> String {
        let Some(start) = self.frames.pop() else {
            return String::new();
        };
        let text = self.recorded[start..].iter().map(|t| t.text).collect();
        self.release();
        text
    }

    /// Close the innermost frame and put its tokens back on the stream
    ///
    /// Outer frames recorded the same tokens last, so they lose exactly
    /// those trailing entries.
    pub fn rollback_frame(&mut self) {
        let Some(start) = self.frames.pop() else {
            return;
        };
        for token in self.recorded.drain(start..).rev() {
            self.tokens.push_front(token);
            self.consumed -= 1;
        }
    }

    /// Forget the recording once no frame needs it
    fn release(&mut self) {
        if self.frames.is_empty() {
            self.recorded.clear();
        }
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;
    use crate::syntax::Syntax;
    use TokenKind::*;

    fn stream(input: &str) -> TokenStream<'_> {
        TokenStream::new(tokenize(input, &Syntax::default()))
    }

    #[test]
    fn test_consume_checks_kind() {
        let mut s = stream("[a]");
        assert!(s.consume(&[Close], false).is_none());
        assert_eq!(s.consume(&[Open], false).map(|t| t.text), Some("["));
        assert_eq!(s.position(), Some(1));
    }

    #[test]
    fn test_consume_skips_one_whitespace() {
        let mut s = stream("[  a");
        s.consume(&[Open], true);
        assert_eq!(s.lookahead(&[String]).map(|t| t.text), Some("a"));
    }

    #[test]
    fn test_capture_returns_consumed_text() {
        let mut s = stream("[a b]c");
        s.open_frame();
        s.consume(&[Open], false);
        s.consume(&[String], true);
        s.consume(&[String], false);
        s.consume(&[Close], false);
        assert_eq!(s.capture_frame(), "[a b]");
        assert_eq!(s.depth(), 0);
        assert_eq!(s.position(), Some(5));
    }

    #[test]
    fn test_rollback_restores_tokens() {
        let mut s = stream("[a]");
        s.open_frame();
        s.consume_any(false);
        s.consume_any(false);
        s.rollback_frame();
        assert_eq!(s.position(), Some(0));
        assert_eq!(s.lookahead(&[Open]).map(|t| t.text), Some("["));
    }

    #[test]
    fn test_rollback_trims_outer_frames() {
        let mut s = stream("[a]x");
        s.open_frame();
        s.consume(&[Open], false);
        s.open_frame();
        s.consume(&[String], false);
        s.consume(&[Close], false);
        s.rollback_frame();
        s.consume(&[String], false);
        assert_eq!(s.capture_frame(), "[a");
    }

    #[test]
    fn test_commit_keeps_consumption() {
        let mut s = stream("ab cd");
        s.open_frame();
        s.consume(&[String], true);
        s.commit_frame();
        assert_eq!(s.lookahead(&[String]).map(|t| t.text), Some("cd"));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_end_of_stream() {
        let mut s = stream("");
        assert!(s.is_empty());
        assert_eq!(s.position(), None);
        assert!(s.consume_any(false).is_none());
        assert_eq!(s.capture_frame(), "");
    }

    #[test]
    fn test_consumed_tracks_rollback() {
        let mut s = stream("[a b]");
        s.consume(&[Open], false);
        s.open_frame();
        s.consume(&[String], true);
        assert_eq!(s.consumed(), 3);
        s.rollback_frame();
        assert_eq!(s.consumed(), 1);
        assert_eq!(s.lookahead(&[String]).map(|t| t.text), Some("a"));
    }

    #[test]
    fn test_advance_to_records_in_frames() {
        let mut s = stream("[a b]x");
        s.open_frame();
        s.advance_to(5);
        assert_eq!(s.consumed(), 5);
        assert_eq!(s.capture_frame(), "[a b]");
        s.advance_to(100);
        assert!(s.is_empty());
        assert_eq!(s.consumed(), 6);
    }

    #[test]
    fn test_recording_released_after_outermost_frame() {
        let mut s = stream("ab cd");
        s.open_frame();
        s.consume_any(false);
        s.commit_frame();
        s.open_frame();
        s.consume_any(false);
        assert_eq!(s.capture_frame(), " ");
    }
}
