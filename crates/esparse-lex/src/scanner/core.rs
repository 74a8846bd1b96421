//! Core scanner implementation.
//!
//! This module contains the Scanner struct, its position bookkeeping, the
//! state snapshot used for speculative parsing, and the `lex` dispatch.

use esparse_util::{messages, ErrorHandler, Result};

use crate::character;
use crate::token::Token;

/// Marker for an unmatched `{`-like boundary the scanner is inside.
///
/// A `}` closes either a block or a template substitution; the scanner
/// decides by looking at the top of this stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CurlyMark {
    /// A plain `{` punctuator.
    Brace,
    /// A `${` opened inside a template literal.
    Substitution,
}

/// A snapshot of scanner state for speculative parsing.
///
/// Restoring a snapshot rewinds the scanner exactly; the curly stack is
/// truncated back to its saved depth.
#[derive(Clone, Copy, Debug)]
pub struct ScannerState {
    /// Byte position in source.
    pub index: usize,
    /// Line number (1-based).
    pub line_number: u32,
    /// Byte offset of the current line's start.
    pub line_start: usize,
    /// Depth of the curly stack at save time.
    pub curly_depth: usize,
}

/// On-demand tokenizer for ECMAScript source text.
///
/// The scanner hands out one token per [`lex`](Scanner::lex) call and tracks
/// the line/offset bookkeeping every token and error position is derived
/// from. Its client chooses the lexical goal: `lex` for the common goal,
/// [`scan_reg_exp`](Scanner::scan_reg_exp) when context says `/` starts a
/// regular expression, and the JSX entry points inside JSX elements.
pub struct Scanner<'a> {
    /// The source text being scanned.
    source: &'a str,
    /// Error sink shared with the parser through accessors.
    pub(crate) handler: ErrorHandler,
    /// Whether skipped comments are collected and returned.
    pub(crate) track_comment: bool,
    /// Whether the source is a module; HTML-style comments are only
    /// recognized in scripts.
    pub(crate) is_module: bool,
    /// Current byte position.
    pub(crate) index: usize,
    /// Current line (1-based).
    pub(crate) line_number: u32,
    /// Byte offset where the current line starts.
    pub(crate) line_start: usize,
    /// Open `{`/`${` boundaries.
    pub(crate) curly_stack: Vec<CurlyMark>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over the given source.
    ///
    /// # Arguments
    ///
    /// * `source` - the text to scan
    /// * `tolerant` - whether recoverable errors are recorded rather than raised
    pub fn new(source: &'a str, tolerant: bool) -> Self {
        Self {
            source,
            handler: ErrorHandler::new(tolerant),
            track_comment: false,
            is_module: false,
            index: 0,
            line_number: if source.is_empty() { 0 } else { 1 },
            line_start: 0,
            curly_stack: Vec::new(),
        }
    }

    /// Enables comment collection in [`scan_comments`](Scanner::scan_comments).
    pub fn set_track_comment(&mut self, track: bool) {
        self.track_comment = track;
    }

    /// Marks the source as a module, disabling HTML-style comments.
    pub fn set_module(&mut self, is_module: bool) {
        self.is_module = is_module;
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current line number (1-based).
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Byte offset of the current line's start.
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// Returns true when the whole source has been consumed.
    pub fn eof(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Shared error sink.
    pub fn error_handler(&self) -> &ErrorHandler {
        &self.handler
    }

    /// Shared error sink, mutably.
    pub fn error_handler_mut(&mut self) -> &mut ErrorHandler {
        &mut self.handler
    }

    /// Captures the scanner state for later restore.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            index: self.index,
            line_number: self.line_number,
            line_start: self.line_start,
            curly_depth: self.curly_stack.len(),
        }
    }

    /// Rewinds to a previously captured state.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.index = state.index;
        self.line_number = state.line_number;
        self.line_start = state.line_start;
        self.curly_stack.truncate(state.curly_depth);
    }

    /// Moves the read position backwards on the current line.
    ///
    /// Used by the parser to rescan a `/` as the start of a regular
    /// expression once context disambiguates it.
    pub fn reset_index(&mut self, index: usize) {
        debug_assert!(index <= self.index);
        self.index = index;
    }

    /// Returns the character starting at byte offset `i`, or `'\0'` past the
    /// end of the source.
    #[inline]
    pub(crate) fn ch(&self, i: usize) -> char {
        if i >= self.source.len() {
            return '\0';
        }
        // Fast path for ASCII (most common case).
        let b = self.source.as_bytes()[i];
        if b < 128 {
            return b as char;
        }
        self.source[i..].chars().next().unwrap_or('\0')
    }

    /// Reads the character at the current position and advances past it.
    #[inline]
    pub(crate) fn next_char(&mut self) -> char {
        let c = self.ch(self.index);
        if c != '\0' || !self.eof() {
            self.index += c.len_utf8();
        }
        c
    }

    /// Raises "Unexpected token ILLEGAL" at the current position.
    pub(crate) fn unexpected<T>(&self) -> Result<T> {
        self.handler.throw_error(
            self.index,
            self.line_number,
            (self.index - self.line_start + 1) as u32,
            messages::UNEXPECTED_TOKEN_ILLEGAL.to_string(),
        )
    }

    /// Records "Unexpected token ILLEGAL" at the current position when
    /// tolerant, raises it otherwise.
    pub(crate) fn tolerate_unexpected(&mut self) -> Result<()> {
        let index = self.index;
        let line = self.line_number;
        let column = (self.index - self.line_start + 1) as u32;
        self.handler
            .tolerate_error(index, line, column, messages::UNEXPECTED_TOKEN_ILLEGAL.to_string())
    }

    /// Returns the next token without committing to it.
    pub fn peek(&mut self) -> Result<Token> {
        let state = self.save_state();
        let comments_result = self.scan_comments();
        let token = match comments_result {
            Ok(_) => self.lex(),
            Err(error) => Err(error),
        };
        self.restore_state(state);
        token
    }

    /// Scans the next token under the common lexical goal.
    ///
    /// The caller is expected to have skipped whitespace and comments with
    /// [`scan_comments`](Scanner::scan_comments) first.
    pub fn lex(&mut self) -> Result<Token> {
        if self.eof() {
            return Ok(Token::eof(self.index, self.line_number, self.line_start));
        }

        let c = self.ch(self.index);

        if character::is_identifier_start(c) {
            return self.scan_identifier();
        }

        // Very common punctuation with no longer form.
        if c == '(' || c == ')' || c == ';' {
            return self.scan_punctuator();
        }

        if c == '\'' || c == '"' {
            return self.scan_string_literal();
        }

        // A dot can start a fractional number.
        if c == '.' {
            if character::is_decimal_digit(self.ch(self.index + 1)) {
                return self.scan_numeric_literal();
            }
            return self.scan_punctuator();
        }

        if character::is_decimal_digit(c) {
            return self.scan_numeric_literal();
        }

        // A backtick starts a template; a `}` resumes one when the innermost
        // open curly is a `${`.
        if c == '`'
            || (c == '}' && self.curly_stack.last() == Some(&CurlyMark::Substitution))
        {
            return self.scan_template();
        }

        self.scan_punctuator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source, false);
        let mut tokens = Vec::new();
        loop {
            scanner.scan_comments().unwrap();
            let token = scanner.lex().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_empty_source() {
        let mut scanner = Scanner::new("", false);
        let token = scanner.lex().unwrap();
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.start, 0);
    }

    #[test]
    fn test_dispatch() {
        let tokens = lex_all("var x = 42;");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Punctuator,
                TokenKind::NumericLiteral,
                TokenKind::Punctuator,
            ]
        );
    }

    #[test]
    fn test_token_ranges_are_ordered() {
        let tokens = lex_all("a + b * c");
        for pair in tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for token in &tokens {
            assert!(token.start < token.end);
        }
    }

    #[test]
    fn test_peek_does_not_commit() {
        let mut scanner = Scanner::new("  foo bar", false);
        let peeked = scanner.peek().unwrap();
        assert_eq!(peeked.text(), "foo");
        assert_eq!(scanner.index(), 0);
        scanner.scan_comments().unwrap();
        assert_eq!(scanner.lex().unwrap(), peeked);
    }

    #[test]
    fn test_save_restore() {
        let mut scanner = Scanner::new("foo bar", false);
        scanner.scan_comments().unwrap();
        let state = scanner.save_state();
        let first = scanner.lex().unwrap();
        scanner.restore_state(state);
        let again = scanner.lex().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_dot_number_vs_punctuator() {
        let tokens = lex_all(".5");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::NumericLiteral);

        let tokens = lex_all("a.b");
        assert_eq!(tokens[1].kind, TokenKind::Punctuator);
        assert_eq!(tokens[1].text(), ".");
    }
}
