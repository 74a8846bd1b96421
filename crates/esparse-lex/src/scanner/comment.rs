//! Whitespace and comment skipping.
//!
//! Comments are skipped, not tokenized; when comment tracking is on the
//! skipped text is collected and handed back so the parser can surface it
//! through the comment tap. HTML-style comments (`<!--` and a line-leading
//! `-->`) are recognized in scripts only.

use esparse_util::{Position, Result, SourceLocation, Span};

use crate::character::{is_line_terminator, is_white_space};
use crate::token::Comment;
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Skips whitespace and comments up to the next significant character.
    ///
    /// Line terminators update the scanner's line bookkeeping here; tokens
    /// themselves never contain unescaped terminators.
    ///
    /// # Returns
    ///
    /// The comments skipped over, in source order, when tracking is enabled;
    /// an empty list otherwise.
    pub fn scan_comments(&mut self) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();

        // True at start of input or right after a line terminator; the
        // `-->` closing form is only a comment in that position.
        let mut start = self.index == 0;

        while !self.eof() {
            let c = self.ch(self.index);

            if is_white_space(c) {
                self.index += c.len_utf8();
            } else if is_line_terminator(c) {
                self.index += c.len_utf8();
                if c == '\r' && self.ch(self.index) == '\n' {
                    self.index += 1;
                }
                self.line_number += 1;
                self.line_start = self.index;
                start = true;
            } else if c == '/' {
                let next = self.ch(self.index + 1);
                if next == '/' {
                    self.index += 2;
                    let comment = self.skip_single_line_comment(2);
                    if self.track_comment {
                        comments.push(comment);
                    }
                    start = true;
                } else if next == '*' {
                    self.index += 2;
                    let comment = self.skip_multi_line_comment()?;
                    if self.track_comment {
                        comments.push(comment);
                    }
                } else {
                    break;
                }
            } else if start && c == '-' {
                // A `-->` is only a single-line comment at start of line.
                if self.ch(self.index + 1) == '-' && self.ch(self.index + 2) == '>' {
                    self.index += 3;
                    let comment = self.skip_single_line_comment(3);
                    if self.track_comment {
                        comments.push(comment);
                    }
                } else {
                    break;
                }
            } else if c == '<' && !self.is_module {
                if self.source()[self.index..].starts_with("<!--") {
                    self.index += 4;
                    let comment = self.skip_single_line_comment(4);
                    if self.track_comment {
                        comments.push(comment);
                    }
                } else {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(comments)
    }

    /// Skips the rest of a single-line comment whose opener (of byte length
    /// `offset`) has already been consumed.
    fn skip_single_line_comment(&mut self, offset: usize) -> Comment {
        let start = self.index - offset;
        let content_start = self.index;
        let loc_start = Position::new(
            self.line_number,
            (self.index - self.line_start - offset) as u32,
        );

        while !self.eof() {
            let c = self.ch(self.index);
            self.index += c.len_utf8();
            if is_line_terminator(c) {
                let content_end = self.index - c.len_utf8();
                let loc_end = Position::new(
                    self.line_number,
                    (content_end - self.line_start) as u32,
                );
                if c == '\r' && self.ch(self.index) == '\n' {
                    self.index += 1;
                }
                self.line_number += 1;
                self.line_start = self.index;
                return self.make_comment(
                    false,
                    Span::new(start, content_end),
                    Span::new(content_start, content_end),
                    loc_start,
                    loc_end,
                );
            }
        }

        let loc_end = Position::new(self.line_number, (self.index - self.line_start) as u32);
        self.make_comment(
            false,
            Span::new(start, self.index),
            Span::new(content_start, self.index),
            loc_start,
            loc_end,
        )
    }

    /// Skips a multi-line comment whose `/*` has already been consumed.
    ///
    /// An unterminated comment is an error at the scan position.
    fn skip_multi_line_comment(&mut self) -> Result<Comment> {
        let start = self.index - 2;
        let content_start = self.index;
        let loc_start = Position::new(
            self.line_number,
            (self.index - self.line_start - 2) as u32,
        );

        while !self.eof() {
            let c = self.ch(self.index);
            if is_line_terminator(c) {
                self.index += c.len_utf8();
                if c == '\r' && self.ch(self.index) == '\n' {
                    self.index += 1;
                }
                self.line_number += 1;
                self.line_start = self.index;
            } else if c == '*' && self.ch(self.index + 1) == '/' {
                let content_end = self.index;
                self.index += 2;
                let loc_end =
                    Position::new(self.line_number, (self.index - self.line_start) as u32);
                return Ok(self.make_comment(
                    true,
                    Span::new(start, self.index),
                    Span::new(content_start, content_end),
                    loc_start,
                    loc_end,
                ));
            } else {
                self.index += c.len_utf8();
            }
        }

        // Ran off the end of the source.
        let loc_end = Position::new(self.line_number, (self.index - self.line_start) as u32);
        let comment = self.make_comment(
            true,
            Span::new(start, self.index),
            Span::new(content_start, self.index),
            loc_start,
            loc_end,
        );
        self.tolerate_unexpected()?;
        Ok(comment)
    }

    fn make_comment(
        &self,
        multi_line: bool,
        span: Span,
        content: Span,
        loc_start: Position,
        loc_end: Position,
    ) -> Comment {
        Comment {
            multi_line,
            value: self.source()[content.start..content.end].to_string(),
            span,
            loc: SourceLocation::new(loc_start, loc_end),
        }
    }
}
