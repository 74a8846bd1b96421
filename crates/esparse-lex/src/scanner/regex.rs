//! Regular expression literal scanning.
//!
//! The scanner cannot decide on its own that a `/` starts a regular
//! expression; the parser calls [`Scanner::scan_reg_exp`] once context rules
//! out division. The pattern is taken lexically - bracket classes tracked,
//! escapes honored, line terminators rejected - and the flags are validated
//! against the known set with duplicates reported.

use esparse_util::{messages, Result};

use crate::character::{is_identifier_part, is_line_terminator};
use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

/// The regular expression flags the grammar accepts.
const VALID_FLAGS: &[char] = &['g', 'i', 'm', 's', 'u', 'y'];

impl<'a> Scanner<'a> {
    /// Scans a regular expression literal starting at a `/`.
    pub fn scan_reg_exp(&mut self) -> Result<Token> {
        let start = self.index;
        let line_number = self.line_number;
        let line_start = self.line_start;

        let pattern = self.scan_reg_exp_body()?;
        let flags = self.scan_reg_exp_flags()?;
        self.validate_reg_exp_flags(&flags)?;

        Ok(Token {
            kind: TokenKind::RegularExpression,
            value: TokenValue::Regex { pattern, flags },
            line_number,
            line_start,
            start,
            end: self.index,
        })
    }

    /// Reads the pattern between the enclosing slashes.
    fn scan_reg_exp_body(&mut self) -> Result<String> {
        debug_assert_eq!(self.ch(self.index), '/');
        let body_start = self.index + 1;
        self.index += 1;

        let mut class_marker = false;
        let mut terminated = false;

        while !self.eof() {
            let c = self.next_char();
            if c == '\\' {
                let e = self.next_char();
                if is_line_terminator(e) {
                    return self.throw_unterminated_reg_exp();
                }
            } else if is_line_terminator(c) {
                return self.throw_unterminated_reg_exp();
            } else if class_marker {
                if c == ']' {
                    class_marker = false;
                }
            } else if c == '/' {
                terminated = true;
                break;
            } else if c == '[' {
                class_marker = true;
            }
        }

        if !terminated {
            return self.throw_unterminated_reg_exp();
        }

        Ok(self.source()[body_start..self.index - 1].to_string())
    }

    /// Reads the flag characters after the closing slash.
    ///
    /// A unicode escape in flag position is malformed but recoverable; the
    /// decoded character still participates so later checks see it.
    fn scan_reg_exp_flags(&mut self) -> Result<String> {
        let mut flags = String::new();

        while !self.eof() {
            let c = self.ch(self.index);
            if !is_identifier_part(c) {
                break;
            }
            self.index += 1;

            if c == '\\' && !self.eof() {
                if self.ch(self.index) == 'u' {
                    self.index += 1;
                    let restore = self.index;
                    match self.scan_hex_escape('u').and_then(char::from_u32) {
                        Some(decoded) => flags.push(decoded),
                        None => {
                            self.index = restore;
                            flags.push('u');
                        }
                    }
                } else {
                    flags.push('\\');
                }
                self.tolerate_unexpected()?;
            } else {
                flags.push(c);
            }
        }

        Ok(flags)
    }

    /// Rejects unknown and duplicated flags.
    fn validate_reg_exp_flags(&mut self, flags: &str) -> Result<()> {
        let mut seen = Vec::new();
        for c in flags.chars() {
            let index = self.index;
            let line = self.line_number;
            let column = (self.index - self.line_start + 1) as u32;
            if !VALID_FLAGS.contains(&c) || seen.contains(&c) {
                self.handler.tolerate_error(
                    index,
                    line,
                    column,
                    messages::INVALID_REG_EXP_FLAG.to_string(),
                )?;
            }
            seen.push(c);
        }
        Ok(())
    }

    fn throw_unterminated_reg_exp<T>(&self) -> Result<T> {
        self.handler.throw_error(
            self.index,
            self.line_number,
            (self.index - self.line_start + 1) as u32,
            messages::UNTERMINATED_REG_EXP.to_string(),
        )
    }
}
