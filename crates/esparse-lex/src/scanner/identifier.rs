//! Identifier and keyword scanning.
//!
//! Identifier names may embed `\uHHHH` and `\u{...}` escapes; the decoded
//! code point must still satisfy the identifier character classes. After
//! scanning, the name is checked against the reserved word tables to decide
//! the token kind.

use esparse_util::{messages, Result};

use crate::character::{is_identifier_part, is_identifier_start};
use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

/// Checks if a name is a reserved keyword.
pub fn is_keyword(id: &str) -> bool {
    matches!(
        id,
        "if" | "in" | "do" | "var" | "for" | "new" | "try" | "let" | "this" | "else" | "case"
            | "void" | "with" | "enum" | "while" | "break" | "catch" | "throw" | "const"
            | "yield" | "class" | "super" | "return" | "typeof" | "delete" | "switch"
            | "export" | "import" | "default" | "finally" | "extends" | "function"
            | "continue" | "debugger" | "instanceof"
    )
}

/// Checks if a name is reserved only in strict mode.
pub fn is_strict_mode_reserved_word(id: &str) -> bool {
    matches!(
        id,
        "implements"
            | "interface"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "static"
            | "yield"
            | "let"
    )
}

/// Checks if a name may not be bound or assigned in strict mode.
pub fn is_restricted_word(id: &str) -> bool {
    id == "eval" || id == "arguments"
}

/// Checks if a name is reserved for future use.
pub fn is_future_reserved_word(id: &str) -> bool {
    matches!(id, "enum" | "export" | "import" | "super")
}

impl<'a> Scanner<'a> {
    /// Scans an identifier name and classifies it.
    pub(crate) fn scan_identifier(&mut self) -> Result<Token> {
        let start = self.index;
        let line_number = self.line_number;
        let line_start = self.line_start;

        let id = if self.ch(start) == '\\' {
            self.get_complex_identifier()?
        } else {
            self.get_identifier()?
        };

        let kind = if id.chars().count() == 1 {
            // A single character cannot be a reserved word.
            TokenKind::Identifier
        } else if is_keyword(&id) {
            TokenKind::Keyword
        } else if id == "null" {
            TokenKind::NullLiteral
        } else if id == "true" || id == "false" {
            TokenKind::BooleanLiteral
        } else {
            TokenKind::Identifier
        };

        // A reserved word spelled with escapes scanned shorter than the
        // source it covers; that spelling is an early error.
        if kind != TokenKind::Identifier && start + id.len() != self.index {
            let restore = self.index;
            self.index = start;
            let index = self.index;
            let line = self.line_number;
            let column = (self.index - self.line_start + 1) as u32;
            self.handler.tolerate_error(
                index,
                line,
                column,
                messages::INVALID_ESCAPED_RESERVED_WORD.to_string(),
            )?;
            self.index = restore;
        }

        Ok(Token {
            kind,
            value: TokenValue::Name(id),
            line_number,
            line_start,
            start,
            end: self.index,
        })
    }

    /// Reads an identifier with no escapes; falls back to the escape-aware
    /// path when a backslash shows up mid-name.
    fn get_identifier(&mut self) -> Result<String> {
        let start = self.index;
        self.index += self.ch(start).len_utf8();

        while !self.eof() {
            let c = self.ch(self.index);
            if c == '\\' {
                self.index = start;
                return self.get_complex_identifier();
            }
            if is_identifier_part(c) {
                self.index += c.len_utf8();
            } else {
                break;
            }
        }

        Ok(self.source()[start..self.index].to_string())
    }

    /// Reads an identifier that contains at least one unicode escape.
    fn get_complex_identifier(&mut self) -> Result<String> {
        let mut c = self.ch(self.index);
        self.index += c.len_utf8();

        let mut id = String::new();
        if c == '\\' {
            id.push(self.scan_identifier_escape(true)?);
        } else {
            id.push(c);
        }

        while !self.eof() {
            c = self.ch(self.index);
            if !is_identifier_part(c) {
                break;
            }
            self.index += c.len_utf8();
            if c == '\\' {
                id.push(self.scan_identifier_escape(false)?);
            } else {
                id.push(c);
            }
        }

        Ok(id)
    }

    /// Decodes the `uHHHH` or `u{...}` part of an identifier escape; the
    /// leading backslash has already been consumed.
    fn scan_identifier_escape(&mut self, at_start: bool) -> Result<char> {
        if self.ch(self.index) != 'u' {
            return self.unexpected();
        }
        self.index += 1;

        let decoded = if self.ch(self.index) == '{' {
            self.index += 1;
            self.scan_unicode_code_point_escape()?
        } else {
            match self.scan_hex_escape('u').and_then(char::from_u32) {
                Some(ch) if ch != '\\' => ch,
                _ => return self.unexpected(),
            }
        };

        let valid = if at_start {
            decoded != '\\' && is_identifier_start(decoded)
        } else {
            decoded != '\\' && is_identifier_part(decoded)
        };
        if !valid {
            return self.unexpected();
        }

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Token {
        let mut scanner = Scanner::new(source, false);
        scanner.scan_identifier().unwrap()
    }

    #[test]
    fn test_plain_identifier() {
        let token = scan("answer");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text(), "answer");
        assert_eq!((token.start, token.end), (0, 6));
    }

    #[test]
    fn test_dollar_and_underscore() {
        assert_eq!(scan("$").kind, TokenKind::Identifier);
        assert_eq!(scan("_foo$bar").text(), "_foo$bar");
    }

    #[test]
    fn test_keywords() {
        for kw in ["var", "function", "instanceof", "typeof", "yield"] {
            let token = scan(kw);
            assert_eq!(token.kind, TokenKind::Keyword, "{} should be a keyword", kw);
        }
    }

    #[test]
    fn test_null_and_boolean() {
        assert_eq!(scan("null").kind, TokenKind::NullLiteral);
        assert_eq!(scan("true").kind, TokenKind::BooleanLiteral);
        assert_eq!(scan("false").kind, TokenKind::BooleanLiteral);
    }

    #[test]
    fn test_single_char_is_never_keyword() {
        // No one-character keywords exist; the fast path relies on that.
        let token = scan("a");
        assert_eq!(token.kind, TokenKind::Identifier);
    }

    #[test]
    fn test_unicode_identifier() {
        let token = scan("変数");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text(), "変数");
    }

    #[test]
    fn test_escaped_identifier() {
        // a is 'a'
        let token = scan("\\u0061bc");
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text(), "abc");
    }

    #[test]
    fn test_code_point_escape() {
        let token = scan("\\u{61}bc");
        assert_eq!(token.text(), "abc");
    }

    #[test]
    fn test_escape_mid_identifier() {
        let token = scan("a\\u0062c");
        assert_eq!(token.text(), "abc");
    }

    #[test]
    fn test_invalid_escape_rejected() {
        let mut scanner = Scanner::new("\\u0028", false); // '(' is not id-start
        assert!(scanner.scan_identifier().is_err());
    }

    #[test]
    fn test_escaped_keyword_rejected() {
        let mut scanner = Scanner::new("\\u0076ar", false); // spells "var"
        assert!(scanner.scan_identifier().is_err());
    }

    #[test]
    fn test_reserved_word_tables() {
        assert!(is_keyword("while"));
        assert!(!is_keyword("async"));
        assert!(is_strict_mode_reserved_word("static"));
        assert!(is_restricted_word("eval"));
        assert!(is_future_reserved_word("enum"));
    }
}
