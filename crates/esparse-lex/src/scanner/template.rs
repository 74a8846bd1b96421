//! Template literal scanning.
//!
//! One token covers one piece of a template literal, between backtick,
//! `${`, `}`, and closing backtick boundaries. The `head` flag marks a piece
//! opened by a backtick, `tail` one closed by a backtick. Entering `${`
//! pushes a substitution marker so the matching `}` resumes template text
//! instead of closing a block.
//!
//! The cooked value decodes escapes as it goes; an escape that does not
//! decode leaves `cooked` empty (`None`) with the raw text intact, and the
//! parser rejects the piece unless a tagged template is being parsed.

use esparse_util::Result;

use crate::character::{is_decimal_digit, is_line_terminator, is_octal_digit};
use crate::scanner::core::CurlyMark;
use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Scans one template piece. The current character is a backtick or the
    /// `}` that closes a substitution.
    pub(crate) fn scan_template(&mut self) -> Result<Token> {
        let start = self.index;
        let line_number = self.line_number;
        let line_start = self.line_start;

        let head = self.ch(start) == '`';
        let mut tail = false;
        let mut terminated = false;
        let mut raw_offset = 2;
        let mut cooked = Some(String::new());

        self.index += 1;

        while !self.eof() {
            let c = self.next_char();

            if c == '`' {
                raw_offset = 1;
                tail = true;
                terminated = true;
                break;
            } else if c == '$' {
                if self.ch(self.index) == '{' {
                    self.curly_stack.push(CurlyMark::Substitution);
                    self.index += 1;
                    terminated = true;
                    break;
                }
                push_cooked(&mut cooked, '$');
            } else if c == '\\' {
                let e = self.next_char();
                if !is_line_terminator(e) {
                    match e {
                        'n' => push_cooked(&mut cooked, '\n'),
                        'r' => push_cooked(&mut cooked, '\r'),
                        't' => push_cooked(&mut cooked, '\t'),
                        'b' => push_cooked(&mut cooked, '\u{0008}'),
                        'f' => push_cooked(&mut cooked, '\u{000C}'),
                        'v' => push_cooked(&mut cooked, '\u{000B}'),
                        'u' => {
                            if self.ch(self.index) == '{' {
                                self.index += 1;
                                match self.try_unicode_code_point_escape() {
                                    Some(decoded) => push_cooked(&mut cooked, decoded),
                                    None => cooked = None,
                                }
                            } else {
                                let restore = self.index;
                                match self.scan_hex_escape('u') {
                                    Some(unit) => {
                                        let mut buf = String::new();
                                        self.push_code_unit(&mut buf, unit);
                                        if let Some(s) = cooked.as_mut() {
                                            s.push_str(&buf);
                                        }
                                    }
                                    None => {
                                        self.index = restore;
                                        cooked = None;
                                    }
                                }
                            }
                        }
                        'x' => match self.scan_hex_escape('x') {
                            Some(unit) => {
                                let mut buf = String::new();
                                self.push_code_unit(&mut buf, unit);
                                if let Some(s) = cooked.as_mut() {
                                    s.push_str(&buf);
                                }
                            }
                            None => cooked = None,
                        },
                        '0' => {
                            if is_decimal_digit(self.ch(self.index)) {
                                // \0 followed by a digit is a forbidden
                                // octal form.
                                cooked = None;
                            } else {
                                push_cooked(&mut cooked, '\0');
                            }
                        }
                        _ => {
                            if is_octal_digit(e) || e == '8' || e == '9' {
                                cooked = None;
                            } else {
                                push_cooked(&mut cooked, e);
                            }
                        }
                    }
                } else {
                    self.line_number += 1;
                    if e == '\r' && self.ch(self.index) == '\n' {
                        self.index += 1;
                    }
                    self.line_start = self.index;
                }
            } else if is_line_terminator(c) {
                self.line_number += 1;
                if c == '\r' && self.ch(self.index) == '\n' {
                    self.index += 1;
                }
                self.line_start = self.index;
                push_cooked(&mut cooked, '\n');
            } else {
                push_cooked(&mut cooked, c);
            }
        }

        if !terminated {
            // Ran off the end of the source; surface the truncated piece as
            // a tail so the enclosing template can close.
            self.tolerate_unexpected()?;
            tail = true;
            raw_offset = 0;
        }

        if !head {
            self.curly_stack.pop();
        }

        let raw = self.source()[start + 1..self.index - raw_offset].to_string();

        Ok(Token {
            kind: TokenKind::Template,
            value: TokenValue::Template {
                cooked,
                raw,
                head,
                tail,
            },
            line_number,
            line_start,
            start,
            end: self.index,
        })
    }

    /// Like `scan_unicode_code_point_escape` but failure is a value, not an
    /// error, since template pieces keep scanning past bad escapes.
    fn try_unicode_code_point_escape(&mut self) -> Option<char> {
        let save = self.index;
        match self.scan_unicode_code_point_escape() {
            Ok(decoded) => Some(decoded),
            Err(_) => {
                self.index = save;
                // Skip to the closing brace so scanning can continue.
                while !self.eof() {
                    let c = self.next_char();
                    if c == '}' {
                        break;
                    }
                }
                None
            }
        }
    }
}

fn push_cooked(cooked: &mut Option<String>, c: char) {
    if let Some(s) = cooked.as_mut() {
        s.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_pieces(source: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(source, false);
        let mut pieces = Vec::new();
        loop {
            scanner.scan_comments().unwrap();
            let token = scanner.lex().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            pieces.push(token);
        }
        pieces
    }

    fn template_parts(token: &Token) -> (Option<String>, String, bool, bool) {
        match &token.value {
            TokenValue::Template {
                cooked,
                raw,
                head,
                tail,
            } => (cooked.clone(), raw.clone(), *head, *tail),
            other => panic!("not a template: {:?}", other),
        }
    }

    #[test]
    fn test_simple_template() {
        let tokens = scan_pieces("`hello`");
        assert_eq!(tokens.len(), 1);
        let (cooked, raw, head, tail) = template_parts(&tokens[0]);
        assert_eq!(cooked.as_deref(), Some("hello"));
        assert_eq!(raw, "hello");
        assert!(head && tail);
    }

    #[test]
    fn test_template_with_substitution() {
        let tokens = scan_pieces("`a${x}b`");
        assert_eq!(tokens.len(), 3);
        let (cooked, _, head, tail) = template_parts(&tokens[0]);
        assert_eq!(cooked.as_deref(), Some("a"));
        assert!(head && !tail);
        assert_eq!(tokens[1].text(), "x");
        let (cooked, _, head, tail) = template_parts(&tokens[2]);
        assert_eq!(cooked.as_deref(), Some("b"));
        assert!(!head && tail);
    }

    #[test]
    fn test_nested_braces_inside_substitution() {
        // The `}` of the object literal must not end the substitution.
        let tokens = scan_pieces("`${ {a: 1} }`");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Template);
        assert_eq!(kinds[kinds.len() - 1], TokenKind::Template);
    }

    #[test]
    fn test_dollar_without_brace() {
        let tokens = scan_pieces("`a$b`");
        let (cooked, _, _, _) = template_parts(&tokens[0]);
        assert_eq!(cooked.as_deref(), Some("a$b"));
    }

    #[test]
    fn test_escapes_cook() {
        let tokens = scan_pieces("`a\\n\\t${x}`");
        let (cooked, raw, _, _) = template_parts(&tokens[0]);
        assert_eq!(cooked.as_deref(), Some("a\n\t"));
        assert_eq!(raw, "a\\n\\t");
    }

    #[test]
    fn test_line_terminator_cooks_as_newline() {
        let tokens = scan_pieces("`a\r\nb`");
        let (cooked, raw, _, _) = template_parts(&tokens[0]);
        assert_eq!(cooked.as_deref(), Some("a\nb"));
        assert_eq!(raw, "a\r\nb");
        assert_eq!(tokens[0].line_number, 1);
    }

    #[test]
    fn test_octal_escape_fails_cooking() {
        let tokens = scan_pieces("`\\01`");
        let (cooked, raw, _, _) = template_parts(&tokens[0]);
        assert!(cooked.is_none());
        assert_eq!(raw, "\\01");
    }

    #[test]
    fn test_bad_hex_escape_fails_cooking_keeps_raw() {
        let tokens = scan_pieces("`\\xZZ`");
        let (cooked, raw, _, _) = template_parts(&tokens[0]);
        assert!(cooked.is_none());
        assert_eq!(raw, "\\xZZ");
    }

    #[test]
    fn test_unterminated_template_is_error() {
        let mut scanner = Scanner::new("`abc", false);
        assert!(scanner.scan_template().is_err());
    }

    #[test]
    fn test_unterminated_template_tolerated() {
        let mut scanner = Scanner::new("`abc", true);
        let token = scanner.scan_template().unwrap();
        let (_, _, head, tail) = template_parts(&token);
        assert!(head && tail);
        assert!(scanner.error_handler().has_errors());
    }
}
