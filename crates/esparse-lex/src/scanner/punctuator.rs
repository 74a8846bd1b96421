//! Punctuator scanning.
//!
//! Operators are matched longest first, so `>>>=` wins over `>>>`, which
//! wins over `>>=`, and so on down to the single characters. Braces feed
//! the curly stack that template scanning relies on.

use esparse_util::Result;

use crate::scanner::core::CurlyMark;
use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

const THREE_CHAR: &[&str] = &["===", "!==", ">>>", "<<=", ">>=", "**="];
const TWO_CHAR: &[&str] = &[
    "&&", "||", "==", "!=", "+=", "-=", "*=", "/=", "++", "--", "<<", ">>", "&=", "|=", "^=",
    "%=", "<=", ">=", "=>", "**",
];

impl<'a> Scanner<'a> {
    /// Scans an operator or punctuation token by longest match.
    pub(crate) fn scan_punctuator(&mut self) -> Result<Token> {
        let start = self.index;
        let c = self.ch(start);
        let mut text: &str = "";

        match c {
            '(' => {
                self.index += 1;
                text = "(";
            }
            '{' => {
                self.curly_stack.push(CurlyMark::Brace);
                self.index += 1;
                text = "{";
            }
            '}' => {
                self.curly_stack.pop();
                self.index += 1;
                text = "}";
            }
            '.' => {
                self.index += 1;
                text = ".";
                if self.ch(self.index) == '.' && self.ch(self.index + 1) == '.' {
                    self.index += 2;
                    text = "...";
                }
            }
            ')' => {
                self.index += 1;
                text = ")";
            }
            ';' => {
                self.index += 1;
                text = ";";
            }
            ',' => {
                self.index += 1;
                text = ",";
            }
            '[' => {
                self.index += 1;
                text = "[";
            }
            ']' => {
                self.index += 1;
                text = "]";
            }
            ':' => {
                self.index += 1;
                text = ":";
            }
            '?' => {
                self.index += 1;
                text = "?";
            }
            '~' => {
                self.index += 1;
                text = "~";
            }
            _ => {
                let rest = &self.source()[start..];
                if rest.starts_with(">>>=") {
                    self.index += 4;
                    text = ">>>=";
                } else if let Some(&op) = THREE_CHAR.iter().find(|&&op| rest.starts_with(op)) {
                    self.index += 3;
                    text = op;
                } else if let Some(&op) = TWO_CHAR.iter().find(|&&op| rest.starts_with(op)) {
                    self.index += 2;
                    text = op;
                } else if matches!(
                    c,
                    '<' | '>' | '=' | '!' | '+' | '-' | '*' | '%' | '&' | '|' | '^' | '/'
                ) {
                    self.index += 1;
                    text = &self.source()[start..self.index];
                }
            }
        }

        if self.index == start {
            return self.unexpected();
        }

        Ok(Token {
            kind: TokenKind::Punctuator,
            value: TokenValue::Name(text.to_string()),
            line_number: self.line_number,
            line_start: self.line_start,
            start,
            end: self.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_texts(source: &str) -> Vec<String> {
        let mut scanner = Scanner::new(source, false);
        let mut texts = Vec::new();
        loop {
            scanner.scan_comments().unwrap();
            let token = scanner.lex().unwrap();
            if token.kind == TokenKind::Eof {
                break;
            }
            texts.push(token.text().to_string());
        }
        texts
    }

    #[test]
    fn test_longest_match_on_shifts() {
        assert_eq!(scan_texts(">>>="), vec![">>>="]);
        assert_eq!(scan_texts(">>>"), vec![">>>"]);
        assert_eq!(scan_texts(">>="), vec![">>="]);
        assert_eq!(scan_texts(">>"), vec![">>"]);
        assert_eq!(scan_texts(">"), vec![">"]);
    }

    #[test]
    fn test_ellipsis_and_dot() {
        assert_eq!(scan_texts("..."), vec!["..."]);
        assert_eq!(scan_texts(".. ."), vec![".", ".", "."]);
    }

    #[test]
    fn test_arrow_and_comparisons() {
        assert_eq!(scan_texts("=> == === ="), vec!["=>", "==", "===", "="]);
        assert_eq!(scan_texts("! != !=="), vec!["!", "!=", "!=="]);
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(scan_texts("** **= *="), vec!["**", "**=", "*="]);
    }

    #[test]
    fn test_grouping() {
        assert_eq!(
            scan_texts("( ) [ ] { } ; , : ? ~"),
            vec!["(", ")", "[", "]", "{", "}", ";", ",", ":", "?", "~"]
        );
    }

    #[test]
    fn test_unknown_character_is_error() {
        let mut scanner = Scanner::new("#", false);
        assert!(scanner.scan_punctuator().is_err());
    }

    #[test]
    fn test_curly_stack_balance() {
        let mut scanner = Scanner::new("{ { } }", false);
        loop {
            scanner.scan_comments().unwrap();
            if scanner.lex().unwrap().kind == TokenKind::Eof {
                break;
            }
        }
        assert_eq!(scanner.save_state().curly_depth, 0);
    }
}
