//! Numeric literal scanning.
//!
//! Decimal (with fraction and exponent), hex `0x`, octal `0o`, binary `0b`,
//! and the legacy leading-zero octal form. The legacy form sets the token's
//! `octal` flag so the parser can reject it in strict mode. A numeric
//! literal immediately followed by an identifier start is an error.

use esparse_util::Result;

use crate::character::{hex_value, is_decimal_digit, is_identifier_start, is_octal_digit, octal_value};
use crate::token::{Token, TokenKind, TokenValue};
use crate::Scanner;

impl<'a> Scanner<'a> {
    /// Scans a numeric literal starting at the current position.
    pub(crate) fn scan_numeric_literal(&mut self) -> Result<Token> {
        let start = self.index;
        let mut c = self.ch(start);

        if c != '.' {
            self.index += 1;
            c = self.ch(self.index);

            if self.ch(start) == '0' {
                if c == 'x' || c == 'X' {
                    self.index += 1;
                    return self.scan_hex_literal(start);
                }
                if c == 'b' || c == 'B' {
                    self.index += 1;
                    return self.scan_binary_literal(start);
                }
                if c == 'o' || c == 'O' {
                    return self.scan_octal_literal(c, start);
                }
                if is_octal_digit(c) && self.is_implicit_octal_literal() {
                    return self.scan_octal_literal(c, start);
                }
            }

            while is_decimal_digit(self.ch(self.index)) {
                self.index += 1;
            }
            c = self.ch(self.index);
        }

        if c == '.' {
            self.index += 1;
            while is_decimal_digit(self.ch(self.index)) {
                self.index += 1;
            }
            c = self.ch(self.index);
        }

        if c == 'e' || c == 'E' {
            self.index += 1;
            c = self.ch(self.index);
            if c == '+' || c == '-' {
                self.index += 1;
            }
            if is_decimal_digit(self.ch(self.index)) {
                while is_decimal_digit(self.ch(self.index)) {
                    self.index += 1;
                }
            } else {
                return self.unexpected();
            }
        }

        if is_identifier_start(self.ch(self.index)) {
            return self.unexpected();
        }

        let text = &self.source()[start..self.index];
        let value = match text.parse::<f64>() {
            Ok(v) => v,
            Err(_) => return self.unexpected(),
        };

        Ok(self.numeric_token(start, value, false))
    }

    fn scan_hex_literal(&mut self, start: usize) -> Result<Token> {
        let mut value = 0f64;
        let digit_start = self.index;

        while let Some(d) = hex_value(self.ch(self.index)) {
            value = value * 16.0 + f64::from(d);
            self.index += 1;
        }

        if self.index == digit_start {
            return self.unexpected();
        }
        if is_identifier_start(self.ch(self.index)) {
            return self.unexpected();
        }

        Ok(self.numeric_token(start, value, false))
    }

    fn scan_binary_literal(&mut self, start: usize) -> Result<Token> {
        let mut value = 0f64;
        let digit_start = self.index;

        loop {
            match self.ch(self.index) {
                '0' => value *= 2.0,
                '1' => value = value * 2.0 + 1.0,
                _ => break,
            }
            self.index += 1;
        }

        if self.index == digit_start {
            return self.unexpected();
        }
        let c = self.ch(self.index);
        if is_identifier_start(c) || is_decimal_digit(c) {
            return self.unexpected();
        }

        Ok(self.numeric_token(start, value, false))
    }

    /// Scans `0o...` or the legacy `0NNN` form; `prefix` is the character
    /// right after the leading zero.
    fn scan_octal_literal(&mut self, prefix: char, start: usize) -> Result<Token> {
        let mut value = 0f64;
        let octal = is_octal_digit(prefix);
        if !octal {
            // Skip the 'o'/'O' marker of the modern form.
            self.index += 1;
        }

        let digit_start = self.index;
        while let Some(d) = octal_value(self.ch(self.index)) {
            value = value * 8.0 + f64::from(d);
            self.index += 1;
        }

        if !octal && self.index == digit_start {
            return self.unexpected();
        }
        let c = self.ch(self.index);
        if is_identifier_start(c) || is_decimal_digit(c) {
            return self.unexpected();
        }

        Ok(self.numeric_token(start, value, octal))
    }

    /// After `0` followed by an octal digit, decides between the legacy
    /// octal reading and a plain decimal: any `8` or `9` in the digit run
    /// makes it decimal.
    fn is_implicit_octal_literal(&self) -> bool {
        for c in self.source()[self.index + 1..].chars() {
            if c == '8' || c == '9' {
                return false;
            }
            if !is_octal_digit(c) {
                return true;
            }
        }
        true
    }

    fn numeric_token(&self, start: usize, value: f64, octal: bool) -> Token {
        Token {
            kind: TokenKind::NumericLiteral,
            value: TokenValue::Number { value, octal },
            line_number: self.line_number,
            line_start: self.line_start,
            start,
            end: self.index,
        }
    }
}
