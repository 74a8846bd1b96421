//! Token and comment records produced by the scanner.

use esparse_util::{SourceLocation, Span};

/// The ten lexical token categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `true` or `false`.
    BooleanLiteral,
    /// End of input.
    Eof,
    /// An identifier that is not a reserved word.
    Identifier,
    /// A reserved word.
    Keyword,
    /// `null`.
    NullLiteral,
    /// A numeric literal.
    NumericLiteral,
    /// An operator or other punctuation.
    Punctuator,
    /// A string literal.
    StringLiteral,
    /// A regular expression literal.
    RegularExpression,
    /// One piece of a template literal.
    Template,
}

impl TokenKind {
    /// Display name used in token listings.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::BooleanLiteral => "Boolean",
            TokenKind::Eof => "<end>",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::NullLiteral => "Null",
            TokenKind::NumericLiteral => "Numeric",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::StringLiteral => "String",
            TokenKind::RegularExpression => "RegularExpression",
            TokenKind::Template => "Template",
        }
    }
}

/// Per-kind token payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    /// No payload (end of input).
    None,
    /// Literal text of an identifier, keyword, punctuator, boolean, or null.
    Name(String),
    /// Decoded numeric value; `octal` marks the legacy leading-zero form.
    Number { value: f64, octal: bool },
    /// Decoded string value; `octal` marks a legacy octal escape inside it.
    Str { value: String, octal: bool },
    /// One template piece between backtick/`${`/`}` boundaries.
    ///
    /// `cooked` is `None` when the piece contains an escape sequence that
    /// does not decode; the raw text is always preserved.
    Template {
        cooked: Option<String>,
        raw: String,
        head: bool,
        tail: bool,
    },
    /// A regular expression pattern and its flags.
    Regex { pattern: String, flags: String },
}

/// A lexical token with its position metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Category-specific payload.
    pub value: TokenValue,
    /// Line the token starts on (1-based).
    pub line_number: u32,
    /// Byte offset of the start of that line.
    pub line_start: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Builds the end-of-input token.
    pub fn eof(index: usize, line_number: u32, line_start: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            value: TokenValue::None,
            line_number,
            line_start,
            start: index,
            end: index,
        }
    }

    /// The token's byte range.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Literal text for name-like tokens, empty otherwise.
    pub fn text(&self) -> &str {
        match &self.value {
            TokenValue::Name(s) => s,
            _ => "",
        }
    }

    /// Decoded numeric value, if this is a numeric literal.
    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Decoded string value, if this is a string literal.
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Legacy-octal flag of a numeric or string literal.
    pub fn octal(&self) -> bool {
        match self.value {
            TokenValue::Number { octal, .. } => octal,
            TokenValue::Str { octal, .. } => octal,
            _ => false,
        }
    }

    /// Head flag of a template piece.
    pub fn template_head(&self) -> bool {
        matches!(self.value, TokenValue::Template { head: true, .. })
    }

    /// Tail flag of a template piece.
    pub fn template_tail(&self) -> bool {
        matches!(self.value, TokenValue::Template { tail: true, .. })
    }

    /// True for a punctuator with exactly this text.
    pub fn is_punctuator(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text() == value
    }

    /// True for a keyword with exactly this text.
    pub fn is_keyword(&self, value: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text() == value
    }
}

/// A comment skipped by the scanner, reported through the comment tap.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    /// True for `/* ... */`, false for `// ...`.
    pub multi_line: bool,
    /// Comment text without its delimiters.
    pub value: String,
    /// Byte range including delimiters.
    pub span: Span,
    /// Line/column range including delimiters.
    pub loc: SourceLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_token() {
        let token = Token::eof(12, 3, 10);
        assert_eq!(token.kind, TokenKind::Eof);
        assert_eq!(token.value, TokenValue::None);
        assert_eq!(token.start, token.end);
        assert_eq!(token.span(), Span::new(12, 12));
    }

    #[test]
    fn test_text_and_matchers() {
        let token = Token {
            kind: TokenKind::Punctuator,
            value: TokenValue::Name("=>".to_string()),
            line_number: 1,
            line_start: 0,
            start: 4,
            end: 6,
        };
        assert_eq!(token.text(), "=>");
        assert!(token.is_punctuator("=>"));
        assert!(!token.is_punctuator("="));
        assert!(!token.is_keyword("=>"));
    }

    #[test]
    fn test_octal_flag() {
        let token = Token {
            kind: TokenKind::NumericLiteral,
            value: TokenValue::Number {
                value: 8.0,
                octal: true,
            },
            line_number: 1,
            line_start: 0,
            start: 0,
            end: 3,
        };
        assert!(token.octal());
        assert_eq!(token.number(), Some(8.0));
    }

    #[test]
    fn test_template_flags() {
        let token = Token {
            kind: TokenKind::Template,
            value: TokenValue::Template {
                cooked: Some("hi".to_string()),
                raw: "hi".to_string(),
                head: true,
                tail: false,
            },
            line_number: 1,
            line_start: 0,
            start: 0,
            end: 4,
        };
        assert!(token.template_head());
        assert!(!token.template_tail());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::Identifier.name(), "Identifier");
        assert_eq!(TokenKind::Eof.name(), "<end>");
        assert_eq!(TokenKind::NumericLiteral.name(), "Numeric");
    }
}
