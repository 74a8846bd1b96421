//! Standalone tokenization.
//!
//! Without a parser driving it, the scanner cannot know whether `/` begins
//! a regular expression or a division. The reader keeps just enough of the
//! recent token shape - the last significant value, and what sits before
//! the most recent `(` and `{` - to make that call the way a parser would.

use esparse_lex::{Scanner, TokenKind, TokenValue};
use esparse_par::ast::RegexData;
use esparse_util::{Position, Result, SourceLocation, Span, SyntaxError};

/// Options accepted by [`tokenize`].
#[derive(Clone, Debug, Default)]
pub struct TokenizeOptions {
    /// Record byte ranges on entries (always recorded; interface parity).
    pub range: bool,
    /// Record line/column locations on entries (always recorded).
    pub loc: bool,
    /// Emit comment entries interleaved with tokens.
    pub comment: bool,
    /// Record errors and continue instead of stopping at the first one.
    pub tolerant: bool,
}

/// One entry of the token stream.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenEntry {
    /// Display name of the token kind, or `LineComment`/`BlockComment`.
    pub kind: String,
    /// Verbatim source text of the token.
    pub value: String,
    /// Byte range.
    pub span: Span,
    /// Line/column range.
    pub loc: SourceLocation,
    /// Pattern and flags of a regular expression token.
    pub regex: Option<RegexData>,
}

/// Everything [`tokenize`] produces.
#[derive(Clone, Debug, Default)]
pub struct TokenizeResult {
    /// Tokens (and comment entries, when enabled) in source order.
    pub tokens: Vec<TokenEntry>,
    /// Errors recorded in tolerant mode.
    pub errors: Vec<SyntaxError>,
}

/// Tracks enough token history to disambiguate a leading `/`.
#[derive(Debug, Default)]
struct Reader {
    /// Punctuator/keyword texts, with `None` standing in for everything
    /// else.
    values: Vec<Option<String>>,
    /// Index in `values` of the most recent `{`.
    curly: Option<usize>,
    /// Index in `values` of the most recent `(`.
    paren: Option<usize>,
}

impl Reader {
    /// Tokens after which `function` must be an expression, not a
    /// declaration.
    fn before_function_expression(value: &str) -> bool {
        matches!(
            value,
            "(" | "{" | "[" | "in" | "typeof" | "instanceof" | "new" | "return" | "case"
                | "delete" | "throw" | "void" | "=" | "+=" | "-=" | "*=" | "**=" | "/=" | "%="
                | "<<=" | ">>=" | ">>>=" | "&=" | "|=" | "^=" | "," | "+" | "-" | "*" | "**"
                | "/" | "%" | "++" | "--" | "<<" | ">>" | ">>>" | "&" | "|" | "^" | "!" | "~"
                | "&&" | "||" | "?" | ":" | "===" | "==" | ">=" | "<=" | "<" | ">" | "!="
                | "!=="
        )
    }

    fn value_at(&self, index: Option<usize>, back: usize) -> Option<&str> {
        let index = index?;
        let target = index.checked_sub(back)?;
        self.values.get(target)?.as_deref()
    }

    /// Decides whether a `/` at the current position starts a regular
    /// expression.
    fn is_regex_start(&self) -> bool {
        let previous = match self.values.last() {
            None => return true,
            Some(previous) => previous.as_deref(),
        };

        match previous {
            // After an identifier or literal a slash divides.
            None => false,
            Some("this") | Some("]") => false,
            Some(")") => {
                // Only the parenthesised heads of these keywords can be
                // followed by a regex.
                matches!(
                    self.value_at(self.paren, 1),
                    Some("if") | Some("while") | Some("for") | Some("with")
                )
            }
            Some("}") => {
                // A brace ends either a block (regex can follow) or a
                // function expression body (division follows).
                if self.value_at(self.curly, 3) == Some("function") {
                    match self.value_at(self.curly, 4) {
                        Some(check) => !Self::before_function_expression(check),
                        None => false,
                    }
                } else if self.value_at(self.curly, 4) == Some("function") {
                    match self.value_at(self.curly, 5) {
                        Some(check) => !Self::before_function_expression(check),
                        None => true,
                    }
                } else {
                    false
                }
            }
            Some(_) => true,
        }
    }

    fn push(&mut self, kind: TokenKind, text: &str) {
        if kind == TokenKind::Punctuator || kind == TokenKind::Keyword {
            if text == "{" {
                self.curly = Some(self.values.len());
            } else if text == "(" {
                self.paren = Some(self.values.len());
            }
            self.values.push(Some(text.to_string()));
        } else {
            self.values.push(None);
        }
    }
}

/// Scanner driver that yields [`TokenEntry`] values on demand.
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    track_comment: bool,
    buffer: std::collections::VecDeque<TokenEntry>,
    reader: Reader,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over the given source.
    pub fn new(source: &'a str, options: &TokenizeOptions) -> Self {
        let mut scanner = Scanner::new(source, options.tolerant);
        scanner.set_track_comment(options.comment);
        Self {
            scanner,
            track_comment: options.comment,
            buffer: std::collections::VecDeque::new(),
            reader: Reader::default(),
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[SyntaxError] {
        self.scanner.error_handler().errors()
    }

    fn take_errors(&mut self) -> Vec<SyntaxError> {
        self.scanner.error_handler_mut().take_errors()
    }

    /// Produces the next entry, or `None` at end of input.
    pub fn get_next_token(&mut self) -> Result<Option<TokenEntry>> {
        if self.buffer.is_empty() {
            let comments = self.scanner.scan_comments()?;
            if self.track_comment {
                for comment in comments {
                    self.buffer.push_back(TokenEntry {
                        kind: if comment.multi_line {
                            "BlockComment".to_string()
                        } else {
                            "LineComment".to_string()
                        },
                        value: comment.value,
                        span: comment.span,
                        loc: comment.loc,
                        regex: None,
                    });
                }
            }

            if !self.scanner.eof() {
                let start_line = self.scanner.line_number();
                let start_column = (self.scanner.index() - self.scanner.line_start()) as u32;

                let maybe_regex = self.scanner.source()[self.scanner.index()..]
                    .starts_with('/')
                    && self.reader.is_regex_start();

                let token = if maybe_regex {
                    let state = self.scanner.save_state();
                    match self.scanner.scan_reg_exp() {
                        Ok(token) => token,
                        Err(_) => {
                            self.scanner.restore_state(state);
                            self.scanner.lex()?
                        }
                    }
                } else {
                    self.scanner.lex()?
                };

                let text = self.scanner.source()[token.start..token.end].to_string();
                self.reader.push(token.kind, token.text());

                let regex = match &token.value {
                    TokenValue::Regex { pattern, flags } => Some(RegexData {
                        pattern: pattern.clone(),
                        flags: flags.clone(),
                    }),
                    _ => None,
                };

                self.buffer.push_back(TokenEntry {
                    kind: token.kind.name().to_string(),
                    value: text,
                    span: Span::new(token.start, token.end),
                    loc: SourceLocation::new(
                        Position::new(start_line, start_column),
                        Position::new(
                            self.scanner.line_number(),
                            (self.scanner.index() - self.scanner.line_start()) as u32,
                        ),
                    ),
                    regex,
                });
            }
        }

        Ok(self.buffer.pop_front())
    }
}

/// Tokenizes source text.
///
/// In tolerant mode scanning stops at the first unrecoverable error, with
/// everything scanned so far plus the recorded errors returned; otherwise
/// the first error is raised.
pub fn tokenize(source: &str, options: &TokenizeOptions) -> Result<TokenizeResult> {
    let mut tokenizer = Tokenizer::new(source, options);
    let mut tokens = Vec::new();

    loop {
        match tokenizer.get_next_token() {
            Ok(Some(entry)) => tokens.push(entry),
            Ok(None) => break,
            Err(error) => {
                if options.tolerant {
                    let _ = tokenizer.scanner.error_handler_mut().tolerate(error);
                    break;
                }
                return Err(error);
            }
        }
    }

    let errors = tokenizer.take_errors();
    Ok(TokenizeResult { tokens, errors })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_values(source: &str) -> Vec<(String, String)> {
        tokenize(source, &TokenizeOptions::default())
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_basic_stream() {
        let tokens = kinds_and_values("var x = 42");
        assert_eq!(
            tokens,
            vec![
                ("Keyword".to_string(), "var".to_string()),
                ("Identifier".to_string(), "x".to_string()),
                ("Punctuator".to_string(), "=".to_string()),
                ("Numeric".to_string(), "42".to_string()),
            ]
        );
    }

    #[test]
    fn test_division_after_identifier() {
        let tokens = kinds_and_values("a/b/g");
        let kinds: Vec<_> = tokens.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["Identifier", "Punctuator", "Identifier", "Punctuator", "Identifier"]
        );
    }

    #[test]
    fn test_regex_at_start_and_after_operator() {
        let tokens = kinds_and_values("/a/g");
        assert_eq!(tokens[0].0, "RegularExpression");
        assert_eq!(tokens[0].1, "/a/g");

        let tokens = kinds_and_values("x = /a/g");
        assert_eq!(tokens[2].0, "RegularExpression");
    }

    #[test]
    fn test_regex_after_keyword_paren() {
        let tokens = kinds_and_values("if (x) /a/.test(x)");
        assert!(tokens.iter().any(|(k, _)| k == "RegularExpression"));
    }

    #[test]
    fn test_division_after_function_expression_body() {
        // The `}` closes a function expression, so `/` divides.
        let tokens = kinds_and_values("x = function() {} / 2");
        assert!(tokens.iter().all(|(k, _)| k != "RegularExpression"));
    }

    #[test]
    fn test_comment_entries() {
        let options = TokenizeOptions {
            comment: true,
            ..TokenizeOptions::default()
        };
        let result = tokenize("// note\nx /* b */", &options).unwrap();
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(kinds, vec!["LineComment", "Identifier", "BlockComment"]);
    }

    #[test]
    fn test_tolerant_stops_and_records() {
        let options = TokenizeOptions {
            tolerant: true,
            ..TokenizeOptions::default()
        };
        let result = tokenize("x = \"unterminated", &options).unwrap();
        assert!(!result.errors.is_empty());
        assert_eq!(result.tokens.len(), 2);
    }

    #[test]
    fn test_strict_raises() {
        assert!(tokenize("\"unterminated", &TokenizeOptions::default()).is_err());
    }

    #[test]
    fn test_entry_spans_slice_source() {
        let source = "let s = 'hi'";
        let result = tokenize(source, &TokenizeOptions::default()).unwrap();
        for entry in &result.tokens {
            assert_eq!(&source[entry.span.start..entry.span.end], entry.value);
        }
    }
}
