//! esparse - ECMAScript (ES2017+/JSX) parsing for Rust.
//!
//! The crate front door: hand [`parse`] (or [`parse_script`] /
//! [`parse_module`]) some source text and get back an ESTree-shaped
//! [`Program`], optionally carrying the token stream, the comment stream,
//! and - in tolerant mode - the list of errors encountered. [`tokenize`]
//! runs the scanner alone.
//!
//! ```
//! use esparse::{parse_script, ParseOptions};
//!
//! let program = parse_script("var answer = 42;", &ParseOptions::default()).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod comment_handler;
pub mod tokenizer;

pub use esparse_lex::{Comment, Token, TokenKind, TokenValue};
pub use esparse_par::ast;
pub use esparse_par::ast::{Program, SourceType};
pub use esparse_par::{Delegate, Parser, ParserConfig};
pub use esparse_util::{Position, SourceLocation, Span, SyntaxError};

pub use comment_handler::{attach_comments, Attachment};
pub use tokenizer::{tokenize, TokenizeOptions, TokenizeResult};

/// Options accepted by the parse entry points.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Recognize JSX elements.
    pub jsx: bool,
    /// Parse as a script or module; `None` means script.
    pub source_type: Option<SourceType>,
    /// Record byte ranges on output nodes.
    pub range: bool,
    /// Record line/column locations on output nodes.
    pub loc: bool,
    /// Collect the token stream onto the program.
    pub tokens: bool,
    /// Collect comments onto the program.
    pub comment: bool,
    /// Compute leading/trailing comment attachment (implies `comment`).
    pub attach_comment: bool,
    /// Keep literal raw text (always kept; accepted for interface parity).
    pub raw: bool,
    /// Record errors and continue instead of stopping at the first one.
    pub tolerant: bool,
    /// Name recorded in every location's `source` field.
    pub source: Option<String>,
}

impl ParseOptions {
    fn to_parser_config(&self) -> ParserConfig {
        ParserConfig {
            range: self.range,
            loc: self.loc,
            source: self.source.clone(),
            tokens: self.tokens,
            comment: self.comment || self.attach_comment,
            tolerant: self.tolerant,
            jsx: self.jsx,
        }
    }
}

/// Parses source text into a [`Program`].
///
/// The source type comes from the options; plain scripts are the default.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(source, options.to_parser_config());
    match options.source_type.unwrap_or(SourceType::Script) {
        SourceType::Script => parser.parse_script(),
        SourceType::Module => parser.parse_module(),
    }
}

/// Parses source text with a delegate observing every finalized node and
/// collected comment.
pub fn parse_with_delegate<'a>(
    source: &'a str,
    options: &ParseOptions,
    delegate: Box<dyn Delegate + 'a>,
) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(source, options.to_parser_config()).with_delegate(delegate);
    match options.source_type.unwrap_or(SourceType::Script) {
        SourceType::Script => parser.parse_script(),
        SourceType::Module => parser.parse_module(),
    }
}

/// Parses source text as a script, whatever the options say.
pub fn parse_script(source: &str, options: &ParseOptions) -> Result<Program, SyntaxError> {
    let mut options = options.clone();
    options.source_type = Some(SourceType::Script);
    parse(source, &options)
}

/// Parses source text as a module; module code is always strict.
pub fn parse_module(source: &str, options: &ParseOptions) -> Result<Program, SyntaxError> {
    let mut options = options.clone();
    options.source_type = Some(SourceType::Module);
    parse(source, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esparse_par::ast::*;

    #[test]
    fn test_parse_defaults_to_script() {
        let program = parse("var x;", &ParseOptions::default()).unwrap();
        assert_eq!(program.source_type, SourceType::Script);
        assert!(program.tokens.is_none());
        assert!(program.comments.is_none());
        assert!(program.errors.is_none());
    }

    #[test]
    fn test_parse_module_sets_source_type() {
        let program = parse_module("export var x = 1;", &ParseOptions::default()).unwrap();
        assert_eq!(program.source_type, SourceType::Module);
    }

    #[test]
    fn test_script_rejects_module_syntax() {
        let err = parse_script("import x from \"m\"", &ParseOptions::default()).unwrap_err();
        assert_eq!(SyntaxError::NAME, "SyntaxError");
        assert!(err.description.contains("Unexpected token"));
    }

    #[test]
    fn test_options_collect_tokens_and_comments() {
        let options = ParseOptions {
            tokens: true,
            comment: true,
            ..ParseOptions::default()
        };
        let program = parse("/* note */ a + b", &options).unwrap();
        assert_eq!(program.tokens.as_ref().unwrap().len(), 3);
        assert_eq!(program.comments.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_tolerant_collects_errors() {
        let options = ParseOptions {
            tolerant: true,
            ..ParseOptions::default()
        };
        let program = parse("1 = 2", &options).unwrap();
        assert!(!program.errors.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_attach_comment_implies_comment() {
        let options = ParseOptions {
            attach_comment: true,
            ..ParseOptions::default()
        };
        let program = parse("// lead\nvar x;", &options).unwrap();
        assert!(program.comments.is_some());
    }

    #[test]
    fn test_jsx_requires_option() {
        assert!(parse("<a />", &ParseOptions::default()).is_err());
        let options = ParseOptions {
            jsx: true,
            ..ParseOptions::default()
        };
        let program = parse("<a />", &options).unwrap();
        match &program.body[0] {
            Stmt::Expression(statement) => {
                assert!(matches!(statement.expression, Expr::JsxElement(_)));
            }
            other => panic!("expected expression, got {:?}", other),
        }
    }
}
