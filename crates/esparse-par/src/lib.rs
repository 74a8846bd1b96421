//! esparse-par - Recursive-descent parser for ECMAScript (ES2017+) with JSX.
//!
//! The parser drives the scanner one token at a time, keeping a single
//! lookahead token plus two markers that bookend the most recent token
//! consumption; every node's range falls out of those markers. Grammar
//! productions map one-to-one onto methods, split across modules by
//! concern:
//!
//! - `expr` - expressions, from primaries up through sequences
//! - `pattern` - binding patterns and cover-grammar reinterpretation
//! - `stmt` - statements and automatic semicolon insertion
//! - `decl` - functions, classes, directives, and module declarations
//! - `jsx` - the JSX overlay, active when the config enables it
//!
//! ECMAScript is not LL(k): arrow parameter lists, binding patterns, and
//! the regex/division split only disambiguate after more tokens have been
//! seen. The parser handles this with a *cover grammar* - parse the
//! ambiguous form as an expression while tracking whether it could still
//! be a pattern, then reinterpret at commit time - plus scanner state
//! snapshots for the few places that genuinely rescan.

pub mod ast;
mod decl;
mod edge_cases;
mod expr;
mod jsx;
mod pattern;
mod stmt;

use rustc_hash::FxHashSet;

use esparse_lex::{
    is_future_reserved_word, is_strict_mode_reserved_word, Comment, Scanner, Token, TokenKind,
    TokenValue,
};
use esparse_util::{messages, Position, Result, SourceLocation, Span, SyntaxError};

use ast::{Program, SourceType};

/// Parser options.
#[derive(Clone, Debug, Default)]
pub struct ParserConfig {
    /// Attach byte ranges to output (always computed; recorded for callers).
    pub range: bool,
    /// Attach line/column locations to output (always computed).
    pub loc: bool,
    /// Name attached to every location's `source` field.
    pub source: Option<String>,
    /// Collect the token stream onto the program node.
    pub tokens: bool,
    /// Collect skipped comments onto the program node.
    pub comment: bool,
    /// Record errors and keep going instead of stopping at the first one.
    pub tolerant: bool,
    /// Recognize JSX elements in expression position.
    pub jsx: bool,
}

/// Receives every finalized node and collected comment, in finalize order.
///
/// Nodes are reported as their kind tag plus position metadata; the comment
/// attachment pass is built on this stream.
pub trait Delegate {
    fn on_node(&mut self, kind: &'static str, span: Span, loc: &SourceLocation) {
        let _ = (kind, span, loc);
    }
    fn on_comment(&mut self, comment: &Comment) {
        let _ = comment;
    }
}

/// A position bookmark: where the next (or most recent) token starts.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Marker {
    pub index: usize,
    pub line: u32,
    pub column: u32,
}

/// The grammar flags threaded through every production.
///
/// Saved and restored by value on function, class, loop, and switch
/// boundaries.
#[derive(Clone, Debug, Default)]
pub(crate) struct Context {
    pub is_module: bool,
    pub allow_in: bool,
    pub allow_strict_directive: bool,
    pub allow_yield: bool,
    pub allow_await: bool,
    pub first_cover_initialized_name_error: Option<Token>,
    pub is_assignment_target: bool,
    pub is_binding_element: bool,
    pub in_function_body: bool,
    pub in_iteration: bool,
    pub in_switch: bool,
    pub label_set: FxHashSet<String>,
    pub strict: bool,
}

/// Recursive-descent parser over the scanner's token stream.
pub struct Parser<'a> {
    pub(crate) config: ParserConfig,
    pub(crate) scanner: Scanner<'a>,
    pub(crate) lookahead: Token,
    pub(crate) context: Context,
    pub(crate) tokens: Vec<Token>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) start_marker: Marker,
    pub(crate) last_marker: Marker,
    pub(crate) has_line_terminator: bool,
    pub(crate) delegate: Option<Box<dyn Delegate + 'a>>,
    pub(crate) export_names: decl::ExportNameSet,
    primed: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given source.
    pub fn new(source: &'a str, config: ParserConfig) -> Self {
        let mut scanner = Scanner::new(source, config.tolerant);
        scanner.set_track_comment(config.comment);

        let lookahead = Token::eof(0, scanner.line_number(), 0);
        let start = Marker {
            index: 0,
            line: scanner.line_number(),
            column: 0,
        };

        Self {
            config,
            scanner,
            lookahead,
            context: Context {
                allow_in: true,
                allow_strict_directive: true,
                ..Context::default()
            },
            tokens: Vec::new(),
            comments: Vec::new(),
            start_marker: start,
            last_marker: start,
            has_line_terminator: false,
            delegate: None,
            export_names: decl::ExportNameSet::default(),
            primed: false,
        }
    }

    /// Attaches a delegate receiving finalized nodes and comments.
    pub fn with_delegate(mut self, delegate: Box<dyn Delegate + 'a>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Parses the source as a Script.
    pub fn parse_script(&mut self) -> Result<Program> {
        self.initialize()?;
        let marker = self.create_marker();

        let mut body = self.parse_directive_prologues()?;
        while self.lookahead.kind != TokenKind::Eof {
            body.push(self.parse_statement_list_item()?);
        }

        let (span, loc) = self.finalize(marker, "Program");
        Ok(self.make_program(body, SourceType::Script, span, loc))
    }

    /// Parses the source as a Module; module code is always strict.
    pub fn parse_module(&mut self) -> Result<Program> {
        self.context.strict = true;
        self.context.is_module = true;
        self.scanner.set_module(true);

        self.initialize()?;
        let marker = self.create_marker();

        let mut body = self.parse_directive_prologues()?;
        while self.lookahead.kind != TokenKind::Eof {
            body.push(self.parse_statement_list_item()?);
        }

        let (span, loc) = self.finalize(marker, "Program");
        Ok(self.make_program(body, SourceType::Module, span, loc))
    }

    /// Errors recorded so far (tolerant mode).
    pub fn errors(&self) -> &[SyntaxError] {
        self.scanner.error_handler().errors()
    }

    fn make_program(
        &mut self,
        body: Vec<ast::Stmt>,
        source_type: SourceType,
        span: Span,
        loc: SourceLocation,
    ) -> Program {
        Program {
            body,
            source_type,
            span,
            loc,
            tokens: if self.config.tokens {
                Some(std::mem::take(&mut self.tokens))
            } else {
                None
            },
            comments: if self.config.comment {
                Some(std::mem::take(&mut self.comments))
            } else {
                None
            },
            errors: if self.config.tolerant {
                Some(self.scanner.error_handler_mut().take_errors())
            } else {
                None
            },
        }
    }

    /// Scans the first lookahead token. Called once, by the entry points.
    fn initialize(&mut self) -> Result<()> {
        if self.primed {
            return Ok(());
        }
        self.primed = true;
        self.next_token()?;
        self.last_marker = self.scanner_marker();
        Ok(())
    }

    // ========================================================================
    // TOKEN PLUMBING
    // ========================================================================

    pub(crate) fn scanner_marker(&self) -> Marker {
        Marker {
            index: self.scanner.index(),
            line: self.scanner.line_number(),
            column: (self.scanner.index() - self.scanner.line_start()) as u32,
        }
    }

    pub(crate) fn collect_comments(&mut self) -> Result<()> {
        let comments = self.scanner.scan_comments()?;
        if self.config.comment {
            for comment in comments {
                if let Some(delegate) = self.delegate.as_mut() {
                    delegate.on_comment(&comment);
                }
                self.comments.push(comment);
            }
        }
        Ok(())
    }

    /// The verbatim source text of a token.
    pub(crate) fn get_token_raw(&self, token: &Token) -> String {
        self.scanner.source()[token.start..token.end].to_string()
    }

    /// Consumes the lookahead, scans its replacement, and returns it.
    pub(crate) fn next_token(&mut self) -> Result<Token> {
        let token = self.lookahead.clone();

        self.last_marker = self.scanner_marker();

        self.collect_comments()?;
        if self.scanner.index() != self.start_marker.index {
            self.start_marker = self.scanner_marker();
        }

        let mut next = self.scanner.lex()?;
        self.has_line_terminator = token.line_number != next.line_number;

        if self.context.strict
            && next.kind == TokenKind::Identifier
            && is_strict_mode_reserved_word(next.text())
        {
            next.kind = TokenKind::Keyword;
        }

        if self.config.tokens && next.kind != TokenKind::Eof {
            self.tokens.push(next.clone());
        }

        self.lookahead = next;
        Ok(token)
    }

    /// Rescans from the lookahead's `/` under the regex goal and re-primes
    /// the lookahead behind it.
    pub(crate) fn next_regex_token(&mut self) -> Result<Token> {
        self.collect_comments()?;

        let token = self.scanner.scan_reg_exp()?;
        if self.config.tokens {
            // Replace the `/` (or `/=`) token scanned under the wrong goal.
            self.tokens.pop();
            self.tokens.push(token.clone());
        }

        self.lookahead = token.clone();
        self.next_token()?;
        Ok(token)
    }

    // ========================================================================
    // MARKERS AND NODE FINALIZATION
    // ========================================================================

    /// Marker for a node starting at the current lookahead.
    pub(crate) fn create_marker(&self) -> Marker {
        self.start_marker
    }

    /// Marker for a node starting at an already-consumed token.
    pub(crate) fn marker_of(&self, token: &Token) -> Marker {
        Marker {
            index: token.start,
            line: token.line_number,
            column: (token.start - token.line_start) as u32,
        }
    }

    /// Closes a node begun at `marker`: computes its range and location and
    /// reports it to the delegate.
    pub(crate) fn finalize(&mut self, marker: Marker, kind: &'static str) -> (Span, SourceLocation) {
        let span = Span::new(marker.index, self.last_marker.index);
        let loc = SourceLocation {
            start: Position::new(marker.line, marker.column),
            end: Position::new(self.last_marker.line, self.last_marker.column),
            source: self.config.source.clone(),
        };
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_node(kind, span, &loc);
        }
        (span, loc)
    }

    // ========================================================================
    // ERROR REPORTING
    // ========================================================================

    fn error_at_last_marker(&self, template: &str, args: &[&str]) -> SyntaxError {
        SyntaxError::new(
            messages::format_message(template, args),
            self.last_marker.index,
            self.last_marker.line,
            self.last_marker.column + 1,
        )
    }

    /// Raises a formatted error at the most recent token.
    pub(crate) fn throw_parse_error<T>(&self, template: &str, args: &[&str]) -> Result<T> {
        Err(self.error_at_last_marker(template, args))
    }

    /// Records a formatted error in tolerant mode, raises it otherwise.
    pub(crate) fn tolerate_parse_error(&mut self, template: &str, args: &[&str]) -> Result<()> {
        let error = self.error_at_last_marker(template, args);
        self.scanner.error_handler_mut().tolerate(error)
    }

    /// Builds the "unexpected token" family of errors, picking the message
    /// from the token's kind when none is supplied.
    pub(crate) fn unexpected_token_error(
        &self,
        token: Option<&Token>,
        message: Option<&str>,
    ) -> SyntaxError {
        let mut template = message.unwrap_or(messages::UNEXPECTED_TOKEN).to_string();

        let value = if let Some(token) = token {
            if message.is_none() {
                template = match token.kind {
                    TokenKind::Eof => messages::UNEXPECTED_EOS,
                    TokenKind::Identifier => messages::UNEXPECTED_IDENTIFIER,
                    TokenKind::NumericLiteral => messages::UNEXPECTED_NUMBER,
                    TokenKind::StringLiteral => messages::UNEXPECTED_STRING,
                    TokenKind::Template => messages::UNEXPECTED_TEMPLATE,
                    _ => messages::UNEXPECTED_TOKEN,
                }
                .to_string();

                if token.kind == TokenKind::Keyword {
                    if is_future_reserved_word(token.text()) {
                        template = messages::UNEXPECTED_RESERVED.to_string();
                    } else if self.context.strict && is_strict_mode_reserved_word(token.text()) {
                        template = messages::STRICT_RESERVED_WORD.to_string();
                    }
                }
            }

            match &token.value {
                TokenValue::Template { raw, .. } => raw.clone(),
                TokenValue::Name(name) => name.clone(),
                _ => self.get_token_raw(token),
            }
        } else {
            "ILLEGAL".to_string()
        };

        let description = messages::format_message(&template, &[&value]);

        if let Some(token) = token {
            let index = token.start;
            let line = token.line_number;
            let last_marker_line_start = self.last_marker.index - self.last_marker.column as usize;
            let column = (token.start.saturating_sub(last_marker_line_start) + 1) as u32;
            SyntaxError::new(description, index, line, column)
        } else {
            SyntaxError::new(
                description,
                self.last_marker.index,
                self.last_marker.line,
                self.last_marker.column + 1,
            )
        }
    }

    /// Raises the unexpected-token error for `token`.
    pub(crate) fn throw_unexpected_token<T>(
        &self,
        token: Option<&Token>,
        message: Option<&str>,
    ) -> Result<T> {
        Err(self.unexpected_token_error(token, message))
    }

    /// Records the unexpected-token error in tolerant mode, raises it
    /// otherwise.
    pub(crate) fn tolerate_unexpected_token(
        &mut self,
        token: Option<&Token>,
        message: Option<&str>,
    ) -> Result<()> {
        let error = self.unexpected_token_error(token, message);
        self.scanner.error_handler_mut().tolerate(error)
    }

    // ========================================================================
    // TOKEN PREDICATES
    // ========================================================================

    /// Consumes the next token, which must be the given punctuator.
    pub(crate) fn expect(&mut self, value: &str) -> Result<()> {
        let token = self.next_token()?;
        if token.kind != TokenKind::Punctuator || token.text() != value {
            return Err(self.unexpected_token_error(Some(&token), None));
        }
        Ok(())
    }

    /// Like `expect(",")`, but in tolerant mode a `;` is taken as a slip of
    /// the comma and a closing `)`/`]` is left for the caller.
    pub(crate) fn expect_comma_separator(&mut self) -> Result<()> {
        if self.config.tolerant {
            let token = self.lookahead.clone();
            if token.kind == TokenKind::Punctuator && token.text() == "," {
                self.next_token()?;
            } else if token.kind == TokenKind::Punctuator && token.text() == ";" {
                self.next_token()?;
                self.tolerate_unexpected_token(Some(&token), None)?;
            } else {
                self.tolerate_unexpected_token(Some(&token), Some(messages::UNEXPECTED_TOKEN))?;
            }
            Ok(())
        } else {
            self.expect(",")
        }
    }

    /// Consumes the next token, which must be the given keyword.
    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind != TokenKind::Keyword || token.text() != keyword {
            return Err(self.unexpected_token_error(Some(&token), None));
        }
        Ok(token)
    }

    /// True if the lookahead is this punctuator.
    pub(crate) fn match_punct(&self, value: &str) -> bool {
        self.lookahead.is_punctuator(value)
    }

    /// True if the lookahead is this keyword.
    pub(crate) fn match_keyword(&self, keyword: &str) -> bool {
        self.lookahead.is_keyword(keyword)
    }

    /// True if the lookahead is an identifier spelling this contextual
    /// keyword.
    pub(crate) fn match_contextual_keyword(&self, keyword: &str) -> bool {
        self.lookahead.kind == TokenKind::Identifier && self.lookahead.text() == keyword
    }

    /// True if the lookahead is an assignment operator.
    pub(crate) fn match_assign(&self) -> bool {
        if self.lookahead.kind != TokenKind::Punctuator {
            return false;
        }
        matches!(
            self.lookahead.text(),
            "=" | "*=" | "**=" | "/=" | "%=" | "+=" | "-=" | "<<=" | ">>=" | ">>>=" | "&=" | "^="
                | "|="
        )
    }

    /// True for `async [no line terminator] function`.
    pub(crate) fn match_async_function(&mut self) -> bool {
        if !self.match_contextual_keyword("async") {
            return false;
        }
        let state = self.scanner.save_state();
        let _ = self.scanner.scan_comments();
        let next = self.scanner.lex();
        self.scanner.restore_state(state);
        match next {
            Ok(token) => state.line_number == token.line_number && token.is_keyword("function"),
            Err(_) => false,
        }
    }

    // ========================================================================
    // AUTOMATIC SEMICOLON INSERTION
    // ========================================================================

    /// Consumes a statement terminator, inserting a virtual one when the
    /// next token is `}`, is on a new line, or is the end of input.
    pub(crate) fn consume_semicolon(&mut self) -> Result<()> {
        if self.match_punct(";") {
            self.next_token()?;
        } else if !self.has_line_terminator {
            if self.lookahead.kind != TokenKind::Eof && !self.match_punct("}") {
                let token = self.lookahead.clone();
                return Err(self.unexpected_token_error(Some(&token), None));
            }
            self.last_marker = self.start_marker;
        }
        Ok(())
    }

    // ========================================================================
    // COVER GRAMMAR BOOKKEEPING
    // ========================================================================

    /// Runs a sub-parse whose pattern/assignment-target verdicts must not
    /// leak out; a pending cover-initializer error inside it is fatal.
    pub(crate) fn isolate_cover_grammar<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let previous_is_binding_element = self.context.is_binding_element;
        let previous_is_assignment_target = self.context.is_assignment_target;
        let previous_first_cover = self.context.first_cover_initialized_name_error.take();

        self.context.is_binding_element = true;
        self.context.is_assignment_target = true;

        let result = f(self)?;

        if let Some(token) = self.context.first_cover_initialized_name_error.clone() {
            return Err(self.unexpected_token_error(Some(&token), None));
        }

        self.context.is_binding_element = previous_is_binding_element;
        self.context.is_assignment_target = previous_is_assignment_target;
        self.context.first_cover_initialized_name_error = previous_first_cover;

        Ok(result)
    }

    /// Runs a sub-parse whose verdicts combine with the enclosing cover.
    pub(crate) fn inherit_cover_grammar<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let previous_is_binding_element = self.context.is_binding_element;
        let previous_is_assignment_target = self.context.is_assignment_target;
        let previous_first_cover = self.context.first_cover_initialized_name_error.take();

        self.context.is_binding_element = true;
        self.context.is_assignment_target = true;

        let result = f(self)?;

        self.context.is_binding_element =
            self.context.is_binding_element && previous_is_binding_element;
        self.context.is_assignment_target =
            self.context.is_assignment_target && previous_is_assignment_target;
        if previous_first_cover.is_some() {
            self.context.first_cover_initialized_name_error = previous_first_cover;
        }

        Ok(result)
    }
}
