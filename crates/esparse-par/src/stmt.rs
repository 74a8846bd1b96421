//! Statement parsing.
//!
//! Dispatch is on the lookahead token. Statement terminators go through
//! `consume_semicolon`, which applies automatic semicolon insertion; the
//! restricted productions (`return`, `throw`, `continue`, `break`) check the
//! line-terminator flag themselves before consuming their operand.

use esparse_lex::{TokenKind, TokenValue};
use esparse_util::{messages, Result};

use crate::ast::*;
use crate::Parser;

/// Options threaded through declaration-list parsing; `in_for` relaxes the
/// initializer requirements inside a `for` head.
#[derive(Clone, Copy)]
pub(crate) struct DeclarationOptions {
    pub in_for: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement_list_item(&mut self) -> Result<Stmt> {
        self.context.is_assignment_target = true;
        self.context.is_binding_element = true;

        if self.lookahead.kind == TokenKind::Keyword {
            match self.lookahead.text() {
                "export" => {
                    if !self.context.is_module {
                        let token = self.lookahead.clone();
                        self.tolerate_unexpected_token(
                            Some(&token),
                            Some(messages::ILLEGAL_EXPORT_DECLARATION),
                        )?;
                    }
                    self.parse_export_declaration()
                }
                "import" => {
                    if !self.context.is_module {
                        let token = self.lookahead.clone();
                        self.tolerate_unexpected_token(
                            Some(&token),
                            Some(messages::ILLEGAL_IMPORT_DECLARATION),
                        )?;
                    }
                    self.parse_import_declaration()
                }
                "const" => self.parse_lexical_declaration(DeclarationOptions { in_for: false }),
                "function" => self.parse_function_declaration(false).map(Stmt::Function),
                "class" => self.parse_class_declaration(false).map(Stmt::Class),
                "let" => {
                    if self.is_lexical_declaration() {
                        self.parse_lexical_declaration(DeclarationOptions { in_for: false })
                    } else {
                        self.parse_statement()
                    }
                }
                _ => self.parse_statement(),
            }
        } else {
            self.parse_statement()
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        match self.lookahead.kind {
            TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::NumericLiteral
            | TokenKind::StringLiteral
            | TokenKind::Template
            | TokenKind::RegularExpression => self.parse_expression_statement(),

            TokenKind::Punctuator => match self.lookahead.text() {
                "{" => self.parse_block().map(Stmt::Block),
                ";" => self.parse_empty_statement(),
                _ => self.parse_expression_statement(),
            },

            TokenKind::Identifier => {
                if self.match_async_function() {
                    self.parse_function_declaration(false).map(Stmt::Function)
                } else {
                    self.parse_labelled_statement()
                }
            }

            TokenKind::Keyword => match self.lookahead.text() {
                "break" => self.parse_break_statement(),
                "continue" => self.parse_continue_statement(),
                "debugger" => self.parse_debugger_statement(),
                "do" => self.parse_do_while_statement(),
                "for" => self.parse_for_statement(),
                "function" => self.parse_function_declaration(false).map(Stmt::Function),
                "if" => self.parse_if_statement(),
                "return" => self.parse_return_statement(),
                "switch" => self.parse_switch_statement(),
                "throw" => self.parse_throw_statement(),
                "try" => self.parse_try_statement(),
                "var" => self.parse_variable_statement().map(Stmt::Variable),
                "while" => self.parse_while_statement(),
                "with" => self.parse_with_statement(),
                _ => self.parse_expression_statement(),
            },

            _ => {
                let token = self.lookahead.clone();
                self.throw_unexpected_token(Some(&token), None)
            }
        }
    }

    // ========================================================================
    // BLOCKS AND SIMPLE STATEMENTS
    // ========================================================================

    pub(crate) fn parse_block(&mut self) -> Result<BlockStatement> {
        let marker = self.create_marker();

        self.expect("{")?;
        let mut body = Vec::new();
        loop {
            if self.match_punct("}") {
                break;
            }
            body.push(self.parse_statement_list_item()?);
        }
        self.expect("}")?;

        let (span, loc) = self.finalize(marker, "BlockStatement");
        Ok(BlockStatement { body, span, loc })
    }

    fn parse_empty_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect(";")?;
        let (span, loc) = self.finalize(marker, "EmptyStatement");
        Ok(Stmt::Empty(EmptyStatement { span, loc }))
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        let (span, loc) = self.finalize(marker, "ExpressionStatement");
        Ok(Stmt::Expression(ExpressionStatement {
            expression,
            directive: None,
            span,
            loc,
        }))
    }

    fn parse_debugger_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("debugger")?;
        self.consume_semicolon()?;
        let (span, loc) = self.finalize(marker, "DebuggerStatement");
        Ok(Stmt::Debugger(DebuggerStatement { span, loc }))
    }

    // ========================================================================
    // VARIABLE DECLARATIONS
    // ========================================================================

    fn parse_variable_declarator(
        &mut self,
        options: DeclarationOptions,
    ) -> Result<VariableDeclarator> {
        let marker = self.create_marker();

        let mut params = Vec::new();
        let id = self.parse_pattern(&mut params, Some(DeclarationKind::Var))?;

        if self.context.strict {
            if let Pattern::Identifier(identifier) = &id {
                if esparse_lex::is_restricted_word(&identifier.name) {
                    self.tolerate_parse_error(messages::STRICT_VAR_NAME, &[])?;
                }
            }
        }

        let mut init = None;
        if self.match_punct("=") {
            self.next_token()?;
            init = Some(self.isolate_cover_grammar(|p| p.parse_assignment_expression())?);
        } else if !matches!(id, Pattern::Identifier(_)) && !options.in_for {
            self.expect("=")?;
        }

        let (span, loc) = self.finalize(marker, "VariableDeclarator");
        Ok(VariableDeclarator {
            id,
            init,
            span,
            loc,
        })
    }

    fn parse_variable_declaration_list(
        &mut self,
        options: DeclarationOptions,
    ) -> Result<Vec<VariableDeclarator>> {
        let mut list = vec![self.parse_variable_declarator(options)?];
        while self.match_punct(",") {
            self.next_token()?;
            list.push(self.parse_variable_declarator(options)?);
        }
        Ok(list)
    }

    pub(crate) fn parse_variable_statement(&mut self) -> Result<VariableDeclaration> {
        let marker = self.create_marker();
        self.expect_keyword("var")?;
        let declarations =
            self.parse_variable_declaration_list(DeclarationOptions { in_for: false })?;
        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, "VariableDeclaration");
        Ok(VariableDeclaration {
            declarations,
            kind: DeclarationKind::Var,
            span,
            loc,
        })
    }

    /// After `let`, decides whether a lexical declaration follows; `let` is
    /// only reserved when it is.
    fn is_lexical_declaration(&mut self) -> bool {
        let state = self.scanner.save_state();
        let _ = self.scanner.scan_comments();
        let next = self.scanner.lex();
        self.scanner.restore_state(state);

        match next {
            Ok(token) => {
                token.kind == TokenKind::Identifier
                    || token.is_punctuator("[")
                    || token.is_punctuator("{")
                    || token.is_keyword("let")
                    || token.is_keyword("yield")
            }
            Err(_) => false,
        }
    }

    fn parse_lexical_binding(
        &mut self,
        kind: DeclarationKind,
        options: DeclarationOptions,
    ) -> Result<VariableDeclarator> {
        let marker = self.create_marker();

        let mut params = Vec::new();
        let id = self.parse_pattern(&mut params, Some(kind))?;

        if self.context.strict {
            if let Pattern::Identifier(identifier) = &id {
                if esparse_lex::is_restricted_word(&identifier.name) {
                    self.tolerate_parse_error(messages::STRICT_VAR_NAME, &[])?;
                }
            }
        }

        let mut init = None;
        if kind == DeclarationKind::Const {
            if !self.match_keyword("in") && !self.match_contextual_keyword("of") {
                if self.match_punct("=") {
                    self.next_token()?;
                    init =
                        Some(self.isolate_cover_grammar(|p| p.parse_assignment_expression())?);
                } else {
                    return self
                        .throw_parse_error(messages::DECLARATION_MISSING_INITIALIZER, &["const"]);
                }
            }
        } else if (!options.in_for && !matches!(id, Pattern::Identifier(_)))
            || self.match_punct("=")
        {
            self.expect("=")?;
            init = Some(self.isolate_cover_grammar(|p| p.parse_assignment_expression())?);
        }

        let (span, loc) = self.finalize(marker, "VariableDeclarator");
        Ok(VariableDeclarator {
            id,
            init,
            span,
            loc,
        })
    }

    pub(crate) fn parse_binding_list(
        &mut self,
        kind: DeclarationKind,
        options: DeclarationOptions,
    ) -> Result<Vec<VariableDeclarator>> {
        let mut list = vec![self.parse_lexical_binding(kind, options)?];
        while self.match_punct(",") {
            self.next_token()?;
            list.push(self.parse_lexical_binding(kind, options)?);
        }
        Ok(list)
    }

    pub(crate) fn parse_lexical_declaration(
        &mut self,
        options: DeclarationOptions,
    ) -> Result<Stmt> {
        let marker = self.create_marker();
        let token = self.next_token()?;
        let kind = match token.text() {
            "let" => DeclarationKind::Let,
            "const" => DeclarationKind::Const,
            _ => return self.throw_unexpected_token(Some(&token), None),
        };

        let declarations = self.parse_binding_list(kind, options)?;
        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, "VariableDeclaration");
        Ok(Stmt::Variable(VariableDeclaration {
            declarations,
            kind,
            span,
            loc,
        }))
    }

    // ========================================================================
    // CONTROL FLOW
    // ========================================================================

    fn parse_if_clause(&mut self) -> Result<Stmt> {
        if self.context.strict && self.match_keyword("function") {
            self.tolerate_parse_error(messages::STRICT_FUNCTION, &[])?;
        }
        self.parse_statement()
    }

    fn parse_if_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        let consequent;
        let mut alternate = None;

        self.expect_keyword("if")?;
        self.expect("(")?;
        let test = self.parse_expression()?;

        if !self.match_punct(")") && self.config.tolerant {
            let token = self.next_token()?;
            self.tolerate_unexpected_token(Some(&token), None)?;
            let (span, loc) = self.finalize(self.create_marker(), "EmptyStatement");
            consequent = Stmt::Empty(EmptyStatement { span, loc });
        } else {
            self.expect(")")?;
            consequent = self.parse_if_clause()?;
            if self.match_keyword("else") {
                self.next_token()?;
                alternate = Some(Box::new(self.parse_if_clause()?));
            }
        }

        let (span, loc) = self.finalize(marker, "IfStatement");
        Ok(Stmt::If(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate,
            span,
            loc,
        }))
    }

    fn parse_do_while_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("do")?;

        let previous_in_iteration = self.context.in_iteration;
        self.context.in_iteration = true;
        let body = self.parse_statement()?;
        self.context.in_iteration = previous_in_iteration;

        self.expect_keyword("while")?;
        self.expect("(")?;
        let test = self.parse_expression()?;

        if !self.match_punct(")") && self.config.tolerant {
            let token = self.next_token()?;
            self.tolerate_unexpected_token(Some(&token), None)?;
        } else {
            self.expect(")")?;
            if self.match_punct(";") {
                self.next_token()?;
            }
        }

        let (span, loc) = self.finalize(marker, "DoWhileStatement");
        Ok(Stmt::DoWhile(DoWhileStatement {
            body: Box::new(body),
            test,
            span,
            loc,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        let body;

        self.expect_keyword("while")?;
        self.expect("(")?;
        let test = self.parse_expression()?;

        if !self.match_punct(")") && self.config.tolerant {
            let token = self.next_token()?;
            self.tolerate_unexpected_token(Some(&token), None)?;
            let (span, loc) = self.finalize(self.create_marker(), "EmptyStatement");
            body = Stmt::Empty(EmptyStatement { span, loc });
        } else {
            self.expect(")")?;
            let previous_in_iteration = self.context.in_iteration;
            self.context.in_iteration = true;
            body = self.parse_statement()?;
            self.context.in_iteration = previous_in_iteration;
        }

        let (span, loc) = self.finalize(marker, "WhileStatement");
        Ok(Stmt::While(WhileStatement {
            test,
            body: Box::new(body),
            span,
            loc,
        }))
    }

    fn parse_for_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();

        let mut init: Option<ForInit> = None;
        let mut test = None;
        let mut update = None;
        let mut left: Option<ForTarget> = None;
        let mut right = None;
        let mut for_in = true;

        self.expect_keyword("for")?;
        self.expect("(")?;

        if self.match_punct(";") {
            self.next_token()?;
        } else if self.match_keyword("var") {
            let init_marker = self.create_marker();
            self.next_token()?;

            let previous_allow_in = self.context.allow_in;
            self.context.allow_in = false;
            let declarations =
                self.parse_variable_declaration_list(DeclarationOptions { in_for: true })?;
            self.context.allow_in = previous_allow_in;

            if declarations.len() == 1 && self.match_keyword("in") {
                let declarator = &declarations[0];
                if declarator.init.is_some()
                    && (matches!(declarator.id, Pattern::Array(_) | Pattern::Object(_))
                        || self.context.strict)
                {
                    self.tolerate_parse_error(messages::FOR_IN_OF_LOOP_INITIALIZER, &["for-in"])?;
                }
                let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                left = Some(ForTarget::Variable(VariableDeclaration {
                    declarations,
                    kind: DeclarationKind::Var,
                    span,
                    loc,
                }));
                self.next_token()?;
                right = Some(self.parse_expression()?);
            } else if declarations.len() == 1
                && declarations[0].init.is_none()
                && self.match_contextual_keyword("of")
            {
                let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                left = Some(ForTarget::Variable(VariableDeclaration {
                    declarations,
                    kind: DeclarationKind::Var,
                    span,
                    loc,
                }));
                self.next_token()?;
                right = Some(self.parse_assignment_expression()?);
                for_in = false;
            } else {
                let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                init = Some(ForInit::Variable(VariableDeclaration {
                    declarations,
                    kind: DeclarationKind::Var,
                    span,
                    loc,
                }));
                self.expect(";")?;
            }
        } else if self.match_keyword("const") || self.match_keyword("let") {
            let init_marker = self.create_marker();
            let token = self.next_token()?;
            let kind = if token.text() == "const" {
                DeclarationKind::Const
            } else {
                DeclarationKind::Let
            };

            if !self.context.strict && self.lookahead.is_keyword("in") {
                // `for (let in xs)` keeps `let` as a plain name.
                let (span, loc) = self.finalize(init_marker, "Identifier");
                left = Some(ForTarget::Pattern(Pattern::Identifier(Identifier {
                    name: token.text().to_string(),
                    span,
                    loc,
                })));
                self.next_token()?;
                right = Some(self.parse_expression()?);
            } else {
                let previous_allow_in = self.context.allow_in;
                self.context.allow_in = false;
                let declarations =
                    self.parse_binding_list(kind, DeclarationOptions { in_for: true })?;
                self.context.allow_in = previous_allow_in;

                if declarations.len() == 1
                    && declarations[0].init.is_none()
                    && self.match_keyword("in")
                {
                    let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                    left = Some(ForTarget::Variable(VariableDeclaration {
                        declarations,
                        kind,
                        span,
                        loc,
                    }));
                    self.next_token()?;
                    right = Some(self.parse_expression()?);
                } else if declarations.len() == 1
                    && declarations[0].init.is_none()
                    && self.match_contextual_keyword("of")
                {
                    let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                    left = Some(ForTarget::Variable(VariableDeclaration {
                        declarations,
                        kind,
                        span,
                        loc,
                    }));
                    self.next_token()?;
                    right = Some(self.parse_assignment_expression()?);
                    for_in = false;
                } else {
                    let (span, loc) = self.finalize(init_marker, "VariableDeclaration");
                    init = Some(ForInit::Variable(VariableDeclaration {
                        declarations,
                        kind,
                        span,
                        loc,
                    }));
                    self.expect(";")?;
                }
            }
        } else {
            let init_start_token = self.lookahead.clone();

            let previous_allow_in = self.context.allow_in;
            self.context.allow_in = false;
            let init_expr = self.inherit_cover_grammar(|p| p.parse_assignment_expression())?;
            self.context.allow_in = previous_allow_in;

            if self.match_keyword("in") {
                if !self.context.is_assignment_target
                    || matches!(init_expr, Expr::Assignment(_))
                {
                    self.tolerate_parse_error(messages::INVALID_LHS_IN_FOR_IN, &[])?;
                }
                self.next_token()?;
                let pattern = self.reinterpret_expression_as_pattern(init_expr);
                left = Some(ForTarget::Pattern(pattern));
                right = Some(self.parse_expression()?);
            } else if self.match_contextual_keyword("of") {
                if !self.context.is_assignment_target
                    || matches!(init_expr, Expr::Assignment(_))
                {
                    self.tolerate_parse_error(messages::INVALID_LHS_IN_FOR_LOOP, &[])?;
                }
                self.next_token()?;
                let pattern = self.reinterpret_expression_as_pattern(init_expr);
                left = Some(ForTarget::Pattern(pattern));
                right = Some(self.parse_assignment_expression()?);
                for_in = false;
            } else {
                let mut init_expr = init_expr;
                if self.match_punct(",") {
                    let mut init_seq = vec![init_expr];
                    while self.match_punct(",") {
                        self.next_token()?;
                        init_seq.push(
                            self.isolate_cover_grammar(|p| p.parse_assignment_expression())?,
                        );
                    }
                    let (span, loc) = self
                        .finalize(self.marker_of(&init_start_token), "SequenceExpression");
                    init_expr = Expr::Sequence(SequenceExpression {
                        expressions: init_seq,
                        span,
                        loc,
                    });
                }
                init = Some(ForInit::Expr(init_expr));
                self.expect(";")?;
            }
        }

        if left.is_none() {
            if !self.match_punct(";") {
                test = Some(self.parse_expression()?);
            }
            self.expect(";")?;
            if !self.match_punct(")") {
                update = Some(self.parse_expression()?);
            }
        }

        self.expect(")")?;

        let previous_in_iteration = self.context.in_iteration;
        self.context.in_iteration = true;
        let body = self.isolate_cover_grammar(|p| p.parse_statement())?;
        self.context.in_iteration = previous_in_iteration;

        match left {
            None => {
                let (span, loc) = self.finalize(marker, "ForStatement");
                Ok(Stmt::For(ForStatement {
                    init,
                    test,
                    update,
                    body: Box::new(body),
                    span,
                    loc,
                }))
            }
            Some(left) => {
                let right = right.expect("for-in/of right-hand side");
                if for_in {
                    let (span, loc) = self.finalize(marker, "ForInStatement");
                    Ok(Stmt::ForIn(ForInStatement {
                        left,
                        right,
                        body: Box::new(body),
                        each: false,
                        span,
                        loc,
                    }))
                } else {
                    let (span, loc) = self.finalize(marker, "ForOfStatement");
                    Ok(Stmt::ForOf(ForOfStatement {
                        left,
                        right,
                        body: Box::new(body),
                        span,
                        loc,
                    }))
                }
            }
        }
    }

    // ========================================================================
    // LABELS, BREAK, CONTINUE, RETURN
    // ========================================================================

    fn parse_labelled_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        let expr = self.parse_expression()?;

        if let Expr::Identifier(id) = &expr {
            if self.match_punct(":") {
                let id = id.clone();
                self.next_token()?;

                if !self.context.label_set.insert(id.name.clone()) {
                    return self
                        .throw_parse_error(messages::REDECLARATION, &["Label", &id.name]);
                }

                let body = if self.match_keyword("class") {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(Some(&token), None)?;
                    Stmt::Class(self.parse_class_declaration(false)?)
                } else if self.match_keyword("function") {
                    let token = self.lookahead.clone();
                    let declaration = self.parse_function_declaration(false)?;
                    if self.context.strict {
                        self.tolerate_unexpected_token(
                            Some(&token),
                            Some(messages::STRICT_FUNCTION),
                        )?;
                    } else if declaration.generator {
                        self.tolerate_unexpected_token(
                            Some(&token),
                            Some(messages::GENERATOR_IN_LEGACY_CONTEXT),
                        )?;
                    }
                    Stmt::Function(declaration)
                } else {
                    self.parse_statement()?
                };
                self.context.label_set.remove(&id.name);

                let (span, loc) = self.finalize(marker, "LabeledStatement");
                return Ok(Stmt::Labeled(LabeledStatement {
                    label: id,
                    body: Box::new(body),
                    span,
                    loc,
                }));
            }
        }

        self.consume_semicolon()?;
        let (span, loc) = self.finalize(marker, "ExpressionStatement");
        Ok(Stmt::Expression(ExpressionStatement {
            expression: expr,
            directive: None,
            span,
            loc,
        }))
    }

    fn parse_continue_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("continue")?;

        let mut label = None;
        if self.lookahead.kind == TokenKind::Identifier && !self.has_line_terminator {
            let id = self.parse_variable_identifier(None)?;
            if !self.context.label_set.contains(&id.name) {
                return self.throw_parse_error(messages::UNKNOWN_LABEL, &[&id.name]);
            }
            label = Some(id);
        }

        self.consume_semicolon()?;
        if label.is_none() && !self.context.in_iteration {
            return self.throw_parse_error(messages::ILLEGAL_CONTINUE, &[]);
        }

        let (span, loc) = self.finalize(marker, "ContinueStatement");
        Ok(Stmt::Continue(ContinueStatement { label, span, loc }))
    }

    fn parse_break_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("break")?;

        let mut label = None;
        if self.lookahead.kind == TokenKind::Identifier && !self.has_line_terminator {
            let id = self.parse_variable_identifier(None)?;
            if !self.context.label_set.contains(&id.name) {
                return self.throw_parse_error(messages::UNKNOWN_LABEL, &[&id.name]);
            }
            label = Some(id);
        }

        self.consume_semicolon()?;
        if label.is_none() && !self.context.in_iteration && !self.context.in_switch {
            return self.throw_parse_error(messages::ILLEGAL_BREAK, &[]);
        }

        let (span, loc) = self.finalize(marker, "BreakStatement");
        Ok(Stmt::Break(BreakStatement { label, span, loc }))
    }

    fn parse_return_statement(&mut self) -> Result<Stmt> {
        if !self.context.in_function_body {
            self.tolerate_parse_error(messages::ILLEGAL_RETURN, &[])?;
        }

        let marker = self.create_marker();
        self.expect_keyword("return")?;

        let has_argument = (!self.match_punct(";")
            && !self.match_punct("}")
            && !self.has_line_terminator
            && self.lookahead.kind != TokenKind::Eof)
            || self.lookahead.kind == TokenKind::StringLiteral
            || self.lookahead.kind == TokenKind::Template;
        let argument = if has_argument {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, "ReturnStatement");
        Ok(Stmt::Return(ReturnStatement {
            argument,
            span,
            loc,
        }))
    }

    // ========================================================================
    // WITH, SWITCH, THROW, TRY
    // ========================================================================

    fn parse_with_statement(&mut self) -> Result<Stmt> {
        if self.context.strict {
            self.tolerate_parse_error(messages::STRICT_MODE_WITH, &[])?;
        }

        let marker = self.create_marker();
        let body;

        self.expect_keyword("with")?;
        self.expect("(")?;
        let object = self.parse_expression()?;

        if !self.match_punct(")") && self.config.tolerant {
            let token = self.next_token()?;
            self.tolerate_unexpected_token(Some(&token), None)?;
            let (span, loc) = self.finalize(self.create_marker(), "EmptyStatement");
            body = Stmt::Empty(EmptyStatement { span, loc });
        } else {
            self.expect(")")?;
            body = self.parse_statement()?;
        }

        let (span, loc) = self.finalize(marker, "WithStatement");
        Ok(Stmt::With(WithStatement {
            object,
            body: Box::new(body),
            span,
            loc,
        }))
    }

    fn parse_switch_case(&mut self) -> Result<SwitchCase> {
        let marker = self.create_marker();

        let test = if self.match_keyword("default") {
            self.next_token()?;
            None
        } else {
            self.expect_keyword("case")?;
            Some(self.parse_expression()?)
        };
        self.expect(":")?;

        let mut consequent = Vec::new();
        loop {
            if self.match_punct("}")
                || self.match_keyword("default")
                || self.match_keyword("case")
            {
                break;
            }
            consequent.push(self.parse_statement_list_item()?);
        }

        let (span, loc) = self.finalize(marker, "SwitchCase");
        Ok(SwitchCase {
            test,
            consequent,
            span,
            loc,
        })
    }

    fn parse_switch_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("switch")?;

        self.expect("(")?;
        let discriminant = self.parse_expression()?;
        self.expect(")")?;

        let previous_in_switch = self.context.in_switch;
        self.context.in_switch = true;

        let mut cases = Vec::new();
        let mut default_found = false;
        self.expect("{")?;
        loop {
            if self.match_punct("}") {
                break;
            }
            let clause = self.parse_switch_case()?;
            if clause.test.is_none() {
                if default_found {
                    return self.throw_parse_error(messages::MULTIPLE_DEFAULTS_IN_SWITCH, &[]);
                }
                default_found = true;
            }
            cases.push(clause);
        }
        self.expect("}")?;

        self.context.in_switch = previous_in_switch;

        let (span, loc) = self.finalize(marker, "SwitchStatement");
        Ok(Stmt::Switch(SwitchStatement {
            discriminant,
            cases,
            span,
            loc,
        }))
    }

    fn parse_throw_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("throw")?;

        if self.has_line_terminator {
            return self.throw_parse_error(messages::NEWLINE_AFTER_THROW, &[]);
        }

        let argument = self.parse_expression()?;
        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, "ThrowStatement");
        Ok(Stmt::Throw(ThrowStatement {
            argument,
            span,
            loc,
        }))
    }

    fn parse_catch_clause(&mut self) -> Result<CatchClause> {
        let marker = self.create_marker();

        self.expect_keyword("catch")?;
        self.expect("(")?;
        if self.match_punct(")") {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }

        let mut params = Vec::new();
        let param = self.parse_pattern(&mut params, None)?;

        let mut bound = rustc_hash::FxHashSet::default();
        for token in &params {
            if !bound.insert(token.text().to_string()) {
                self.tolerate_parse_error(messages::DUPLICATE_BINDING, &[token.text()])?;
            }
        }

        if self.context.strict {
            if let Pattern::Identifier(identifier) = &param {
                if esparse_lex::is_restricted_word(&identifier.name) {
                    self.tolerate_parse_error(messages::STRICT_CATCH_VARIABLE, &[])?;
                }
            }
        }

        self.expect(")")?;
        let body = self.parse_block()?;

        let (span, loc) = self.finalize(marker, "CatchClause");
        Ok(CatchClause {
            param,
            body,
            span,
            loc,
        })
    }

    fn parse_try_statement(&mut self) -> Result<Stmt> {
        let marker = self.create_marker();
        self.expect_keyword("try")?;

        let block = self.parse_block()?;
        let handler = if self.match_keyword("catch") {
            Some(self.parse_catch_clause()?)
        } else {
            None
        };
        let finalizer = if self.match_keyword("finally") {
            self.next_token()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return self.throw_parse_error(messages::NO_CATCH_OR_FINALLY, &[]);
        }

        let (span, loc) = self.finalize(marker, "TryStatement");
        Ok(Stmt::Try(TryStatement {
            block,
            handler,
            finalizer,
            span,
            loc,
        }))
    }

    // ========================================================================
    // DIRECTIVE PROLOGUES
    // ========================================================================

    fn parse_directive(&mut self) -> Result<Stmt> {
        let token = self.lookahead.clone();
        let marker = self.create_marker();

        let expression = self.parse_expression()?;
        let directive = if matches!(expression, Expr::Literal(_)) {
            let raw = self.get_token_raw(&token);
            Some(raw[1..raw.len() - 1].to_string())
        } else {
            None
        };
        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, if directive.is_some() { "Directive" } else { "ExpressionStatement" });
        Ok(Stmt::Expression(ExpressionStatement {
            expression,
            directive,
            span,
            loc,
        }))
    }

    /// Parses leading string-literal statements, flipping on strict mode if
    /// one of them is `"use strict"`.
    pub(crate) fn parse_directive_prologues(&mut self) -> Result<Vec<Stmt>> {
        let mut first_restricted: Option<esparse_lex::Token> = None;

        let mut body = Vec::new();
        loop {
            let token = self.lookahead.clone();
            if token.kind != TokenKind::StringLiteral {
                break;
            }

            let statement = self.parse_directive()?;
            let directive = match &statement {
                Stmt::Expression(e) => e.directive.clone(),
                _ => None,
            };
            body.push(statement);

            let directive = match directive {
                Some(directive) => directive,
                None => break,
            };

            if directive == "use strict" {
                self.context.strict = true;
                if let Some(first) = &first_restricted {
                    let first = first.clone();
                    self.tolerate_unexpected_token(
                        Some(&first),
                        Some(messages::STRICT_OCTAL_LITERAL),
                    )?;
                }
                if !self.context.allow_strict_directive {
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::ILLEGAL_LANGUAGE_MODE_DIRECTIVE),
                    )?;
                }
            } else if first_restricted.is_none() && matches!(&token.value, TokenValue::Str { octal: true, .. })
            {
                first_restricted = Some(token);
            }
        }

        Ok(body)
    }
}
