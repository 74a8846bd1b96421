//! Functions, classes, and module declarations.
//!
//! Formal parameter lists carry their own validation state: the tokens of
//! every bound name are collected while the patterns parse, then checked
//! for duplicates and restricted names. Which violations are fatal depends
//! on whether the body turns out to be strict, so the verdict is stored and
//! applied after the body has been parsed.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;

use esparse_lex::{is_restricted_word, is_strict_mode_reserved_word, Token, TokenKind};
use esparse_util::{messages, Result};

use crate::ast::*;
use crate::stmt::DeclarationOptions;
use crate::Parser;

/// A parsed parameter list plus its deferred strict-mode verdicts.
pub(crate) struct FormalParameterList {
    pub simple: bool,
    pub params: Vec<Pattern>,
    pub stricted: Option<Token>,
    pub first_restricted: Option<Token>,
    pub message: Option<&'static str>,
    pub param_set: FxHashSet<String>,
}

impl FormalParameterList {
    pub fn new() -> Self {
        Self {
            simple: true,
            params: Vec::new(),
            stricted: None,
            first_restricted: None,
            message: None,
            param_set: FxHashSet::default(),
        }
    }
}

impl<'a> Parser<'a> {
    // ========================================================================
    // FORMAL PARAMETERS
    // ========================================================================

    /// Registers one bound parameter name, recording restricted-name and
    /// duplicate verdicts for later.
    pub(crate) fn validate_param(
        &mut self,
        options: &mut FormalParameterList,
        param: &Token,
        name: &str,
    ) {
        if self.context.strict {
            if is_restricted_word(name) {
                options.stricted = Some(param.clone());
                options.message = Some(messages::STRICT_PARAM_NAME);
            }
            if options.param_set.contains(name) {
                options.stricted = Some(param.clone());
                options.message = Some(messages::STRICT_PARAM_DUPE);
            }
        } else if options.first_restricted.is_none() {
            if is_restricted_word(name) {
                options.first_restricted = Some(param.clone());
                options.message = Some(messages::STRICT_PARAM_NAME);
            } else if is_strict_mode_reserved_word(name) {
                options.first_restricted = Some(param.clone());
                options.message = Some(messages::STRICT_RESERVED_WORD);
            } else if options.param_set.contains(name) {
                options.stricted = Some(param.clone());
                options.message = Some(messages::STRICT_PARAM_DUPE);
            }
        }
        options.param_set.insert(name.to_string());
    }

    fn parse_formal_parameter(&mut self, options: &mut FormalParameterList) -> Result<()> {
        let mut params: Vec<Token> = Vec::new();
        let param = if self.match_punct("...") {
            self.parse_rest_element(&mut params)?
        } else {
            self.parse_pattern_with_default(&mut params, None)?
        };

        for token in &params {
            let name = token.text().to_string();
            self.validate_param(options, token, &name);
        }

        options.simple = options.simple && matches!(param, Pattern::Identifier(_));
        options.params.push(param);
        Ok(())
    }

    pub(crate) fn parse_formal_parameters(
        &mut self,
        first_restricted: Option<Token>,
    ) -> Result<FormalParameterList> {
        let mut options = FormalParameterList::new();
        options.first_restricted = first_restricted;

        self.expect("(")?;
        if !self.match_punct(")") {
            while self.lookahead.kind != TokenKind::Eof {
                self.parse_formal_parameter(&mut options)?;
                if self.match_punct(")") {
                    break;
                }
                self.expect(",")?;
                if self.match_punct(")") {
                    break;
                }
            }
        }
        self.expect(")")?;

        Ok(options)
    }

    // ========================================================================
    // FUNCTION BODIES
    // ========================================================================

    /// Parses a function body block, resetting the per-function context.
    pub(crate) fn parse_function_source_elements(&mut self) -> Result<BlockStatement> {
        let marker = self.create_marker();

        self.expect("{")?;
        let mut body = self.parse_directive_prologues()?;

        let previous_label_set = std::mem::take(&mut self.context.label_set);
        let previous_in_iteration = self.context.in_iteration;
        let previous_in_switch = self.context.in_switch;
        let previous_in_function_body = self.context.in_function_body;
        self.context.in_iteration = false;
        self.context.in_switch = false;
        self.context.in_function_body = true;

        while self.lookahead.kind != TokenKind::Eof {
            if self.match_punct("}") {
                break;
            }
            body.push(self.parse_statement_list_item()?);
        }
        self.expect("}")?;

        self.context.label_set = previous_label_set;
        self.context.in_iteration = previous_in_iteration;
        self.context.in_switch = previous_in_switch;
        self.context.in_function_body = previous_in_function_body;

        let (span, loc) = self.finalize(marker, "BlockStatement");
        Ok(BlockStatement { body, span, loc })
    }

    /// Shared tail of every method form: parse the body, then apply the
    /// deferred parameter verdicts under the body's strictness.
    pub(crate) fn parse_property_method(
        &mut self,
        params: &FormalParameterList,
    ) -> Result<BlockStatement> {
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;

        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        self.context.allow_strict_directive = params.simple;

        let body = self.isolate_cover_grammar(|p| p.parse_function_source_elements())?;

        if self.context.strict {
            if let Some(first_restricted) = params.first_restricted.clone() {
                self.tolerate_unexpected_token(Some(&first_restricted), params.message)?;
            }
            if let Some(stricted) = params.stricted.clone() {
                self.tolerate_unexpected_token(Some(&stricted), params.message)?;
            }
        }

        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;

        Ok(body)
    }

    pub(crate) fn parse_property_method_function(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_yield = true;
        let params = self.parse_formal_parameters(None)?;
        let body = self.parse_property_method(&params)?;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id: None,
            params: params.params,
            body,
            generator: false,
            expression: false,
            is_async: false,
            span,
            loc,
        }))
    }

    pub(crate) fn parse_property_method_async_function(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_allow_yield = self.context.allow_yield;
        let previous_allow_await = self.context.allow_await;
        self.context.allow_yield = false;
        self.context.allow_await = true;
        let params = self.parse_formal_parameters(None)?;
        let body = self.parse_property_method(&params)?;
        self.context.allow_yield = previous_allow_yield;
        self.context.allow_await = previous_allow_await;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id: None,
            params: params.params,
            body,
            generator: false,
            expression: false,
            is_async: true,
            span,
            loc,
        }))
    }

    pub(crate) fn parse_getter_method(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_yield = true;
        let params = self.parse_formal_parameters(None)?;
        if !params.params.is_empty() {
            self.tolerate_parse_error(messages::BAD_GETTER_ARITY, &[])?;
        }
        let body = self.parse_property_method(&params)?;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id: None,
            params: params.params,
            body,
            generator: false,
            expression: false,
            is_async: false,
            span,
            loc,
        }))
    }

    pub(crate) fn parse_setter_method(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_yield = true;
        let params = self.parse_formal_parameters(None)?;
        if params.params.len() != 1 {
            self.tolerate_parse_error(messages::BAD_SETTER_ARITY, &[])?;
        } else if matches!(params.params[0], Pattern::Rest(_)) {
            self.tolerate_parse_error(messages::BAD_SETTER_REST_PARAMETER, &[])?;
        }
        let body = self.parse_property_method(&params)?;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id: None,
            params: params.params,
            body,
            generator: false,
            expression: false,
            is_async: false,
            span,
            loc,
        }))
    }

    pub(crate) fn parse_generator_method(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_yield = true;
        let params = self.parse_formal_parameters(None)?;
        self.context.allow_yield = false;
        let body = self.parse_property_method(&params)?;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id: None,
            params: params.params,
            body,
            generator: true,
            expression: false,
            is_async: false,
            span,
            loc,
        }))
    }

    // ========================================================================
    // FUNCTION DECLARATIONS AND EXPRESSIONS
    // ========================================================================

    pub(crate) fn parse_function_declaration(
        &mut self,
        identifier_is_optional: bool,
    ) -> Result<FunctionDeclaration> {
        let marker = self.create_marker();

        let is_async = self.match_contextual_keyword("async");
        if is_async {
            self.next_token()?;
        }

        self.expect_keyword("function")?;

        let is_generator = if is_async { false } else { self.match_punct("*") };
        if is_generator {
            self.next_token()?;
        }

        let mut message = None;
        let mut id = None;
        let mut first_restricted = None;

        if !identifier_is_optional || !self.match_punct("(") {
            let token = self.lookahead.clone();
            id = Some(self.parse_variable_identifier(None)?);
            if self.context.strict {
                if is_restricted_word(token.text()) {
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::STRICT_FUNCTION_NAME),
                    )?;
                }
            } else if is_restricted_word(token.text()) {
                first_restricted = Some(token);
                message = Some(messages::STRICT_FUNCTION_NAME);
            } else if is_strict_mode_reserved_word(token.text()) {
                first_restricted = Some(token);
                message = Some(messages::STRICT_RESERVED_WORD);
            }
        }

        let previous_allow_await = self.context.allow_await;
        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_await = is_async;
        self.context.allow_yield = !is_generator;

        let params = self.parse_formal_parameters(first_restricted)?;
        let first_restricted = params.first_restricted.clone();
        let message = params.message.or(message);

        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        self.context.allow_strict_directive = params.simple;

        let body = self.parse_function_source_elements()?;

        if self.context.strict {
            if let Some(first_restricted) = &first_restricted {
                let first_restricted = first_restricted.clone();
                return self.throw_unexpected_token(Some(&first_restricted), message);
            }
            if let Some(stricted) = params.stricted.clone() {
                self.tolerate_unexpected_token(Some(&stricted), message)?;
            }
        }

        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;
        self.context.allow_await = previous_allow_await;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionDeclaration");
        Ok(FunctionDeclaration {
            id,
            params: params.params,
            body,
            generator: is_generator,
            expression: false,
            is_async,
            span,
            loc,
        })
    }

    pub(crate) fn parse_function_expression(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let is_async = self.match_contextual_keyword("async");
        if is_async {
            self.next_token()?;
        }

        self.expect_keyword("function")?;

        let is_generator = if is_async { false } else { self.match_punct("*") };
        if is_generator {
            self.next_token()?;
        }

        let mut message = None;
        let mut id = None;
        let mut first_restricted = None;

        let previous_allow_await = self.context.allow_await;
        let previous_allow_yield = self.context.allow_yield;
        self.context.allow_await = is_async;
        self.context.allow_yield = !is_generator;

        if !self.match_punct("(") {
            let token = self.lookahead.clone();
            id = if !self.context.strict && !is_generator && self.match_keyword("yield") {
                match self.parse_identifier_name()? {
                    Expr::Identifier(identifier) => Some(identifier),
                    _ => None,
                }
            } else {
                Some(self.parse_variable_identifier(None)?)
            };
            if self.context.strict {
                if is_restricted_word(token.text()) {
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::STRICT_FUNCTION_NAME),
                    )?;
                }
            } else if is_restricted_word(token.text()) {
                first_restricted = Some(token);
                message = Some(messages::STRICT_FUNCTION_NAME);
            } else if is_strict_mode_reserved_word(token.text()) {
                first_restricted = Some(token);
                message = Some(messages::STRICT_RESERVED_WORD);
            }
        }

        let params = self.parse_formal_parameters(first_restricted)?;
        let first_restricted = params.first_restricted.clone();
        let message = params.message.or(message);

        let previous_strict = self.context.strict;
        let previous_allow_strict_directive = self.context.allow_strict_directive;
        self.context.allow_strict_directive = params.simple;

        let body = self.parse_function_source_elements()?;

        if self.context.strict {
            if let Some(first_restricted) = &first_restricted {
                let first_restricted = first_restricted.clone();
                return self.throw_unexpected_token(Some(&first_restricted), message);
            }
            if let Some(stricted) = params.stricted.clone() {
                self.tolerate_unexpected_token(Some(&stricted), message)?;
            }
        }

        self.context.strict = previous_strict;
        self.context.allow_strict_directive = previous_allow_strict_directive;
        self.context.allow_await = previous_allow_await;
        self.context.allow_yield = previous_allow_yield;

        let (span, loc) = self.finalize(marker, "FunctionExpression");
        Ok(Expr::Function(FunctionExpression {
            id,
            params: params.params,
            body,
            generator: is_generator,
            expression: false,
            is_async,
            span,
            loc,
        }))
    }

    // ========================================================================
    // CLASSES
    // ========================================================================

    fn parse_class_element(&mut self, has_constructor: &mut bool) -> Result<MethodDefinition> {
        let mut token = self.lookahead.clone();
        let marker = self.create_marker();

        let mut kind: Option<MethodKind> = None;
        let mut key: Option<Expr> = None;
        let mut value: Option<Expr> = None;
        let mut computed = false;
        let mut method = false;
        let mut is_static = false;
        let mut is_async = false;

        if self.match_punct("*") {
            self.next_token()?;
        } else {
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);

            let is_static_keyword = matches!(&key, Some(Expr::Identifier(id)) if id.name == "static");
            if is_static_keyword
                && (Self::qualified_property_name(&self.lookahead) || self.match_punct("*"))
            {
                token = self.lookahead.clone();
                is_static = true;
                computed = self.match_punct("[");
                if self.match_punct("*") {
                    self.next_token()?;
                } else {
                    key = Some(self.parse_object_property_key()?);
                }
            }

            if token.kind == TokenKind::Identifier
                && !self.has_line_terminator
                && token.text() == "async"
                && !self.match_punct(":")
                && !self.match_punct("(")
                && !self.match_punct("*")
            {
                is_async = true;
                token = self.lookahead.clone();
                computed = self.match_punct("[");
                key = Some(self.parse_object_property_key()?);
                if token.kind == TokenKind::Identifier && token.text() == "constructor" {
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::CONSTRUCTOR_IS_ASYNC),
                    )?;
                }
            }
        }

        let lookahead_property_key = Self::qualified_property_name(&self.lookahead);

        if token.kind == TokenKind::Identifier {
            if token.text() == "get" && lookahead_property_key {
                kind = Some(MethodKind::Get);
                computed = self.match_punct("[");
                key = Some(self.parse_object_property_key()?);
                self.context.allow_yield = false;
                value = Some(self.parse_getter_method()?);
            } else if token.text() == "set" && lookahead_property_key {
                kind = Some(MethodKind::Set);
                computed = self.match_punct("[");
                key = Some(self.parse_object_property_key()?);
                value = Some(self.parse_setter_method()?);
            }
        } else if token.kind == TokenKind::Punctuator
            && token.text() == "*"
            && lookahead_property_key
        {
            kind = Some(MethodKind::Method);
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);
            value = Some(self.parse_generator_method()?);
            method = true;
        }

        if kind.is_none() && key.is_some() && self.match_punct("(") {
            kind = Some(MethodKind::Method);
            value = Some(if is_async {
                self.parse_property_method_async_function()?
            } else {
                self.parse_property_method_function()?
            });
            method = true;
        }

        let mut kind = match kind {
            Some(kind) => kind,
            None => {
                let token = self.lookahead.clone();
                return self.throw_unexpected_token(Some(&token), None);
            }
        };

        if !computed {
            if let Some(key) = &key {
                if is_static && Self::is_property_key(key, "prototype") {
                    return self.throw_unexpected_token(
                        Some(&token),
                        Some(messages::STATIC_PROTOTYPE),
                    );
                }
                if !is_static && Self::is_property_key(key, "constructor") {
                    let is_plain_method = kind == MethodKind::Method && method;
                    let generator = matches!(&value, Some(Expr::Function(f)) if f.generator);
                    if !is_plain_method || generator {
                        return self.throw_unexpected_token(
                            Some(&token),
                            Some(messages::CONSTRUCTOR_SPECIAL_METHOD),
                        );
                    }
                    if *has_constructor {
                        return self.throw_unexpected_token(
                            Some(&token),
                            Some(messages::DUPLICATE_CONSTRUCTOR),
                        );
                    }
                    *has_constructor = true;
                    kind = MethodKind::Constructor;
                }
            }
        }

        let value = value.map(|v| match v {
            Expr::Function(function) => function,
            other => unreachable!("method values are function expressions: {:?}", other),
        });

        let (span, loc) = self.finalize(marker, "MethodDefinition");
        Ok(MethodDefinition {
            key,
            computed,
            value,
            kind,
            is_static,
            span,
            loc,
        })
    }

    fn parse_class_body(&mut self) -> Result<ClassBody> {
        let marker = self.create_marker();

        let mut body = Vec::new();
        let mut has_constructor = false;

        self.expect("{")?;
        while !self.match_punct("}") {
            if self.match_punct(";") {
                self.next_token()?;
            } else {
                body.push(self.parse_class_element(&mut has_constructor)?);
            }
        }
        self.expect("}")?;

        let (span, loc) = self.finalize(marker, "ClassBody");
        Ok(ClassBody { body, span, loc })
    }

    pub(crate) fn parse_class_declaration(
        &mut self,
        identifier_is_optional: bool,
    ) -> Result<ClassDeclaration> {
        let marker = self.create_marker();

        let previous_strict = self.context.strict;
        self.context.strict = true;
        self.expect_keyword("class")?;

        let id = if identifier_is_optional && self.lookahead.kind != TokenKind::Identifier {
            None
        } else {
            Some(self.parse_variable_identifier(None)?)
        };

        let mut super_class = None;
        if self.match_keyword("extends") {
            self.next_token()?;
            super_class = Some(Box::new(self.isolate_cover_grammar(|p| {
                p.parse_left_hand_side_expression_allow_call()
            })?));
        }

        let body = self.parse_class_body()?;
        self.context.strict = previous_strict;

        let (span, loc) = self.finalize(marker, "ClassDeclaration");
        Ok(ClassDeclaration {
            id,
            super_class,
            body,
            span,
            loc,
        })
    }

    pub(crate) fn parse_class_expression(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let previous_strict = self.context.strict;
        self.context.strict = true;
        self.expect_keyword("class")?;

        let id = if self.lookahead.kind == TokenKind::Identifier {
            Some(self.parse_variable_identifier(None)?)
        } else {
            None
        };

        let mut super_class = None;
        if self.match_keyword("extends") {
            self.next_token()?;
            super_class = Some(Box::new(self.isolate_cover_grammar(|p| {
                p.parse_left_hand_side_expression_allow_call()
            })?));
        }

        let body = self.parse_class_body()?;
        self.context.strict = previous_strict;

        let (span, loc) = self.finalize(marker, "ClassExpression");
        Ok(Expr::Class(ClassExpression {
            id,
            super_class,
            body,
            span,
            loc,
        }))
    }

    // ========================================================================
    // MODULES
    // ========================================================================

    fn parse_module_specifier(&mut self) -> Result<Literal> {
        let marker = self.create_marker();

        if self.lookahead.kind != TokenKind::StringLiteral {
            return self.throw_parse_error(messages::INVALID_MODULE_SPECIFIER, &[]);
        }

        let token = self.next_token()?;
        let raw = self.get_token_raw(&token);
        let value = token
            .string_value()
            .map(|s| LiteralValue::Str(s.to_string()))
            .unwrap_or(LiteralValue::Null);

        let (span, loc) = self.finalize(marker, "Literal");
        Ok(Literal {
            value,
            raw,
            regex: None,
            span,
            loc,
        })
    }

    fn expr_to_identifier(expr: Expr) -> Identifier {
        match expr {
            Expr::Identifier(identifier) => identifier,
            other => unreachable!("identifier name expected: {:?}", other),
        }
    }

    fn parse_import_specifier(&mut self) -> Result<ImportSpecifier> {
        let marker = self.create_marker();

        let imported;
        let local;
        if self.lookahead.kind == TokenKind::Identifier {
            imported = self.parse_variable_identifier(None)?;
            local = if self.match_contextual_keyword("as") {
                self.next_token()?;
                self.parse_variable_identifier(None)?
            } else {
                imported.clone()
            };
        } else {
            // An identifier name such as a keyword may be imported, but it
            // must then be renamed.
            imported = Self::expr_to_identifier(self.parse_identifier_name()?);
            if self.match_contextual_keyword("as") {
                self.next_token()?;
                local = self.parse_variable_identifier(None)?;
            } else {
                let token = self.next_token()?;
                return self.throw_unexpected_token(Some(&token), None);
            }
        }

        let (span, loc) = self.finalize(marker, "ImportSpecifier");
        Ok(ImportSpecifier {
            local,
            imported,
            span,
            loc,
        })
    }

    fn parse_named_imports(&mut self) -> Result<Vec<ImportDeclarationSpecifier>> {
        self.expect("{")?;
        let mut specifiers = Vec::new();
        while !self.match_punct("}") {
            specifiers.push(ImportDeclarationSpecifier::Named(
                self.parse_import_specifier()?,
            ));
            if !self.match_punct("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;
        Ok(specifiers)
    }

    fn parse_import_default_specifier(&mut self) -> Result<ImportDeclarationSpecifier> {
        let marker = self.create_marker();
        let local = Self::expr_to_identifier(self.parse_identifier_name()?);
        let (span, loc) = self.finalize(marker, "ImportDefaultSpecifier");
        Ok(ImportDeclarationSpecifier::Default(ImportDefaultSpecifier {
            local,
            span,
            loc,
        }))
    }

    fn parse_import_namespace_specifier(&mut self) -> Result<ImportDeclarationSpecifier> {
        let marker = self.create_marker();

        self.expect("*")?;
        if !self.match_contextual_keyword("as") {
            return self.throw_parse_error(messages::NO_AS_AFTER_IMPORT_NAMESPACE, &[]);
        }
        self.next_token()?;
        let local = Self::expr_to_identifier(self.parse_identifier_name()?);

        let (span, loc) = self.finalize(marker, "ImportNamespaceSpecifier");
        Ok(ImportDeclarationSpecifier::Namespace(
            ImportNamespaceSpecifier { local, span, loc },
        ))
    }

    pub(crate) fn parse_import_declaration(&mut self) -> Result<Stmt> {
        if self.context.in_function_body {
            return self.throw_parse_error(messages::ILLEGAL_IMPORT_DECLARATION, &[]);
        }

        let marker = self.create_marker();
        self.expect_keyword("import")?;

        let mut specifiers = Vec::new();
        let source;
        if self.lookahead.kind == TokenKind::StringLiteral {
            // import 'side-effects';
            source = self.parse_module_specifier()?;
        } else {
            if self.match_punct("{") {
                specifiers.extend(self.parse_named_imports()?);
            } else if self.match_punct("*") {
                specifiers.push(self.parse_import_namespace_specifier()?);
            } else if self.lookahead.kind == TokenKind::Identifier
                || (matches!(
                    self.lookahead.kind,
                    TokenKind::Keyword | TokenKind::BooleanLiteral | TokenKind::NullLiteral
                ) && !self.match_keyword("default"))
            {
                specifiers.push(self.parse_import_default_specifier()?);
                if self.match_punct(",") {
                    self.next_token()?;
                    if self.match_punct("*") {
                        specifiers.push(self.parse_import_namespace_specifier()?);
                    } else if self.match_punct("{") {
                        specifiers.extend(self.parse_named_imports()?);
                    } else {
                        let token = self.lookahead.clone();
                        return self.throw_unexpected_token(Some(&token), None);
                    }
                }
            } else {
                let token = self.next_token()?;
                return self.throw_unexpected_token(Some(&token), None);
            }

            if !self.match_contextual_keyword("from") {
                let message = if self.lookahead.text().is_empty() {
                    messages::MISSING_FROM_CLAUSE
                } else {
                    messages::UNEXPECTED_TOKEN
                };
                let value = self.lookahead.text().to_string();
                return self.throw_parse_error(message, &[&value]);
            }
            self.next_token()?;
            source = self.parse_module_specifier()?;
        }
        self.consume_semicolon()?;

        let (span, loc) = self.finalize(marker, "ImportDeclaration");
        Ok(Stmt::Import(ImportDeclaration {
            specifiers,
            source,
            span,
            loc,
        }))
    }

    fn parse_export_specifier(&mut self) -> Result<ExportSpecifier> {
        let marker = self.create_marker();

        let local = Self::expr_to_identifier(self.parse_identifier_name()?);
        let exported = if self.match_contextual_keyword("as") {
            self.next_token()?;
            Self::expr_to_identifier(self.parse_identifier_name()?)
        } else {
            local.clone()
        };

        let (span, loc) = self.finalize(marker, "ExportSpecifier");
        Ok(ExportSpecifier {
            local,
            exported,
            span,
            loc,
        })
    }

    /// Registers an exported name; a repeat is an error, reported in
    /// source order.
    fn declare_export(&mut self, name: &str) -> Result<()> {
        if !self.export_names.insert(name.to_string()) {
            self.tolerate_parse_error(messages::DUPLICATE_EXPORT, &[name])?;
        }
        Ok(())
    }

    fn collect_bound_names(pattern: &Pattern, names: &mut Vec<String>) {
        match pattern {
            Pattern::Identifier(identifier) => names.push(identifier.name.clone()),
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    Self::collect_bound_names(element, names);
                }
            }
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => {
                            if let Some(PropertyValue::Pattern(value)) = &p.value {
                                Self::collect_bound_names(value, names);
                            }
                        }
                        ObjectPatternProperty::Rest(rest) => {
                            Self::collect_bound_names(&rest.argument, names);
                        }
                    }
                }
            }
            Pattern::Assignment(assignment) => {
                Self::collect_bound_names(&assignment.left, names)
            }
            Pattern::Rest(rest) => Self::collect_bound_names(&rest.argument, names),
            Pattern::Expr(_) => {}
        }
    }

    fn declare_statement_exports(&mut self, statement: &Stmt) -> Result<()> {
        let mut names = Vec::new();
        match statement {
            Stmt::Function(declaration) => {
                if let Some(id) = &declaration.id {
                    names.push(id.name.clone());
                }
            }
            Stmt::Class(declaration) => {
                if let Some(id) = &declaration.id {
                    names.push(id.name.clone());
                }
            }
            Stmt::Variable(declaration) => {
                for declarator in &declaration.declarations {
                    Self::collect_bound_names(&declarator.id, &mut names);
                }
            }
            _ => {}
        }
        for name in names {
            self.declare_export(&name)?;
        }
        Ok(())
    }

    pub(crate) fn parse_export_declaration(&mut self) -> Result<Stmt> {
        if self.context.in_function_body {
            return self.throw_parse_error(messages::ILLEGAL_EXPORT_DECLARATION, &[]);
        }

        let marker = self.create_marker();
        self.expect_keyword("export")?;

        if self.match_keyword("default") {
            self.next_token()?;
            self.declare_export("default")?;

            let declaration = if self.match_keyword("function") {
                ExportDefault::Function(self.parse_function_declaration(true)?)
            } else if self.match_keyword("class") {
                ExportDefault::Class(self.parse_class_declaration(true)?)
            } else if self.match_contextual_keyword("async") {
                if self.match_async_function() {
                    ExportDefault::Function(self.parse_function_declaration(true)?)
                } else {
                    let expr = self.parse_assignment_expression()?;
                    self.consume_semicolon()?;
                    ExportDefault::Expr(Box::new(expr))
                }
            } else {
                if self.match_contextual_keyword("from") {
                    let value = self.lookahead.text().to_string();
                    return self.throw_parse_error(messages::UNEXPECTED_TOKEN, &[&value]);
                }
                let expr = if self.match_punct("{") {
                    self.inherit_cover_grammar(|p| p.parse_primary_expression())?
                } else if self.match_punct("[") {
                    self.inherit_cover_grammar(|p| p.parse_primary_expression())?
                } else {
                    self.parse_assignment_expression()?
                };
                self.consume_semicolon()?;
                ExportDefault::Expr(Box::new(expr))
            };

            let (span, loc) = self.finalize(marker, "ExportDefaultDeclaration");
            return Ok(Stmt::ExportDefault(ExportDefaultDeclaration {
                declaration,
                span,
                loc,
            }));
        }

        if self.match_punct("*") {
            self.next_token()?;
            if !self.match_contextual_keyword("from") {
                let message = if self.lookahead.text().is_empty() {
                    messages::MISSING_FROM_CLAUSE
                } else {
                    messages::UNEXPECTED_TOKEN
                };
                let value = self.lookahead.text().to_string();
                return self.throw_parse_error(message, &[&value]);
            }
            self.next_token()?;
            let source = self.parse_module_specifier()?;
            self.consume_semicolon()?;

            let (span, loc) = self.finalize(marker, "ExportAllDeclaration");
            return Ok(Stmt::ExportAll(ExportAllDeclaration { source, span, loc }));
        }

        if self.lookahead.kind == TokenKind::Keyword {
            let declaration = match self.lookahead.text() {
                "let" | "const" => {
                    self.parse_lexical_declaration(DeclarationOptions { in_for: false })?
                }
                "var" | "class" | "function" => self.parse_statement_list_item()?,
                _ => {
                    let token = self.lookahead.clone();
                    return self.throw_unexpected_token(Some(&token), None);
                }
            };
            self.declare_statement_exports(&declaration)?;

            let (span, loc) = self.finalize(marker, "ExportNamedDeclaration");
            return Ok(Stmt::ExportNamed(ExportNamedDeclaration {
                declaration: Some(Box::new(declaration)),
                specifiers: Vec::new(),
                source: None,
                span,
                loc,
            }));
        }

        if self.match_async_function() {
            let declaration = Stmt::Function(self.parse_function_declaration(false)?);
            self.declare_statement_exports(&declaration)?;

            let (span, loc) = self.finalize(marker, "ExportNamedDeclaration");
            return Ok(Stmt::ExportNamed(ExportNamedDeclaration {
                declaration: Some(Box::new(declaration)),
                specifiers: Vec::new(),
                source: None,
                span,
                loc,
            }));
        }

        let mut specifiers = Vec::new();
        let mut source = None;
        let mut is_export_from_identifier = false;

        self.expect("{")?;
        while !self.match_punct("}") {
            is_export_from_identifier =
                is_export_from_identifier || self.match_keyword("default");
            specifiers.push(self.parse_export_specifier()?);
            if !self.match_punct("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;

        if self.match_contextual_keyword("from") {
            self.next_token()?;
            source = Some(self.parse_module_specifier()?);
            self.consume_semicolon()?;
        } else if is_export_from_identifier {
            let message = if self.lookahead.text().is_empty() {
                messages::MISSING_FROM_CLAUSE
            } else {
                messages::UNEXPECTED_TOKEN
            };
            let value = self.lookahead.text().to_string();
            return self.throw_parse_error(message, &[&value]);
        } else {
            self.consume_semicolon()?;
        }

        let exported: Vec<String> = specifiers
            .iter()
            .map(|s| s.exported.name.clone())
            .collect();
        for name in exported {
            self.declare_export(&name)?;
        }

        let (span, loc) = self.finalize(marker, "ExportNamedDeclaration");
        Ok(Stmt::ExportNamed(ExportNamedDeclaration {
            declaration: None,
            specifiers,
            source,
            span,
            loc,
        }))
    }
}

/// Exported names in declaration order, so duplicate-export errors always
/// point at the second occurrence.
pub(crate) type ExportNameSet = IndexSet<String>;
