//! Expression parsing.
//!
//! Productions run from primaries up through sequence expressions. The
//! parenthesised forms are parsed as covers: a group is read as an ordinary
//! expression (or an arrow-parameter placeholder) and only the token after
//! the closing parenthesis decides which it was. Binary operators use a
//! precedence-driven shift/reduce loop over an explicit stack.

use esparse_lex::{is_restricted_word, Token, TokenKind, TokenValue};
use esparse_util::{messages, Result};

use crate::ast::*;
use crate::decl::FormalParameterList;
use crate::{Marker, Parser};

/// Data recovered from an arrow-parameter cover at `=>` commit time.
pub(crate) struct CoverFormalsList {
    pub simple: bool,
    pub params: Vec<Pattern>,
    pub stricted: Option<Token>,
    pub first_restricted: Option<Token>,
    pub message: Option<&'static str>,
}

impl<'a> Parser<'a> {
    // ========================================================================
    // PRIMARY EXPRESSIONS
    // ========================================================================

    pub(crate) fn parse_primary_expression(&mut self) -> Result<Expr> {
        if self.config.jsx && self.match_punct("<") {
            return self.parse_jsx_root();
        }

        let marker = self.create_marker();

        match self.lookahead.kind {
            TokenKind::Identifier => {
                if (self.context.is_module || self.context.allow_await)
                    && self.lookahead.text() == "await"
                {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(Some(&token), None)?;
                }
                if self.match_async_function() {
                    self.parse_function_expression()
                } else {
                    let token = self.next_token()?;
                    let name = token.text().to_string();
                    let (span, loc) = self.finalize(marker, "Identifier");
                    Ok(Expr::Identifier(Identifier { name, span, loc }))
                }
            }

            TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                if self.context.strict && self.lookahead.octal() {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::STRICT_OCTAL_LITERAL),
                    )?;
                }
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let token = self.next_token()?;
                let raw = self.get_token_raw(&token);
                let value = match &token.value {
                    TokenValue::Number { value, .. } => LiteralValue::Number(*value),
                    TokenValue::Str { value, .. } => LiteralValue::Str(value.clone()),
                    _ => return self.throw_unexpected_token(Some(&token), None),
                };
                let (span, loc) = self.finalize(marker, "Literal");
                Ok(Expr::Literal(Literal {
                    value,
                    raw,
                    regex: None,
                    span,
                    loc,
                }))
            }

            TokenKind::BooleanLiteral => {
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let token = self.next_token()?;
                let raw = self.get_token_raw(&token);
                let value = LiteralValue::Boolean(token.text() == "true");
                let (span, loc) = self.finalize(marker, "Literal");
                Ok(Expr::Literal(Literal {
                    value,
                    raw,
                    regex: None,
                    span,
                    loc,
                }))
            }

            TokenKind::NullLiteral => {
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let token = self.next_token()?;
                let raw = self.get_token_raw(&token);
                let (span, loc) = self.finalize(marker, "Literal");
                Ok(Expr::Literal(Literal {
                    value: LiteralValue::Null,
                    raw,
                    regex: None,
                    span,
                    loc,
                }))
            }

            TokenKind::Template => self.parse_template_literal(false),

            TokenKind::Punctuator => match self.lookahead.text() {
                "(" => {
                    self.context.is_binding_element = false;
                    self.inherit_cover_grammar(|p| p.parse_group_expression())
                }
                "[" => self.inherit_cover_grammar(|p| p.parse_array_initializer()),
                "{" => self.inherit_cover_grammar(|p| p.parse_object_initializer()),
                "/" | "/=" => {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    self.scanner.reset_index(self.start_marker.index);
                    let token = self.next_regex_token()?;
                    let raw = self.get_token_raw(&token);
                    let regex = match &token.value {
                        TokenValue::Regex { pattern, flags } => RegexData {
                            pattern: pattern.clone(),
                            flags: flags.clone(),
                        },
                        _ => return self.throw_unexpected_token(Some(&token), None),
                    };
                    let (span, loc) = self.finalize(marker, "Literal");
                    Ok(Expr::Literal(Literal {
                        value: LiteralValue::Regex,
                        raw,
                        regex: Some(regex),
                        span,
                        loc,
                    }))
                }
                _ => {
                    let token = self.next_token()?;
                    self.throw_unexpected_token(Some(&token), None)
                }
            },

            TokenKind::Keyword => {
                if !self.context.strict && self.context.allow_yield && self.match_keyword("yield") {
                    self.parse_identifier_name()
                } else if !self.context.strict && self.match_keyword("let") {
                    self.parse_identifier_name()
                } else {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    if self.match_keyword("function") {
                        self.parse_function_expression()
                    } else if self.match_keyword("this") {
                        self.next_token()?;
                        let (span, loc) = self.finalize(marker, "ThisExpression");
                        Ok(Expr::This(ThisExpression { span, loc }))
                    } else if self.match_keyword("class") {
                        self.parse_class_expression()
                    } else {
                        let token = self.next_token()?;
                        self.throw_unexpected_token(Some(&token), None)
                    }
                }
            }

            _ => {
                let token = self.next_token()?;
                self.throw_unexpected_token(Some(&token), None)
            }
        }
    }

    // ========================================================================
    // ARRAY AND OBJECT INITIALIZERS
    // ========================================================================

    pub(crate) fn parse_spread_element(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        self.expect("...")?;
        let argument = self.inherit_cover_grammar(|p| p.parse_assignment_expression())?;
        let (span, loc) = self.finalize(marker, "SpreadElement");
        Ok(Expr::Spread(SpreadElement {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    fn parse_array_initializer(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        let mut elements: Vec<Option<Expr>> = Vec::new();

        self.expect("[")?;
        while !self.match_punct("]") {
            if self.match_punct(",") {
                self.next_token()?;
                elements.push(None);
            } else if self.match_punct("...") {
                let element = self.parse_spread_element()?;
                if !self.match_punct("]") {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    self.expect(",")?;
                }
                elements.push(Some(element));
            } else {
                elements.push(Some(
                    self.inherit_cover_grammar(|p| p.parse_assignment_expression())?,
                ));
                if !self.match_punct("]") {
                    self.expect(",")?;
                }
            }
        }
        self.expect("]")?;

        let (span, loc) = self.finalize(marker, "ArrayExpression");
        Ok(Expr::Array(ArrayExpression {
            elements,
            span,
            loc,
        }))
    }

    /// Parses a property key: a literal, an identifier name, or `[expr]`.
    pub(crate) fn parse_object_property_key(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        let token = self.next_token()?;

        match token.kind {
            TokenKind::StringLiteral | TokenKind::NumericLiteral => {
                if self.context.strict && token.octal() {
                    self.tolerate_unexpected_token(
                        Some(&token),
                        Some(messages::STRICT_OCTAL_LITERAL),
                    )?;
                }
                let raw = self.get_token_raw(&token);
                let value = match &token.value {
                    TokenValue::Number { value, .. } => LiteralValue::Number(*value),
                    TokenValue::Str { value, .. } => LiteralValue::Str(value.clone()),
                    _ => return self.throw_unexpected_token(Some(&token), None),
                };
                let (span, loc) = self.finalize(marker, "Literal");
                Ok(Expr::Literal(Literal {
                    value,
                    raw,
                    regex: None,
                    span,
                    loc,
                }))
            }

            TokenKind::Identifier
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::Keyword => {
                let name = token.text().to_string();
                let (span, loc) = self.finalize(marker, "Identifier");
                Ok(Expr::Identifier(Identifier { name, span, loc }))
            }

            TokenKind::Punctuator if token.text() == "[" => {
                let key = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;
                self.expect("]")?;
                Ok(key)
            }

            _ => self.throw_unexpected_token(Some(&token), None),
        }
    }

    /// True if a token can be a (non-computed) property key.
    pub(crate) fn qualified_property_name(token: &Token) -> bool {
        match token.kind {
            TokenKind::Identifier
            | TokenKind::StringLiteral
            | TokenKind::BooleanLiteral
            | TokenKind::NullLiteral
            | TokenKind::NumericLiteral
            | TokenKind::Keyword => true,
            TokenKind::Punctuator => token.text() == "[",
            _ => false,
        }
    }

    pub(crate) fn is_property_key(key: &Expr, value: &str) -> bool {
        match key {
            Expr::Identifier(identifier) => identifier.name == value,
            Expr::Literal(literal) => {
                matches!(&literal.value, LiteralValue::Str(s) if s == value)
            }
            _ => false,
        }
    }

    fn parse_object_property(&mut self, has_proto: &mut bool) -> Result<ObjectExpressionProperty> {
        let marker = self.create_marker();
        let token = self.lookahead.clone();

        let mut kind = PropertyKind::Init;
        let mut key: Option<Expr> = None;
        let mut value: Option<PropertyValue> = None;
        let mut computed = false;
        let mut method = false;
        let mut shorthand = false;
        let mut is_async = false;

        if token.kind == TokenKind::Identifier {
            let id = token.text().to_string();
            self.next_token()?;
            computed = self.match_punct("[");
            is_async = !self.has_line_terminator
                && id == "async"
                && !self.match_punct(":")
                && !self.match_punct("(")
                && !self.match_punct("*")
                && !self.match_punct(",");
            key = if is_async {
                computed = self.match_punct("[");
                Some(self.parse_object_property_key()?)
            } else {
                let (span, loc) = self.finalize(marker, "Identifier");
                Some(Expr::Identifier(Identifier {
                    name: id,
                    span,
                    loc,
                }))
            };
        } else if self.match_punct("*") {
            self.next_token()?;
        } else {
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);
        }

        let lookahead_property_key = Self::qualified_property_name(&self.lookahead);

        if token.kind == TokenKind::Identifier
            && !is_async
            && token.text() == "get"
            && lookahead_property_key
        {
            kind = PropertyKind::Get;
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);
            self.context.allow_yield = false;
            value = Some(PropertyValue::Expr(Box::new(self.parse_getter_method()?)));
        } else if token.kind == TokenKind::Identifier
            && !is_async
            && token.text() == "set"
            && lookahead_property_key
        {
            kind = PropertyKind::Set;
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);
            value = Some(PropertyValue::Expr(Box::new(self.parse_setter_method()?)));
        } else if token.kind == TokenKind::Punctuator
            && token.text() == "*"
            && lookahead_property_key
        {
            kind = PropertyKind::Init;
            computed = self.match_punct("[");
            key = Some(self.parse_object_property_key()?);
            value = Some(PropertyValue::Expr(Box::new(self.parse_generator_method()?)));
            method = true;
        } else {
            let key = match key {
                Some(key) => key,
                None => {
                    let token = self.lookahead.clone();
                    return self.throw_unexpected_token(Some(&token), None);
                }
            };

            if self.match_punct(":") && !is_async {
                if !computed && Self::is_property_key(&key, "__proto__") {
                    if *has_proto {
                        self.tolerate_parse_error(messages::DUPLICATE_PROTO_PROPERTY, &[])?;
                    }
                    *has_proto = true;
                }
                self.next_token()?;
                let expr = self.inherit_cover_grammar(|p| p.parse_assignment_expression())?;
                value = Some(PropertyValue::Expr(Box::new(expr)));
            } else if self.match_punct("(") {
                let function = if is_async {
                    self.parse_property_method_async_function()?
                } else {
                    self.parse_property_method_function()?
                };
                value = Some(PropertyValue::Expr(Box::new(function)));
                method = true;
            } else if token.kind == TokenKind::Identifier {
                let (span, loc) = self.finalize(marker, "Identifier");
                let id = Identifier {
                    name: token.text().to_string(),
                    span,
                    loc,
                };
                if self.match_punct("=") {
                    self.context.first_cover_initialized_name_error =
                        Some(self.lookahead.clone());
                    self.next_token()?;
                    shorthand = true;
                    let init = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;
                    let (span, loc) = self.finalize(marker, "AssignmentPattern");
                    value = Some(PropertyValue::Pattern(Box::new(Pattern::Assignment(
                        AssignmentPattern {
                            left: Box::new(Pattern::Identifier(id)),
                            right: Box::new(init),
                            span,
                            loc,
                        },
                    ))));
                } else {
                    shorthand = true;
                    value = Some(PropertyValue::Expr(Box::new(Expr::Identifier(id))));
                }
            } else {
                let token = self.next_token()?;
                return self.throw_unexpected_token(Some(&token), None);
            }

            let (span, loc) = self.finalize(marker, "Property");
            return Ok(ObjectExpressionProperty::Property(Property {
                key,
                computed,
                value,
                kind,
                method,
                shorthand,
                span,
                loc,
            }));
        }

        let key = match key {
            Some(key) => key,
            None => {
                let token = self.lookahead.clone();
                return self.throw_unexpected_token(Some(&token), None);
            }
        };
        let (span, loc) = self.finalize(marker, "Property");
        Ok(ObjectExpressionProperty::Property(Property {
            key,
            computed,
            value,
            kind,
            method,
            shorthand,
            span,
            loc,
        }))
    }

    fn parse_object_initializer(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        self.expect("{")?;
        let mut properties = Vec::new();
        let mut has_proto = false;
        while !self.match_punct("}") {
            let property = if self.match_punct("...") {
                match self.parse_spread_element()? {
                    Expr::Spread(spread) => ObjectExpressionProperty::Spread(spread),
                    _ => unreachable!("spread element parser returns spreads"),
                }
            } else {
                self.parse_object_property(&mut has_proto)?
            };
            properties.push(property);
            if !self.match_punct("}") {
                self.expect_comma_separator()?;
            }
        }
        self.expect("}")?;

        let (span, loc) = self.finalize(marker, "ObjectExpression");
        Ok(Expr::Object(ObjectExpression {
            properties,
            span,
            loc,
        }))
    }

    // ========================================================================
    // TEMPLATE LITERALS
    // ========================================================================

    fn parse_template_piece(&mut self, is_tagged: bool, head: bool) -> Result<TemplateElement> {
        if self.lookahead.kind != TokenKind::Template {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }
        if head && !self.lookahead.template_head() {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }

        let marker = self.create_marker();
        let token = self.next_token()?;
        let (cooked, raw, tail) = match &token.value {
            TokenValue::Template {
                cooked, raw, tail, ..
            } => (cooked.clone(), raw.clone(), *tail),
            _ => return self.throw_unexpected_token(Some(&token), None),
        };

        // A piece whose escapes do not decode is only legal after a tag.
        if !is_tagged && cooked.is_none() {
            return self.throw_unexpected_token(Some(&token), Some(messages::UNEXPECTED_TOKEN_ILLEGAL));
        }

        let (span, loc) = self.finalize(marker, "TemplateElement");
        Ok(TemplateElement {
            cooked,
            raw,
            tail,
            span,
            loc,
        })
    }

    pub(crate) fn parse_template_literal(&mut self, is_tagged: bool) -> Result<Expr> {
        let marker = self.create_marker();

        let mut expressions = Vec::new();
        let mut quasis = Vec::new();

        let mut quasi = self.parse_template_piece(is_tagged, true)?;
        let mut tail = quasi.tail;
        quasis.push(quasi);
        while !tail {
            expressions.push(self.parse_expression()?);
            quasi = self.parse_template_piece(is_tagged, false)?;
            tail = quasi.tail;
            quasis.push(quasi);
        }

        let (span, loc) = self.finalize(marker, "TemplateLiteral");
        Ok(Expr::Template(TemplateLiteral {
            quasis,
            expressions,
            span,
            loc,
        }))
    }

    // ========================================================================
    // GROUP EXPRESSIONS AND THE ARROW COVER
    // ========================================================================

    fn arrow_placeholder(
        &mut self,
        marker: Marker,
        params: Vec<CoverFormal>,
        is_async: bool,
    ) -> Expr {
        let (span, loc) = self.finalize(marker, "ArrowParameterPlaceholder");
        Expr::ArrowPlaceholder(ArrowParameterPlaceholder {
            params,
            is_async,
            span,
            loc,
        })
    }

    /// Parses `...pattern` inside a parenthesised cover or a formal
    /// parameter list; a default or a trailing parameter after it is an
    /// error.
    pub(crate) fn parse_rest_element(&mut self, params: &mut Vec<Token>) -> Result<Pattern> {
        let marker = self.create_marker();
        self.expect("...")?;
        let argument = self.parse_pattern(params, None)?;

        if self.match_punct("=") {
            return self.throw_parse_error(messages::DEFAULT_REST_PARAMETER, &[]);
        }
        if !self.match_punct(")") {
            return self.throw_parse_error(messages::PARAMETER_AFTER_REST_PARAMETER, &[]);
        }

        let (span, loc) = self.finalize(marker, "RestElement");
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    fn parse_group_expression(&mut self) -> Result<Expr> {
        let group_marker = self.create_marker();
        self.expect("(")?;

        if self.match_punct(")") {
            self.next_token()?;
            if !self.match_punct("=>") {
                self.expect("=>")?;
            }
            return Ok(self.arrow_placeholder(group_marker, Vec::new(), false));
        }

        let start_token = self.lookahead.clone();
        let start_marker = self.marker_of(&start_token);

        if self.match_punct("...") {
            let mut params = Vec::new();
            let rest = self.parse_rest_element(&mut params)?;
            self.expect(")")?;
            if !self.match_punct("=>") {
                self.expect("=>")?;
            }
            return Ok(self.arrow_placeholder(
                group_marker,
                vec![CoverFormal::Pattern(rest)],
                false,
            ));
        }

        let mut arrow = false;
        self.context.is_binding_element = true;
        let mut expr = self.inherit_cover_grammar(|p| p.parse_assignment_expression())?;

        if self.match_punct(",") {
            let mut expressions: Vec<CoverFormal> = Vec::new();
            let mut plain: Vec<Expr> = Vec::new();

            self.context.is_assignment_target = false;
            plain.push(expr.clone());
            expressions.push(CoverFormal::Expr(expr.clone()));

            while self.lookahead.kind != TokenKind::Eof {
                if !self.match_punct(",") {
                    break;
                }
                self.next_token()?;

                if self.match_punct(")") {
                    // Trailing comma closes the list; only an arrow head
                    // can look like this.
                    self.next_token()?;
                    arrow = true;
                    expr = self.arrow_placeholder(group_marker, expressions, false);
                    break;
                } else if self.match_punct("...") {
                    if !self.context.is_binding_element {
                        let token = self.lookahead.clone();
                        return self.throw_unexpected_token(Some(&token), None);
                    }
                    let mut params = Vec::new();
                    let rest = self.parse_rest_element(&mut params)?;
                    self.expect(")")?;
                    if !self.match_punct("=>") {
                        self.expect("=>")?;
                    }
                    self.context.is_binding_element = false;
                    expressions.push(CoverFormal::Pattern(rest));
                    arrow = true;
                    expr = self.arrow_placeholder(group_marker, expressions, false);
                    break;
                } else {
                    let next = self.inherit_cover_grammar(|p| p.parse_assignment_expression())?;
                    plain.push(next.clone());
                    expressions.push(CoverFormal::Expr(next));
                }
            }

            if !arrow {
                let marker = start_marker;
                let (span, loc) = self.finalize(marker, "SequenceExpression");
                expr = Expr::Sequence(SequenceExpression {
                    expressions: plain,
                    span,
                    loc,
                });
            }
        }

        if !arrow {
            self.expect(")")?;
            if self.match_punct("=>") {
                if matches!(&expr, Expr::Identifier(id) if id.name == "yield") {
                    arrow = true;
                    expr = self.arrow_placeholder(
                        group_marker,
                        vec![CoverFormal::Expr(expr)],
                        false,
                    );
                }
                if !arrow {
                    if !self.context.is_binding_element {
                        let token = self.lookahead.clone();
                        return self.throw_unexpected_token(Some(&token), None);
                    }
                    let params = match expr {
                        Expr::Sequence(sequence) => sequence
                            .expressions
                            .into_iter()
                            .map(CoverFormal::Expr)
                            .collect(),
                        other => vec![CoverFormal::Expr(other)],
                    };
                    expr = self.arrow_placeholder(group_marker, params, false);
                }
            }
            self.context.is_binding_element = false;
        }

        Ok(expr)
    }

    // ========================================================================
    // CALLS, MEMBERS, AND NEW
    // ========================================================================

    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        self.expect("(")?;
        let mut args = Vec::new();
        if !self.match_punct(")") {
            loop {
                let expr = if self.match_punct("...") {
                    self.parse_spread_element()?
                } else {
                    self.isolate_cover_grammar(|p| p.parse_assignment_expression())?
                };
                args.push(expr);
                if self.match_punct(")") {
                    break;
                }
                self.expect_comma_separator()?;
                if self.match_punct(")") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(args)
    }

    fn is_identifier_name(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::BooleanLiteral
                | TokenKind::NullLiteral
        )
    }

    pub(crate) fn parse_identifier_name(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        let token = self.next_token()?;
        if !Self::is_identifier_name(&token) {
            return self.throw_unexpected_token(Some(&token), None);
        }
        let name = token.text().to_string();
        let (span, loc) = self.finalize(marker, "Identifier");
        Ok(Expr::Identifier(Identifier { name, span, loc }))
    }

    fn parse_new_expression(&mut self) -> Result<Expr> {
        let marker = self.create_marker();

        let id = self.parse_identifier_name()?;
        debug_assert!(matches!(&id, Expr::Identifier(i) if i.name == "new"));

        if self.match_punct(".") {
            self.next_token()?;
            if self.lookahead.kind == TokenKind::Identifier
                && self.context.in_function_body
                && self.lookahead.text() == "target"
            {
                let property = match self.parse_identifier_name()? {
                    Expr::Identifier(identifier) => identifier,
                    _ => unreachable!("identifier name parser returns identifiers"),
                };
                let meta = match id {
                    Expr::Identifier(identifier) => identifier,
                    _ => unreachable!(),
                };
                let (span, loc) = self.finalize(marker, "MetaProperty");
                return Ok(Expr::MetaProperty(MetaProperty {
                    meta,
                    property,
                    span,
                    loc,
                }));
            }
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }

        if self.match_keyword("import") {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }

        let callee = self.isolate_cover_grammar(|p| p.parse_left_hand_side_expression())?;
        let arguments = if self.match_punct("(") {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        self.context.is_assignment_target = false;
        self.context.is_binding_element = false;

        let (span, loc) = self.finalize(marker, "NewExpression");
        Ok(Expr::New(NewExpression {
            callee: Box::new(callee),
            arguments,
            span,
            loc,
        }))
    }

    fn parse_async_argument(&mut self) -> Result<Expr> {
        let argument = self.parse_assignment_expression()?;
        self.context.first_cover_initialized_name_error = None;
        Ok(argument)
    }

    fn parse_async_arguments(&mut self) -> Result<Vec<Expr>> {
        self.expect("(")?;
        let mut args = Vec::new();
        if !self.match_punct(")") {
            loop {
                let expr = if self.match_punct("...") {
                    self.parse_spread_element()?
                } else {
                    self.isolate_cover_grammar(|p| p.parse_async_argument())?
                };
                args.push(expr);
                if self.match_punct(")") {
                    break;
                }
                self.expect_comma_separator()?;
                if self.match_punct(")") {
                    break;
                }
            }
        }
        self.expect(")")?;
        Ok(args)
    }

    pub(crate) fn parse_left_hand_side_expression_allow_call(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();
        let start_marker = self.marker_of(&start_token);
        let maybe_async = self.match_contextual_keyword("async");

        let previous_allow_in = self.context.allow_in;
        self.context.allow_in = true;

        let mut expr = if self.match_keyword("super") && self.context.in_function_body {
            let marker = self.create_marker();
            self.next_token()?;
            let (span, loc) = self.finalize(marker, "Super");
            let expr = Expr::Super(Super { span, loc });
            if !self.match_punct("(") && !self.match_punct(".") && !self.match_punct("[") {
                let token = self.lookahead.clone();
                return self.throw_unexpected_token(Some(&token), None);
            }
            expr
        } else if self.match_keyword("new") {
            self.inherit_cover_grammar(|p| p.parse_new_expression())?
        } else {
            self.inherit_cover_grammar(|p| p.parse_primary_expression())?
        };

        loop {
            if self.match_punct(".") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.expect(".")?;
                let property = self.parse_identifier_name()?;
                let (span, loc) = self.finalize(start_marker, "MemberExpression");
                expr = Expr::Member(MemberExpression {
                    computed: false,
                    object: Box::new(expr),
                    property: Box::new(property),
                    span,
                    loc,
                });
            } else if self.match_punct("(") {
                let async_arrow =
                    maybe_async && start_token.line_number == self.lookahead.line_number;
                self.context.is_binding_element = false;
                self.context.is_assignment_target = false;
                let arguments = if async_arrow {
                    self.parse_async_arguments()?
                } else {
                    self.parse_arguments()?
                };
                if async_arrow && self.match_punct("=>") {
                    let params = arguments.into_iter().map(CoverFormal::Expr).collect();
                    expr = self.arrow_placeholder(start_marker, params, true);
                } else {
                    let (span, loc) = self.finalize(start_marker, "CallExpression");
                    expr = Expr::Call(CallExpression {
                        callee: Box::new(expr),
                        arguments,
                        span,
                        loc,
                    });
                }
            } else if self.match_punct("[") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.expect("[")?;
                let property = self.isolate_cover_grammar(|p| p.parse_expression())?;
                self.expect("]")?;
                let (span, loc) = self.finalize(start_marker, "MemberExpression");
                expr = Expr::Member(MemberExpression {
                    computed: true,
                    object: Box::new(expr),
                    property: Box::new(property),
                    span,
                    loc,
                });
            } else if self.lookahead.kind == TokenKind::Template && self.lookahead.template_head()
            {
                let quasi = match self.parse_template_literal(true)? {
                    Expr::Template(template) => template,
                    _ => unreachable!("template literal parser returns templates"),
                };
                let (span, loc) = self.finalize(start_marker, "TaggedTemplateExpression");
                expr = Expr::TaggedTemplate(TaggedTemplateExpression {
                    tag: Box::new(expr),
                    quasi,
                    span,
                    loc,
                });
            } else {
                break;
            }
        }
        self.context.allow_in = previous_allow_in;

        Ok(expr)
    }

    fn parse_super(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        self.expect_keyword("super")?;
        if !self.match_punct("[") && !self.match_punct(".") {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }
        let (span, loc) = self.finalize(marker, "Super");
        Ok(Expr::Super(Super { span, loc }))
    }

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> Result<Expr> {
        debug_assert!(self.context.allow_in, "callers must allow `in`");

        let start_marker = self.marker_of(&self.lookahead.clone());
        let mut expr = if self.match_keyword("super") && self.context.in_function_body {
            self.parse_super()?
        } else if self.match_keyword("new") {
            self.inherit_cover_grammar(|p| p.parse_new_expression())?
        } else {
            self.inherit_cover_grammar(|p| p.parse_primary_expression())?
        };

        loop {
            if self.match_punct("[") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.expect("[")?;
                let property = self.isolate_cover_grammar(|p| p.parse_expression())?;
                self.expect("]")?;
                let (span, loc) = self.finalize(start_marker, "MemberExpression");
                expr = Expr::Member(MemberExpression {
                    computed: true,
                    object: Box::new(expr),
                    property: Box::new(property),
                    span,
                    loc,
                });
            } else if self.match_punct(".") {
                self.context.is_binding_element = false;
                self.context.is_assignment_target = true;
                self.expect(".")?;
                let property = self.parse_identifier_name()?;
                let (span, loc) = self.finalize(start_marker, "MemberExpression");
                expr = Expr::Member(MemberExpression {
                    computed: false,
                    object: Box::new(expr),
                    property: Box::new(property),
                    span,
                    loc,
                });
            } else if self.lookahead.kind == TokenKind::Template && self.lookahead.template_head()
            {
                let quasi = match self.parse_template_literal(true)? {
                    Expr::Template(template) => template,
                    _ => unreachable!("template literal parser returns templates"),
                };
                let (span, loc) = self.finalize(start_marker, "TaggedTemplateExpression");
                expr = Expr::TaggedTemplate(TaggedTemplateExpression {
                    tag: Box::new(expr),
                    quasi,
                    span,
                    loc,
                });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    // ========================================================================
    // UNARY, UPDATE, AND BINARY OPERATORS
    // ========================================================================

    fn parse_update_expression(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();

        if self.match_punct("++") || self.match_punct("--") {
            let marker = self.marker_of(&start_token);
            let token = self.next_token()?;
            let expr = self.inherit_cover_grammar(|p| p.parse_unary_expression())?;
            if self.context.strict {
                if let Expr::Identifier(id) = &expr {
                    if is_restricted_word(&id.name) {
                        self.tolerate_parse_error(messages::STRICT_LHS_PREFIX, &[])?;
                    }
                }
            }
            if !self.context.is_assignment_target {
                self.tolerate_parse_error(messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
            }
            let (span, loc) = self.finalize(marker, "UpdateExpression");
            let expr = Expr::Update(UpdateExpression {
                operator: token.text().to_string(),
                argument: Box::new(expr),
                prefix: true,
                span,
                loc,
            });
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            Ok(expr)
        } else {
            let mut expr =
                self.inherit_cover_grammar(|p| p.parse_left_hand_side_expression_allow_call())?;
            if !self.has_line_terminator
                && self.lookahead.kind == TokenKind::Punctuator
                && (self.match_punct("++") || self.match_punct("--"))
            {
                if self.context.strict {
                    if let Expr::Identifier(id) = &expr {
                        if is_restricted_word(&id.name) {
                            self.tolerate_parse_error(messages::STRICT_LHS_POSTFIX, &[])?;
                        }
                    }
                }
                if !self.context.is_assignment_target {
                    self.tolerate_parse_error(messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
                }
                self.context.is_assignment_target = false;
                self.context.is_binding_element = false;
                let operator = self.next_token()?.text().to_string();
                let (span, loc) = self.finalize(self.marker_of(&start_token), "UpdateExpression");
                expr = Expr::Update(UpdateExpression {
                    operator,
                    argument: Box::new(expr),
                    prefix: false,
                    span,
                    loc,
                });
            }
            Ok(expr)
        }
    }

    fn parse_await_expression(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        self.next_token()?;
        let argument = self.parse_unary_expression()?;
        let (span, loc) = self.finalize(marker, "AwaitExpression");
        Ok(Expr::Await(AwaitExpression {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    pub(crate) fn parse_unary_expression(&mut self) -> Result<Expr> {
        if self.match_punct("+")
            || self.match_punct("-")
            || self.match_punct("~")
            || self.match_punct("!")
            || self.match_keyword("delete")
            || self.match_keyword("void")
            || self.match_keyword("typeof")
        {
            let marker = self.marker_of(&self.lookahead.clone());
            let token = self.next_token()?;
            let argument = self.inherit_cover_grammar(|p| p.parse_unary_expression())?;
            let operator = token.text().to_string();
            let strict_delete = self.context.strict
                && operator == "delete"
                && matches!(&argument, Expr::Identifier(_));
            let (span, loc) = self.finalize(marker, "UnaryExpression");
            let expr = Expr::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
                prefix: true,
                span,
                loc,
            });
            if strict_delete {
                self.tolerate_parse_error(messages::STRICT_DELETE, &[])?;
            }
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            Ok(expr)
        } else if self.context.allow_await && self.match_contextual_keyword("await") {
            self.parse_await_expression()
        } else {
            self.parse_update_expression()
        }
    }

    fn parse_exponentiation_expression(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();
        let expr = self.inherit_cover_grammar(|p| p.parse_unary_expression())?;

        if !matches!(expr, Expr::Unary(_)) && self.match_punct("**") {
            self.next_token()?;
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            let right = self.isolate_cover_grammar(|p| p.parse_exponentiation_expression())?;
            let (span, loc) = self.finalize(self.marker_of(&start_token), "BinaryExpression");
            return Ok(Expr::Binary(BinaryExpression {
                operator: "**".to_string(),
                left: Box::new(expr),
                right: Box::new(right),
                span,
                loc,
            }));
        }

        Ok(expr)
    }

    /// Precedence of the lookahead as a binary operator; zero means it is
    /// not one. `in` only counts when the context allows it.
    fn binary_precedence(&self, token: &Token) -> u8 {
        match token.kind {
            TokenKind::Punctuator => match token.text() {
                "||" => 1,
                "&&" => 2,
                "|" => 3,
                "^" => 4,
                "&" => 5,
                "==" | "!=" | "===" | "!==" => 6,
                "<" | ">" | "<=" | ">=" => 7,
                "<<" | ">>" | ">>>" => 8,
                "+" | "-" => 9,
                "*" | "/" | "%" => 11,
                _ => 0,
            },
            TokenKind::Keyword => match token.text() {
                "instanceof" => 7,
                "in" if self.context.allow_in => 7,
                _ => 0,
            },
            _ => 0,
        }
    }

    fn make_binary(
        &mut self,
        marker: Marker,
        operator: String,
        left: Expr,
        right: Expr,
    ) -> Expr {
        if operator == "&&" || operator == "||" {
            let (span, loc) = self.finalize(marker, "LogicalExpression");
            Expr::Logical(LogicalExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
                loc,
            })
        } else {
            let (span, loc) = self.finalize(marker, "BinaryExpression");
            Expr::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
                span,
                loc,
            })
        }
    }

    fn parse_binary_expression(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();
        let mut expr = self.inherit_cover_grammar(|p| p.parse_exponentiation_expression())?;

        let token = self.lookahead.clone();
        let mut prec = self.binary_precedence(&token);
        if prec > 0 {
            self.next_token()?;
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;

            // Shift/reduce over explicit stacks; a reduce fires whenever the
            // incoming operator does not bind tighter than the stack top.
            let mut marker_tokens: Vec<Token> = vec![start_token, self.lookahead.clone()];
            let right = self.isolate_cover_grammar(|p| p.parse_exponentiation_expression())?;

            let mut expr_stack: Vec<Expr> = vec![expr, right];
            let mut op_stack: Vec<String> = vec![token.text().to_string()];
            let mut prec_stack: Vec<u8> = vec![prec];

            loop {
                prec = self.binary_precedence(&self.lookahead.clone());
                if prec == 0 {
                    break;
                }

                while expr_stack.len() > 1 && prec <= *prec_stack.last().expect("precedence stack") {
                    let right = expr_stack.pop().expect("expression stack");
                    let operator = op_stack.pop().expect("operator stack");
                    prec_stack.pop();
                    let left = expr_stack.pop().expect("expression stack");
                    marker_tokens.pop();
                    let marker_token = marker_tokens.last().expect("marker stack").clone();
                    let marker = self.marker_of(&marker_token);
                    expr_stack.push(self.make_binary(marker, operator, left, right));
                }

                // Shift the operator and its right operand.
                op_stack.push(self.next_token()?.text().to_string());
                prec_stack.push(prec);
                marker_tokens.push(self.lookahead.clone());
                expr_stack.push(self.isolate_cover_grammar(|p| p.parse_exponentiation_expression())?);
            }

            // Reduce whatever is left.
            expr = expr_stack.pop().expect("expression stack");
            marker_tokens.pop();
            while let (Some(left), Some(operator)) = (expr_stack.pop(), op_stack.pop()) {
                let marker_token = marker_tokens.pop().expect("marker stack");
                let marker = self.marker_of(&marker_token);
                expr = self.make_binary(marker, operator, left, expr);
            }
        }

        Ok(expr)
    }

    // ========================================================================
    // CONDITIONAL AND ASSIGNMENT
    // ========================================================================

    fn parse_conditional_expression(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();
        let mut expr = self.inherit_cover_grammar(|p| p.parse_binary_expression())?;

        if self.match_punct("?") {
            self.next_token()?;

            let previous_allow_in = self.context.allow_in;
            self.context.allow_in = true;
            let consequent = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;
            self.context.allow_in = previous_allow_in;

            self.expect(":")?;
            let alternate = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;

            let (span, loc) = self.finalize(self.marker_of(&start_token), "ConditionalExpression");
            expr = Expr::Conditional(ConditionalExpression {
                test: Box::new(expr),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
                span,
                loc,
            });
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
        }

        Ok(expr)
    }

    /// Walks a committed formal parameter, registering identifier bindings
    /// and demoting `simple` for anything that is not a plain name.
    fn check_pattern_param(&mut self, options: &mut FormalParameterList, param: &Pattern) {
        match param {
            Pattern::Identifier(identifier) => {
                let name = identifier.name.clone();
                let token = Token {
                    kind: TokenKind::Identifier,
                    value: TokenValue::Name(name.clone()),
                    line_number: self.last_marker.line,
                    line_start: 0,
                    start: identifier.span.start,
                    end: identifier.span.end,
                };
                self.validate_param(options, &token, &name);
            }
            Pattern::Rest(rest) => self.check_pattern_param(options, &rest.argument),
            Pattern::Assignment(assignment) => self.check_pattern_param(options, &assignment.left),
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_pattern_param(options, element);
                }
            }
            Pattern::Object(object) => {
                for property in &object.properties {
                    match property {
                        ObjectPatternProperty::Property(p) => {
                            if let Some(PropertyValue::Pattern(value)) = &p.value {
                                self.check_pattern_param(options, value);
                            }
                        }
                        ObjectPatternProperty::Rest(rest) => {
                            self.check_pattern_param(options, &rest.argument);
                        }
                    }
                }
            }
            Pattern::Expr(_) => {}
        }
        options.simple = options.simple && matches!(param, Pattern::Identifier(_));
    }

    /// Turns the arrow cover into a validated parameter list, or `None`
    /// when the expression cannot head an arrow function.
    fn reinterpret_as_cover_formals_list(
        &mut self,
        expr: Expr,
    ) -> Result<Option<CoverFormalsList>> {
        let (formals, is_async) = match expr {
            Expr::Identifier(identifier) => {
                (vec![CoverFormal::Expr(Expr::Identifier(identifier))], false)
            }
            Expr::ArrowPlaceholder(placeholder) => (placeholder.params, placeholder.is_async),
            _ => return Ok(None),
        };

        let mut options = FormalParameterList::new();
        let mut saw_yield_expression = false;

        let mut params: Vec<Pattern> = Vec::with_capacity(formals.len());
        for formal in formals {
            let pattern = match formal {
                CoverFormal::Pattern(pattern) => pattern,
                CoverFormal::Expr(expr) => {
                    if let Expr::Yield(_) = &expr {
                        saw_yield_expression = true;
                    }
                    if is_async {
                        if let Expr::Identifier(id) = &expr {
                            if id.name == "await" {
                                let token = self.lookahead.clone();
                                return self.throw_unexpected_token(Some(&token), None);
                            }
                        }
                    }
                    let mut pattern = self.reinterpret_expression_as_pattern(expr);
                    // A default of the form `x = yield` commits `yield` to
                    // its identifier reading.
                    if let Pattern::Assignment(assignment) = &mut pattern {
                        let yield_fixup = match assignment.right.as_ref() {
                            Expr::Yield(y) => {
                                if y.argument.is_some() {
                                    let token = self.lookahead.clone();
                                    return self.throw_unexpected_token(Some(&token), None);
                                }
                                Some((y.span, y.loc.clone()))
                            }
                            _ => None,
                        };
                        if let Some((span, loc)) = yield_fixup {
                            *assignment.right = Expr::Identifier(Identifier {
                                name: "yield".to_string(),
                                span,
                                loc,
                            });
                        }
                    }
                    pattern
                }
            };
            self.check_pattern_param(&mut options, &pattern);
            params.push(pattern);
        }

        if (self.context.strict || !self.context.allow_yield) && saw_yield_expression {
            let token = self.lookahead.clone();
            return self.throw_unexpected_token(Some(&token), None);
        }

        if options.message == Some(messages::STRICT_PARAM_DUPE) {
            let token = if self.context.strict {
                options.stricted.clone()
            } else {
                options.first_restricted.clone()
            };
            return self.throw_unexpected_token(token.as_ref(), options.message);
        }

        Ok(Some(CoverFormalsList {
            simple: options.simple,
            params,
            stricted: options.stricted,
            first_restricted: options.first_restricted,
            message: options.message,
        }))
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Result<Expr> {
        if !self.context.allow_yield && self.match_keyword("yield") {
            return self.parse_yield_expression();
        }

        let start_token = self.lookahead.clone();
        let token = start_token.clone();
        let mut expr = self.parse_conditional_expression()?;

        if token.kind == TokenKind::Identifier
            && token.line_number == self.lookahead.line_number
            && token.text() == "async"
            && (self.lookahead.kind == TokenKind::Identifier || self.match_keyword("yield"))
        {
            // `async x => ...`; the argument stays an expression so the
            // formals pass still sees an `await` parameter name.
            let argument = self.parse_primary_expression()?;
            let marker = self.marker_of(&start_token);
            let (span, loc) = self.finalize(marker, "ArrowParameterPlaceholder");
            expr = Expr::ArrowPlaceholder(ArrowParameterPlaceholder {
                params: vec![CoverFormal::Expr(argument)],
                is_async: true,
                span,
                loc,
            });
        }

        if matches!(expr, Expr::ArrowPlaceholder(_)) || self.match_punct("=>") {
            // Commit to an arrow function.
            self.context.is_assignment_target = false;
            self.context.is_binding_element = false;
            let is_async = matches!(&expr, Expr::ArrowPlaceholder(p) if p.is_async);

            if let Some(list) = self.reinterpret_as_cover_formals_list(expr.clone())? {
                if self.has_line_terminator {
                    let token = self.lookahead.clone();
                    self.tolerate_unexpected_token(Some(&token), None)?;
                }
                self.context.first_cover_initialized_name_error = None;

                let previous_strict = self.context.strict;
                let previous_allow_strict_directive = self.context.allow_strict_directive;
                self.context.allow_strict_directive = list.simple;
                let previous_allow_yield = self.context.allow_yield;
                let previous_allow_await = self.context.allow_await;
                self.context.allow_yield = true;
                self.context.allow_await = is_async;

                let marker = self.marker_of(&start_token);
                self.expect("=>")?;

                let body = if self.match_punct("{") {
                    let previous_allow_in = self.context.allow_in;
                    self.context.allow_in = true;
                    let block = self.parse_function_source_elements()?;
                    self.context.allow_in = previous_allow_in;
                    ArrowBody::Block(block)
                } else {
                    ArrowBody::Expr(Box::new(
                        self.isolate_cover_grammar(|p| p.parse_assignment_expression())?,
                    ))
                };
                let expression = matches!(body, ArrowBody::Expr(_));

                if self.context.strict {
                    if let Some(first_restricted) = &list.first_restricted {
                        let first_restricted = first_restricted.clone();
                        return self
                            .throw_unexpected_token(Some(&first_restricted), list.message);
                    }
                    if let Some(stricted) = list.stricted.clone() {
                        self.tolerate_unexpected_token(Some(&stricted), list.message)?;
                    }
                }

                let (span, loc) = self.finalize(marker, "ArrowFunctionExpression");
                expr = Expr::Arrow(ArrowFunctionExpression {
                    params: list.params,
                    body,
                    generator: false,
                    expression,
                    is_async,
                    span,
                    loc,
                });

                self.context.strict = previous_strict;
                self.context.allow_strict_directive = previous_allow_strict_directive;
                self.context.allow_yield = previous_allow_yield;
                self.context.allow_await = previous_allow_await;
            }
            Ok(expr)
        } else {
            if self.match_assign() {
                if !self.context.is_assignment_target {
                    self.tolerate_parse_error(messages::INVALID_LHS_IN_ASSIGNMENT, &[])?;
                }

                if self.context.strict {
                    if let Expr::Identifier(id) = &expr {
                        if is_restricted_word(&id.name) {
                            self.tolerate_unexpected_token(
                                Some(&token),
                                Some(messages::STRICT_LHS_ASSIGNMENT),
                            )?;
                        }
                        if esparse_lex::is_strict_mode_reserved_word(&id.name) {
                            self.tolerate_unexpected_token(
                                Some(&token),
                                Some(messages::STRICT_RESERVED_WORD),
                            )?;
                        }
                    }
                }

                let left = if self.match_punct("=") {
                    self.reinterpret_expression_as_pattern(expr)
                } else {
                    self.context.is_assignment_target = false;
                    self.context.is_binding_element = false;
                    Pattern::Expr(Box::new(expr))
                };

                let operator_token = self.next_token()?;
                let operator = operator_token.text().to_string();
                let right = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;

                let (span, loc) =
                    self.finalize(self.marker_of(&start_token), "AssignmentExpression");
                expr = Expr::Assignment(AssignmentExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                    span,
                    loc,
                });
                self.context.first_cover_initialized_name_error = None;
            }
            Ok(expr)
        }
    }

    // ========================================================================
    // SEQUENCES AND YIELD
    // ========================================================================

    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        let start_token = self.lookahead.clone();
        let mut expr = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;

        if self.match_punct(",") {
            let mut expressions = vec![expr];
            while self.lookahead.kind != TokenKind::Eof {
                if !self.match_punct(",") {
                    break;
                }
                self.next_token()?;
                expressions
                    .push(self.isolate_cover_grammar(|p| p.parse_assignment_expression())?);
            }

            let (span, loc) = self.finalize(self.marker_of(&start_token), "SequenceExpression");
            expr = Expr::Sequence(SequenceExpression {
                expressions,
                span,
                loc,
            });
        }

        Ok(expr)
    }

    fn is_start_of_expression(&self) -> bool {
        match self.lookahead.kind {
            TokenKind::Punctuator => matches!(
                self.lookahead.text(),
                "[" | "(" | "{" | "+" | "-" | "!" | "~" | "++" | "--" | "/" | "/="
            ),
            TokenKind::Keyword => matches!(
                self.lookahead.text(),
                "class"
                    | "delete"
                    | "function"
                    | "let"
                    | "new"
                    | "super"
                    | "this"
                    | "typeof"
                    | "void"
                    | "yield"
            ),
            _ => true,
        }
    }

    pub(crate) fn parse_yield_expression(&mut self) -> Result<Expr> {
        let marker = self.create_marker();
        self.expect_keyword("yield")?;

        let mut argument: Option<Box<Expr>> = None;
        let mut delegate = false;
        if !self.has_line_terminator {
            let previous_allow_yield = self.context.allow_yield;
            self.context.allow_yield = false;
            delegate = self.match_punct("*");
            if delegate {
                self.next_token()?;
                argument = Some(Box::new(self.parse_assignment_expression()?));
            } else if self.is_start_of_expression() {
                argument = Some(Box::new(self.parse_assignment_expression()?));
            }
            self.context.allow_yield = previous_allow_yield;
        }

        let (span, loc) = self.finalize(marker, "YieldExpression");
        Ok(Expr::Yield(YieldExpression {
            argument,
            delegate,
            span,
            loc,
        }))
    }
}
