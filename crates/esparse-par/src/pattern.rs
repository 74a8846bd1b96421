//! Binding patterns and cover-grammar reinterpretation.
//!
//! Patterns are parsed directly in declaration positions (`var`, `let`,
//! `const`, formal parameters, `catch`). In expression positions the parser
//! first produces an expression and converts it here once the surrounding
//! production commits to a pattern reading; the conversion itself is
//! permissive - structural validity is enforced by the assignment-target
//! and binding-element flags at the places that request it.
//!
//! The `params` list threaded through the binding parsers collects every
//! identifier token bound, so the caller can run the strict-mode parameter
//! checks over them afterwards.

use esparse_lex::{Token, TokenKind};
use esparse_util::{messages, Result};

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a binding pattern.
    pub(crate) fn parse_pattern(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<Pattern> {
        if self.match_punct("[") {
            self.parse_array_pattern(params, kind)
        } else if self.match_punct("{") {
            self.parse_object_pattern(params, kind)
        } else {
            if self.match_keyword("let")
                && matches!(kind, Some(DeclarationKind::Const) | Some(DeclarationKind::Let))
            {
                let token = self.lookahead.clone();
                self.tolerate_unexpected_token(
                    Some(&token),
                    Some(messages::LET_IN_LEXICAL_BINDING),
                )?;
            }
            params.push(self.lookahead.clone());
            Ok(Pattern::Identifier(self.parse_variable_identifier(kind)?))
        }
    }

    /// Parses a binding pattern with an optional `= default`.
    pub(crate) fn parse_pattern_with_default(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<Pattern> {
        let start_token = self.lookahead.clone();
        let mut pattern = self.parse_pattern(params, kind)?;

        if self.match_punct("=") {
            self.next_token()?;
            let previous_allow_yield = self.context.allow_yield;
            self.context.allow_yield = true;
            let right = self.isolate_cover_grammar(|p| p.parse_assignment_expression())?;
            self.context.allow_yield = previous_allow_yield;

            let marker = self.marker_of(&start_token);
            let (span, loc) = self.finalize(marker, "AssignmentPattern");
            pattern = Pattern::Assignment(AssignmentPattern {
                left: Box::new(pattern),
                right: Box::new(right),
                span,
                loc,
            });
        }

        Ok(pattern)
    }

    /// Parses `...pattern` in a binding element list.
    pub(crate) fn parse_binding_rest_element(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<Pattern> {
        let marker = self.create_marker();
        self.expect("...")?;
        let argument = self.parse_pattern(params, kind)?;

        let (span, loc) = self.finalize(marker, "RestElement");
        Ok(Pattern::Rest(RestElement {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    fn parse_array_pattern(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<Pattern> {
        let marker = self.create_marker();
        self.expect("[")?;

        let mut elements: Vec<Option<Pattern>> = Vec::new();
        while !self.match_punct("]") {
            if self.match_punct(",") {
                self.next_token()?;
                elements.push(None);
            } else {
                if self.match_punct("...") {
                    elements.push(Some(self.parse_binding_rest_element(params, kind)?));
                    break;
                }
                elements.push(Some(self.parse_pattern_with_default(params, kind)?));
                if !self.match_punct("]") {
                    self.expect(",")?;
                }
            }
        }
        self.expect("]")?;

        let (span, loc) = self.finalize(marker, "ArrayPattern");
        Ok(Pattern::Array(ArrayPattern {
            elements,
            span,
            loc,
        }))
    }

    fn parse_property_pattern(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<ObjectPatternProperty> {
        let marker = self.create_marker();
        let mut computed = false;
        let mut shorthand = false;

        let key;
        let value;

        if self.lookahead.kind == TokenKind::Identifier {
            let key_token = self.lookahead.clone();
            let init = self.parse_variable_identifier(None)?;
            key = Expr::Identifier(init.clone());

            if self.match_punct("=") {
                params.push(key_token.clone());
                shorthand = true;
                self.next_token()?;
                let expr = self.parse_assignment_expression()?;

                let pattern_marker = self.marker_of(&key_token);
                let (span, loc) = self.finalize(pattern_marker, "AssignmentPattern");
                value = Some(PropertyValue::Pattern(Box::new(Pattern::Assignment(
                    AssignmentPattern {
                        left: Box::new(Pattern::Identifier(init)),
                        right: Box::new(expr),
                        span,
                        loc,
                    },
                ))));
            } else if !self.match_punct(":") {
                params.push(key_token);
                shorthand = true;
                value = Some(PropertyValue::Pattern(Box::new(Pattern::Identifier(init))));
            } else {
                self.expect(":")?;
                value = Some(PropertyValue::Pattern(Box::new(
                    self.parse_pattern_with_default(params, kind)?,
                )));
            }
        } else {
            computed = self.match_punct("[");
            key = self.parse_object_property_key()?;
            self.expect(":")?;
            value = Some(PropertyValue::Pattern(Box::new(
                self.parse_pattern_with_default(params, kind)?,
            )));
        }

        let (span, loc) = self.finalize(marker, "Property");
        Ok(ObjectPatternProperty::Property(Property {
            key,
            computed,
            value,
            kind: PropertyKind::Init,
            method: false,
            shorthand,
            span,
            loc,
        }))
    }

    fn parse_rest_property(&mut self, params: &mut Vec<Token>) -> Result<ObjectPatternProperty> {
        let marker = self.create_marker();
        self.expect("...")?;
        let argument = self.parse_pattern(params, None)?;

        if self.match_punct("=") {
            return self.throw_parse_error(messages::DEFAULT_REST_PROPERTY, &[]);
        }
        if !self.match_punct("}") {
            return self.throw_parse_error(messages::PROPERTY_AFTER_REST_PROPERTY, &[]);
        }

        let (span, loc) = self.finalize(marker, "RestElement");
        Ok(ObjectPatternProperty::Rest(RestElement {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    fn parse_object_pattern(
        &mut self,
        params: &mut Vec<Token>,
        kind: Option<DeclarationKind>,
    ) -> Result<Pattern> {
        let marker = self.create_marker();
        let mut properties = Vec::new();

        self.expect("{")?;
        while !self.match_punct("}") {
            let property = if self.match_punct("...") {
                self.parse_rest_property(params)?
            } else {
                self.parse_property_pattern(params, kind)?
            };
            properties.push(property);
            if !self.match_punct("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;

        let (span, loc) = self.finalize(marker, "ObjectPattern");
        Ok(Pattern::Object(ObjectPattern {
            properties,
            span,
            loc,
        }))
    }

    /// Parses an identifier in binding position, applying the reserved-word
    /// rules for the current mode.
    pub(crate) fn parse_variable_identifier(
        &mut self,
        kind: Option<DeclarationKind>,
    ) -> Result<Identifier> {
        let marker = self.create_marker();
        let token = self.next_token()?;

        if token.kind == TokenKind::Keyword && token.text() == "yield" {
            if self.context.strict {
                self.tolerate_unexpected_token(Some(&token), Some(messages::STRICT_RESERVED_WORD))?;
            } else if !self.context.allow_yield {
                return self.throw_unexpected_token(Some(&token), None);
            }
        } else if token.kind != TokenKind::Identifier {
            if self.context.strict
                && token.kind == TokenKind::Keyword
                && esparse_lex::is_strict_mode_reserved_word(token.text())
            {
                self.tolerate_unexpected_token(Some(&token), Some(messages::STRICT_RESERVED_WORD))?;
            } else if self.context.strict
                || token.text() != "let"
                || kind != Some(DeclarationKind::Var)
            {
                return self.throw_unexpected_token(Some(&token), None);
            }
        } else if (self.context.is_module || self.context.allow_await)
            && token.kind == TokenKind::Identifier
            && token.text() == "await"
        {
            self.tolerate_unexpected_token(Some(&token), None)?;
        }

        let name = token.text().to_string();
        let (span, loc) = self.finalize(marker, "Identifier");
        Ok(Identifier { name, span, loc })
    }

    // ========================================================================
    // REINTERPRETATION
    // ========================================================================

    /// Converts an expression that was parsed as a cover into the pattern
    /// it spells. Shapes with no pattern reading are wrapped unchanged; the
    /// caller's target/binding flags decide whether that is an error.
    pub(crate) fn reinterpret_expression_as_pattern(&mut self, expr: Expr) -> Pattern {
        match expr {
            Expr::Identifier(identifier) => Pattern::Identifier(identifier),
            Expr::Spread(spread) => {
                let argument = self.reinterpret_expression_as_pattern(*spread.argument);
                Pattern::Rest(RestElement {
                    argument: Box::new(argument),
                    span: spread.span,
                    loc: spread.loc,
                })
            }
            Expr::Array(array) => {
                let elements = array
                    .elements
                    .into_iter()
                    .map(|element| element.map(|e| self.reinterpret_expression_as_pattern(e)))
                    .collect();
                Pattern::Array(ArrayPattern {
                    elements,
                    span: array.span,
                    loc: array.loc,
                })
            }
            Expr::Object(object) => {
                let properties = object
                    .properties
                    .into_iter()
                    .map(|property| match property {
                        ObjectExpressionProperty::Property(mut p) => {
                            p.value = p.value.map(|value| match value {
                                PropertyValue::Expr(e) => PropertyValue::Pattern(Box::new(
                                    self.reinterpret_expression_as_pattern(*e),
                                )),
                                pattern => pattern,
                            });
                            ObjectPatternProperty::Property(p)
                        }
                        ObjectExpressionProperty::Spread(spread) => {
                            let argument =
                                self.reinterpret_expression_as_pattern(*spread.argument);
                            ObjectPatternProperty::Rest(RestElement {
                                argument: Box::new(argument),
                                span: spread.span,
                                loc: spread.loc,
                            })
                        }
                    })
                    .collect();
                Pattern::Object(ObjectPattern {
                    properties,
                    span: object.span,
                    loc: object.loc,
                })
            }
            Expr::Assignment(assignment) => Pattern::Assignment(AssignmentPattern {
                left: assignment.left,
                right: assignment.right,
                span: assignment.span,
                loc: assignment.loc,
            }),
            other => Pattern::Expr(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserConfig;

    fn parse_var(source: &str) -> Program {
        let mut parser = Parser::new(source, ParserConfig::default());
        parser.parse_script().unwrap()
    }

    fn first_declarator(program: &Program) -> &VariableDeclarator {
        match &program.body[0] {
            Stmt::Variable(decl) => &decl.declarations[0],
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_binding() {
        let program = parse_var("var x = 1;");
        let declarator = first_declarator(&program);
        assert!(matches!(&declarator.id, Pattern::Identifier(id) if id.name == "x"));
    }

    #[test]
    fn test_array_pattern_with_hole_and_rest() {
        let program = parse_var("var [a, , ...rest] = xs;");
        let declarator = first_declarator(&program);
        match &declarator.id {
            Pattern::Array(array) => {
                assert_eq!(array.elements.len(), 3);
                assert!(array.elements[1].is_none());
                assert!(matches!(array.elements[2], Some(Pattern::Rest(_))));
            }
            other => panic!("expected array pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_object_pattern_shorthand_and_renamed() {
        let program = parse_var("var {a, b: c, d = 1} = o;");
        let declarator = first_declarator(&program);
        match &declarator.id {
            Pattern::Object(object) => {
                assert_eq!(object.properties.len(), 3);
                match &object.properties[0] {
                    ObjectPatternProperty::Property(p) => assert!(p.shorthand),
                    other => panic!("expected property, got {:?}", other),
                }
            }
            other => panic!("expected object pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_pattern_with_default() {
        let program = parse_var("var [{x = 1}] = data;");
        let declarator = first_declarator(&program);
        assert!(matches!(&declarator.id, Pattern::Array(_)));
    }

    #[test]
    fn test_let_as_lexical_name_rejected() {
        let mut parser = Parser::new("let let = 1;", ParserConfig::default());
        assert!(parser.parse_script().is_err());
    }
}
