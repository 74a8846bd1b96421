//! The JSX overlay.
//!
//! Active when the configuration enables JSX: a `<` in expression position
//! starts an element. The scanner is switched between three goals while an
//! element parses - tag tokens, raw text between tags, and the ordinary
//! expression goal inside `{...}` containers - by rewinding to the start
//! marker and rescanning under the other goal.

use esparse_lex::{ScannerState, Token, TokenKind};
use esparse_util::{messages, Result};

use crate::ast::*;
use crate::{Marker, Parser};

/// Partially-built element, kept on an explicit stack so arbitrarily deep
/// nesting never recurses through the host stack.
struct PendingElement {
    marker: Marker,
    opening: JsxOpeningElement,
    children: Vec<JsxChild>,
    closing: Option<JsxClosingElement>,
}

/// Either side of an element boundary: `<name ...>` or `</name>`.
enum BoundaryElement {
    Opening(JsxOpeningElement),
    Closing(JsxClosingElement),
}

impl<'a> Parser<'a> {
    // ========================================================================
    // SCANNER GOAL SWITCHING
    // ========================================================================

    /// Rewinds the scanner to the start of the lookahead so it can be
    /// rescanned under a JSX goal.
    fn start_jsx(&mut self) {
        let curly_depth = self.scanner.save_state().curly_depth;
        self.scanner.restore_state(ScannerState {
            index: self.start_marker.index,
            line_number: self.start_marker.line,
            line_start: self.start_marker.index - self.start_marker.column as usize,
            curly_depth,
        });
    }

    /// Returns to the ordinary goal by priming the next lookahead.
    fn finish_jsx(&mut self) -> Result<()> {
        self.next_token()?;
        Ok(())
    }

    /// Closes a `{...}` excursion into expression parsing: rewind, consume
    /// the `}` under the JSX goal, and drop its duplicate token record.
    fn reenter_jsx(&mut self) -> Result<()> {
        self.start_jsx();
        self.expect_jsx("}")?;
        if self.config.tokens {
            self.tokens.pop();
        }
        Ok(())
    }

    fn next_jsx_token(&mut self) -> Result<Token> {
        self.collect_comments()?;
        self.start_marker = self.scanner_marker();
        let token = self.scanner.lex_jsx()?;
        self.last_marker = self.scanner_marker();
        if self.config.tokens && token.kind != TokenKind::Eof {
            self.tokens.push(token.clone());
        }
        Ok(token)
    }

    fn next_jsx_text(&mut self) -> Result<Token> {
        self.start_marker = self.scanner_marker();
        let token = self.scanner.scan_jsx_text()?;
        self.last_marker = self.scanner_marker();
        if self.config.tokens && token.start < token.end {
            self.tokens.push(token.clone());
        }
        Ok(token)
    }

    fn peek_jsx_token(&mut self) -> Result<Token> {
        let state = self.scanner.save_state();
        self.scanner.scan_comments()?;
        let next = self.scanner.lex_jsx();
        self.scanner.restore_state(state);
        next
    }

    fn expect_jsx(&mut self, value: &str) -> Result<()> {
        let token = self.next_jsx_token()?;
        if token.kind != TokenKind::Punctuator || token.text() != value {
            return self.throw_unexpected_token(Some(&token), None);
        }
        Ok(())
    }

    fn match_jsx(&mut self, value: &str) -> Result<bool> {
        let next = self.peek_jsx_token()?;
        Ok(next.kind == TokenKind::Punctuator && next.text() == value)
    }

    /// Marker at the next significant character.
    fn create_jsx_marker(&mut self) -> Result<Marker> {
        self.collect_comments()?;
        Ok(self.scanner_marker())
    }

    /// Marker at the current character, whitespace included; JSX text is
    /// significant.
    fn create_jsx_child_marker(&mut self) -> Marker {
        self.scanner_marker()
    }

    // ========================================================================
    // NAMES AND ATTRIBUTES
    // ========================================================================

    fn parse_jsx_identifier(&mut self) -> Result<JsxIdentifier> {
        let marker = self.create_jsx_marker()?;
        let token = self.next_jsx_token()?;
        if token.kind != TokenKind::Identifier {
            return self.throw_unexpected_token(Some(&token), None);
        }
        let (span, loc) = self.finalize(marker, "JSXIdentifier");
        Ok(JsxIdentifier {
            name: token.text().to_string(),
            span,
            loc,
        })
    }

    fn parse_jsx_element_name(&mut self) -> Result<JsxElementName> {
        let marker = self.create_jsx_marker()?;
        let mut element_name = JsxElementName::Identifier(self.parse_jsx_identifier()?);

        if self.match_jsx(":")? {
            let namespace = match element_name {
                JsxElementName::Identifier(identifier) => identifier,
                _ => unreachable!("namespace prefix is a plain identifier"),
            };
            self.expect_jsx(":")?;
            let name = self.parse_jsx_identifier()?;
            let (span, loc) = self.finalize(marker, "JSXNamespacedName");
            element_name = JsxElementName::Namespaced(JsxNamespacedName {
                namespace,
                name,
                span,
                loc,
            });
        } else if self.match_jsx(".")? {
            while self.match_jsx(".")? {
                self.expect_jsx(".")?;
                let property = self.parse_jsx_identifier()?;
                let (span, loc) = self.finalize(marker, "JSXMemberExpression");
                element_name = JsxElementName::Member(JsxMemberExpression {
                    object: Box::new(element_name),
                    property,
                    span,
                    loc,
                });
            }
        }

        Ok(element_name)
    }

    fn parse_jsx_attribute_name(&mut self) -> Result<JsxElementName> {
        let marker = self.create_jsx_marker()?;
        let identifier = self.parse_jsx_identifier()?;

        if self.match_jsx(":")? {
            self.expect_jsx(":")?;
            let name = self.parse_jsx_identifier()?;
            let (span, loc) = self.finalize(marker, "JSXNamespacedName");
            return Ok(JsxElementName::Namespaced(JsxNamespacedName {
                namespace: identifier,
                name,
                span,
                loc,
            }));
        }

        Ok(JsxElementName::Identifier(identifier))
    }

    fn parse_jsx_string_literal_attribute(&mut self) -> Result<JsxAttributeValue> {
        let marker = self.create_jsx_marker()?;
        let token = self.next_jsx_token()?;
        if token.kind != TokenKind::StringLiteral {
            return self.throw_unexpected_token(Some(&token), None);
        }
        let raw = self.get_token_raw(&token);
        let value = token
            .string_value()
            .map(|s| LiteralValue::Str(s.to_string()))
            .unwrap_or(LiteralValue::Null);
        let (span, loc) = self.finalize(marker, "Literal");
        Ok(JsxAttributeValue::StringLiteral(Literal {
            value,
            raw,
            regex: None,
            span,
            loc,
        }))
    }

    fn parse_jsx_expression_attribute(&mut self) -> Result<JsxAttributeValue> {
        let marker = self.create_jsx_marker()?;

        self.expect_jsx("{")?;
        self.finish_jsx()?;

        if self.match_punct("}") {
            self.tolerate_parse_error(messages::INVALID_JSX_ATTRIBUTE_VALUE, &[])?;
        }

        let expression = self.parse_assignment_expression()?;
        self.reenter_jsx()?;

        let (span, loc) = self.finalize(marker, "JSXExpressionContainer");
        Ok(JsxAttributeValue::Container(JsxExpressionContainer {
            expression: Some(Box::new(expression)),
            span,
            loc,
        }))
    }

    fn parse_jsx_attribute_value(&mut self) -> Result<JsxAttributeValue> {
        if self.match_jsx("{")? {
            self.parse_jsx_expression_attribute()
        } else if self.match_jsx("<")? {
            let element = self.parse_jsx_element()?;
            Ok(JsxAttributeValue::Element(Box::new(element)))
        } else {
            self.parse_jsx_string_literal_attribute()
        }
    }

    fn parse_jsx_name_value_attribute(&mut self) -> Result<JsxAttributeItem> {
        let marker = self.create_jsx_marker()?;
        let name = self.parse_jsx_attribute_name()?;

        let mut value = None;
        if self.match_jsx("=")? {
            self.expect_jsx("=")?;
            value = Some(self.parse_jsx_attribute_value()?);
        }

        let (span, loc) = self.finalize(marker, "JSXAttribute");
        Ok(JsxAttributeItem::Attribute(JsxAttribute {
            name,
            value,
            span,
            loc,
        }))
    }

    fn parse_jsx_spread_attribute(&mut self) -> Result<JsxAttributeItem> {
        let marker = self.create_jsx_marker()?;
        self.expect_jsx("{")?;
        self.expect_jsx("...")?;

        self.finish_jsx()?;
        let argument = self.parse_assignment_expression()?;
        self.reenter_jsx()?;

        let (span, loc) = self.finalize(marker, "JSXSpreadAttribute");
        Ok(JsxAttributeItem::Spread(JsxSpreadAttribute {
            argument: Box::new(argument),
            span,
            loc,
        }))
    }

    fn parse_jsx_attributes(&mut self) -> Result<Vec<JsxAttributeItem>> {
        let mut attributes = Vec::new();
        while !self.match_jsx("/")? && !self.match_jsx(">")? {
            let attribute = if self.match_jsx("{")? {
                self.parse_jsx_spread_attribute()?
            } else {
                self.parse_jsx_name_value_attribute()?
            };
            attributes.push(attribute);
        }
        Ok(attributes)
    }

    // ========================================================================
    // ELEMENTS
    // ========================================================================

    fn parse_jsx_opening_element(&mut self) -> Result<JsxOpeningElement> {
        let marker = self.create_jsx_marker()?;

        self.expect_jsx("<")?;
        let name = self.parse_jsx_element_name()?;
        let attributes = self.parse_jsx_attributes()?;
        let self_closing = self.match_jsx("/")?;
        if self_closing {
            self.expect_jsx("/")?;
        }
        self.expect_jsx(">")?;

        let (span, loc) = self.finalize(marker, "JSXOpeningElement");
        Ok(JsxOpeningElement {
            name,
            self_closing,
            attributes,
            span,
            loc,
        })
    }

    fn parse_jsx_boundary_element(&mut self) -> Result<BoundaryElement> {
        let marker = self.create_jsx_marker()?;

        self.expect_jsx("<")?;
        if self.match_jsx("/")? {
            self.expect_jsx("/")?;
            let name = self.parse_jsx_element_name()?;
            self.expect_jsx(">")?;
            let (span, loc) = self.finalize(marker, "JSXClosingElement");
            return Ok(BoundaryElement::Closing(JsxClosingElement {
                name,
                span,
                loc,
            }));
        }

        let name = self.parse_jsx_element_name()?;
        let attributes = self.parse_jsx_attributes()?;
        let self_closing = self.match_jsx("/")?;
        if self_closing {
            self.expect_jsx("/")?;
        }
        self.expect_jsx(">")?;

        let (span, loc) = self.finalize(marker, "JSXOpeningElement");
        Ok(BoundaryElement::Opening(JsxOpeningElement {
            name,
            self_closing,
            attributes,
            span,
            loc,
        }))
    }

    fn parse_jsx_expression_container(&mut self) -> Result<JsxExpressionContainer> {
        let marker = self.create_jsx_marker()?;
        self.expect_jsx("{")?;

        let expression;
        if self.match_jsx("}")? {
            // `{}` or `{ /* comment */ }` is an empty child expression.
            self.collect_comments()?;
            self.last_marker = self.scanner_marker();
            expression = None;
            self.expect_jsx("}")?;
        } else {
            self.finish_jsx()?;
            expression = Some(Box::new(self.parse_assignment_expression()?));
            self.reenter_jsx()?;
        }

        let (span, loc) = self.finalize(marker, "JSXExpressionContainer");
        Ok(JsxExpressionContainer {
            expression,
            span,
            loc,
        })
    }

    fn parse_jsx_children(&mut self) -> Result<Vec<JsxChild>> {
        let mut children = Vec::new();

        while !self.scanner.eof() {
            let marker = self.create_jsx_child_marker();
            let token = self.next_jsx_text()?;
            if token.start < token.end {
                let raw = self.get_token_raw(&token);
                let value = token.string_value().unwrap_or("").to_string();
                let (span, loc) = self.finalize(marker, "JSXText");
                children.push(JsxChild::Text(JsxText {
                    value,
                    raw,
                    span,
                    loc,
                }));
            }

            if self.scanner.source()[self.scanner.index()..].starts_with('{') {
                children.push(JsxChild::Container(self.parse_jsx_expression_container()?));
            } else {
                break;
            }
        }

        Ok(children)
    }

    fn qualified_element_name(name: &JsxElementName) -> String {
        match name {
            JsxElementName::Identifier(identifier) => identifier.name.clone(),
            JsxElementName::Namespaced(namespaced) => format!(
                "{}:{}",
                namespaced.namespace.name, namespaced.name.name
            ),
            JsxElementName::Member(member) => format!(
                "{}.{}",
                Self::qualified_element_name(&member.object),
                member.property.name
            ),
        }
    }

    /// Consumes children and boundary tags until the element that opened
    /// this call is closed, keeping deeper elements on an explicit stack.
    fn parse_complex_jsx_element(&mut self, mut el: PendingElement) -> Result<PendingElement> {
        let mut stack: Vec<PendingElement> = Vec::new();

        while !self.scanner.eof() {
            el.children.extend(self.parse_jsx_children()?);
            let marker = self.create_jsx_child_marker();
            match self.parse_jsx_boundary_element()? {
                BoundaryElement::Opening(opening) => {
                    if opening.self_closing {
                        let (span, loc) = self.finalize(marker, "JSXElement");
                        el.children.push(JsxChild::Element(JsxElement {
                            opening,
                            children: Vec::new(),
                            closing: None,
                            span,
                            loc,
                        }));
                    } else {
                        stack.push(el);
                        el = PendingElement {
                            marker,
                            opening,
                            children: Vec::new(),
                            closing: None,
                        };
                    }
                }
                BoundaryElement::Closing(closing) => {
                    let open = Self::qualified_element_name(&el.opening.name);
                    let close = Self::qualified_element_name(&closing.name);
                    el.closing = Some(closing);
                    if open != close {
                        self.tolerate_parse_error(
                            messages::EXPECTED_JSX_CLOSING_TAG,
                            &[&open],
                        )?;
                    }
                    if let Some(mut parent) = stack.pop() {
                        let (span, loc) = self.finalize(el.marker, "JSXElement");
                        parent.children.push(JsxChild::Element(JsxElement {
                            opening: el.opening,
                            children: el.children,
                            closing: el.closing,
                            span,
                            loc,
                        }));
                        el = parent;
                    } else {
                        break;
                    }
                }
            }
        }

        Ok(el)
    }

    fn parse_jsx_element(&mut self) -> Result<JsxElement> {
        let marker = self.create_jsx_marker()?;

        let opening = self.parse_jsx_opening_element()?;
        let mut children = Vec::new();
        let mut closing = None;

        if !opening.self_closing {
            let el = self.parse_complex_jsx_element(PendingElement {
                marker,
                opening: opening.clone(),
                children: Vec::new(),
                closing: None,
            })?;
            children = el.children;
            closing = el.closing;
        }

        let (span, loc) = self.finalize(marker, "JSXElement");
        Ok(JsxElement {
            opening,
            children,
            closing,
            span,
            loc,
        })
    }

    /// Entry point from primary-expression position at a `<`.
    pub(crate) fn parse_jsx_root(&mut self) -> Result<Expr> {
        // The `<` was pushed as an ordinary token; the JSX goal rescans it.
        if self.config.tokens {
            self.tokens.pop();
        }

        self.start_jsx();
        let element = self.parse_jsx_element()?;
        self.finish_jsx()?;

        Ok(Expr::JsxElement(element))
    }
}
