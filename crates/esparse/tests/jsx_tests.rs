//! JSX overlay scenarios.

use esparse::ast::*;
use esparse::{parse_script, ParseOptions};

fn jsx(source: &str) -> Program {
    let options = ParseOptions {
        jsx: true,
        ..ParseOptions::default()
    };
    parse_script(source, &options).expect(source)
}

fn root_element(program: &Program) -> &JsxElement {
    match &program.body[0] {
        Stmt::Expression(statement) => match &statement.expression {
            Expr::JsxElement(element) => element,
            other => panic!("expected JSX element, got {:?}", other),
        },
        other => panic!("expected expression statement, got {:?}", other),
    }
}

fn element_name(name: &JsxElementName) -> String {
    match name {
        JsxElementName::Identifier(identifier) => identifier.name.clone(),
        JsxElementName::Namespaced(namespaced) => {
            format!("{}:{}", namespaced.namespace.name, namespaced.name.name)
        }
        JsxElementName::Member(member) => {
            format!("{}.{}", element_name(&member.object), member.property.name)
        }
    }
}

#[test]
fn self_closing_element() {
    let program = jsx("<br />");
    let element = root_element(&program);
    assert!(element.opening.self_closing);
    assert!(element.closing.is_none());
    assert!(element.children.is_empty());
    assert_eq!(element_name(&element.opening.name), "br");
}

#[test]
fn element_with_text_child() {
    let program = jsx("<p>hello world</p>");
    let element = root_element(&program);
    assert!(!element.opening.self_closing);
    assert_eq!(element.children.len(), 1);
    match &element.children[0] {
        JsxChild::Text(text) => assert_eq!(text.value, "hello world"),
        other => panic!("expected text child, got {:?}", other),
    }
    assert!(element.closing.is_some());
}

#[test]
fn nested_elements_and_containers() {
    let program = jsx("<div><span>{x + 1}</span> tail</div>");
    let element = root_element(&program);
    assert_eq!(element_name(&element.opening.name), "div");

    let inner = element
        .children
        .iter()
        .find_map(|child| match child {
            JsxChild::Element(element) => Some(element),
            _ => None,
        })
        .expect("inner element");
    assert_eq!(element_name(&inner.opening.name), "span");
    match &inner.children[0] {
        JsxChild::Container(container) => {
            let expression = container.expression.as_ref().expect("expression");
            assert!(matches!(expression.as_ref(), Expr::Binary(b) if b.operator == "+"));
        }
        other => panic!("expected expression container, got {:?}", other),
    }
}

#[test]
fn attributes_in_every_form() {
    let program = jsx(r#"<a href="x" data-id={id} download {...rest} />"#);
    let element = root_element(&program);
    assert_eq!(element.opening.attributes.len(), 4);

    match &element.opening.attributes[0] {
        JsxAttributeItem::Attribute(attribute) => {
            assert_eq!(element_name(&attribute.name), "href");
            assert!(matches!(
                attribute.value,
                Some(JsxAttributeValue::StringLiteral(_))
            ));
        }
        other => panic!("expected named attribute, got {:?}", other),
    }
    match &element.opening.attributes[1] {
        JsxAttributeItem::Attribute(attribute) => {
            assert_eq!(element_name(&attribute.name), "data-id");
            assert!(matches!(
                attribute.value,
                Some(JsxAttributeValue::Container(_))
            ));
        }
        other => panic!("expected named attribute, got {:?}", other),
    }
    match &element.opening.attributes[2] {
        JsxAttributeItem::Attribute(attribute) => assert!(attribute.value.is_none()),
        other => panic!("expected bare attribute, got {:?}", other),
    }
    assert!(matches!(
        &element.opening.attributes[3],
        JsxAttributeItem::Spread(_)
    ));
}

#[test]
fn namespaced_and_member_names() {
    let program = jsx("<svg:rect />");
    assert_eq!(
        element_name(&root_element(&program).opening.name),
        "svg:rect"
    );

    let program = jsx("<Widgets.List.Item />");
    assert_eq!(
        element_name(&root_element(&program).opening.name),
        "Widgets.List.Item"
    );
}

#[test]
fn attribute_string_entities_decode() {
    let program = jsx(r#"<a title="1 &lt; 2 &amp; 3" />"#);
    let element = root_element(&program);
    match &element.opening.attributes[0] {
        JsxAttributeItem::Attribute(attribute) => match &attribute.value {
            Some(JsxAttributeValue::StringLiteral(literal)) => {
                assert_eq!(literal.value, LiteralValue::Str("1 < 2 & 3".to_string()));
            }
            other => panic!("expected string value, got {:?}", other),
        },
        other => panic!("expected attribute, got {:?}", other),
    }
}

#[test]
fn mismatched_closing_tag_is_an_error() {
    let options = ParseOptions {
        jsx: true,
        ..ParseOptions::default()
    };
    assert!(parse_script("<a>text</b>", &options).is_err());
}

#[test]
fn jsx_mixes_with_ordinary_expressions() {
    let program = jsx("var el = cond ? <a /> : <b />;");
    match &program.body[0] {
        Stmt::Variable(declaration) => {
            let init = declaration.declarations[0].init.as_ref().unwrap();
            assert!(matches!(init, Expr::Conditional(_)));
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn empty_expression_container_child() {
    let program = jsx("<div>{/* nothing */}</div>");
    let element = root_element(&program);
    match &element.children[0] {
        JsxChild::Container(container) => assert!(container.expression.is_none()),
        other => panic!("expected container, got {:?}", other),
    }
}
