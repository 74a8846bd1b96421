//! End-to-end parsing scenarios.

use esparse::ast::*;
use esparse::{parse, parse_module, parse_script, ParseOptions};

fn script(source: &str) -> Program {
    parse_script(source, &ParseOptions::default()).expect(source)
}

fn first_expression(program: &Program) -> &Expr {
    match &program.body[0] {
        Stmt::Expression(statement) => &statement.expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn parses_variable_declaration_with_string_literal() {
    let program = script("var $ = \"Hello!\"");
    assert_eq!(program.body.len(), 1);
    match &program.body[0] {
        Stmt::Variable(declaration) => {
            assert_eq!(declaration.kind, DeclarationKind::Var);
            assert_eq!(declaration.declarations.len(), 1);
            let declarator = &declaration.declarations[0];
            assert!(matches!(&declarator.id, Pattern::Identifier(id) if id.name == "$"));
            match declarator.init.as_ref().expect("initializer") {
                Expr::Literal(literal) => {
                    assert_eq!(literal.value, LiteralValue::Str("Hello!".to_string()));
                    assert_eq!(literal.raw, "\"Hello!\"");
                }
                other => panic!("expected literal, got {:?}", other),
            }
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn division_binds_left_after_identifier() {
    let program = script("a/b/g");
    match first_expression(&program) {
        Expr::Binary(outer) => {
            assert_eq!(outer.operator, "/");
            match outer.left.as_ref() {
                Expr::Binary(inner) => {
                    assert_eq!(inner.operator, "/");
                    assert!(matches!(inner.left.as_ref(), Expr::Identifier(id) if id.name == "a"));
                    assert!(matches!(inner.right.as_ref(), Expr::Identifier(id) if id.name == "b"));
                }
                other => panic!("expected inner division, got {:?}", other),
            }
            assert!(matches!(outer.right.as_ref(), Expr::Identifier(id) if id.name == "g"));
        }
        other => panic!("expected division, got {:?}", other),
    }
}

#[test]
fn regex_literal_at_expression_start() {
    let program = script("/a/g");
    match first_expression(&program) {
        Expr::Literal(literal) => {
            assert_eq!(literal.value, LiteralValue::Regex);
            let regex = literal.regex.as_ref().expect("regex data");
            assert_eq!(regex.pattern, "a");
            assert_eq!(regex.flags, "g");
            assert_eq!(literal.raw, "/a/g");
        }
        other => panic!("expected regex literal, got {:?}", other),
    }
}

#[test]
fn arrow_function_with_two_parameters() {
    let program = script("(a, b) => a + b");
    match first_expression(&program) {
        Expr::Arrow(arrow) => {
            assert_eq!(arrow.params.len(), 2);
            assert!(matches!(&arrow.params[0], Pattern::Identifier(id) if id.name == "a"));
            assert!(matches!(&arrow.params[1], Pattern::Identifier(id) if id.name == "b"));
            assert!(arrow.expression);
            assert!(!arrow.is_async);
            match &arrow.body {
                ArrowBody::Expr(body) => {
                    assert!(matches!(body.as_ref(), Expr::Binary(b) if b.operator == "+"));
                }
                other => panic!("expected expression body, got {:?}", other),
            }
        }
        other => panic!("expected arrow function, got {:?}", other),
    }
}

#[test]
fn async_function_with_await() {
    let program = script("async function f(){ await x; }");
    match &program.body[0] {
        Stmt::Function(declaration) => {
            assert!(declaration.is_async);
            assert!(!declaration.generator);
            match &declaration.body.body[0] {
                Stmt::Expression(statement) => match &statement.expression {
                    Expr::Await(await_expr) => {
                        assert!(matches!(await_expr.argument.as_ref(),
                            Expr::Identifier(id) if id.name == "x"));
                    }
                    other => panic!("expected await, got {:?}", other),
                },
                other => panic!("expected expression statement, got {:?}", other),
            }
        }
        other => panic!("expected function declaration, got {:?}", other),
    }
}

#[test]
fn import_rejected_in_script_accepted_in_module() {
    let error = parse_script("import x from \"m\"", &ParseOptions::default()).unwrap_err();
    assert!(error.description.contains("Unexpected token"));

    let program = parse_module("import x from \"m\"", &ParseOptions::default()).unwrap();
    match &program.body[0] {
        Stmt::Import(import) => {
            assert_eq!(import.specifiers.len(), 1);
            match &import.specifiers[0] {
                ImportDeclarationSpecifier::Default(specifier) => {
                    assert_eq!(specifier.local.name, "x");
                }
                other => panic!("expected default specifier, got {:?}", other),
            }
            assert_eq!(import.source.value, LiteralValue::Str("m".to_string()));
        }
        other => panic!("expected import declaration, got {:?}", other),
    }
}

#[test]
fn script_and_module_agree_on_plain_input() {
    let source = "var x = 1; function f() { return x; }";
    let as_script = parse_script(source, &ParseOptions::default()).unwrap();
    let as_module = parse_module(source, &ParseOptions::default()).unwrap();
    assert_eq!(as_script.source_type, SourceType::Script);
    assert_eq!(as_module.source_type, SourceType::Module);
    assert_eq!(as_script.body, as_module.body);
}

// ============================================================================
// QUANTIFIED INVARIANTS
// ============================================================================

const SAMPLES: &[&str] = &[
    "var answer = 6 * 7;",
    "function f(a, b = 1, ...rest) { return a + b; }",
    "class A extends B { constructor() { super(); } }",
    "for (const [k, v] of entries) { console.log(`${k}: ${v}`); }",
    "try { risky(); } catch (e) { recover(e); } finally { done(); }",
    "switch (x) { case 1: break; default: y; }",
    "label: while (true) { break label; }",
    "obj = { a, b: 2, [c]: 3, d() {}, get e() { return 1; }, ...rest };",
    "async () => { await Promise.all(jobs); };",
    "x = a ? b : c, y = typeof z;",
];

#[test]
fn node_ranges_are_ordered_and_in_bounds() {
    for source in SAMPLES {
        let program = parse(source, &ParseOptions::default()).expect(source);
        assert!(program.span.start <= program.span.end);
        assert!(program.span.end <= source.len());
        for statement in &program.body {
            let span = statement.span();
            assert!(span.start <= span.end, "{}", source);
            assert!(span.end <= source.len(), "{}", source);
            assert!(program.span.start <= span.start && span.end <= program.span.end);
        }
    }
}

#[test]
fn token_text_matches_source_slice() {
    let options = ParseOptions {
        tokens: true,
        ..ParseOptions::default()
    };
    for source in SAMPLES {
        let program = parse(source, &options).expect(source);
        let tokens = program.tokens.expect("token list");
        for window in tokens.windows(2) {
            assert!(window[0].end <= window[1].start, "{}", source);
        }
        for token in &tokens {
            assert!(token.start < token.end, "{}", source);
            // The range always slices the raw token text back out.
            let _ = &source[token.start..token.end];
        }
    }
}

#[test]
fn tolerant_mode_reaches_eof_with_errors() {
    let options = ParseOptions {
        tolerant: true,
        ..ParseOptions::default()
    };
    for source in ["1 = 2", "a++ = 3", "x = 010; 'use strict';"] {
        let program = parse(source, &options).expect(source);
        // The tree exists alongside the recorded errors.
        assert!(!program.body.is_empty(), "{}", source);
        assert!(program.errors.is_some(), "{}", source);
    }

    // No errors recorded for valid input.
    let program = parse("x = 1", &options).unwrap();
    assert_eq!(program.errors.unwrap().len(), 0);
}

#[test]
fn literal_round_trips() {
    let program = script("x = [0, 1.5, 0x10, 0b11, 0o17, 1e2, \"a\\tb\", 'c']");
    match first_expression(&program) {
        Expr::Assignment(assignment) => match assignment.right.as_ref() {
            Expr::Array(array) => {
                let expected: &[LiteralValue] = &[
                    LiteralValue::Number(0.0),
                    LiteralValue::Number(1.5),
                    LiteralValue::Number(16.0),
                    LiteralValue::Number(3.0),
                    LiteralValue::Number(15.0),
                    LiteralValue::Number(100.0),
                    LiteralValue::Str("a\tb".to_string()),
                    LiteralValue::Str("c".to_string()),
                ];
                assert_eq!(array.elements.len(), expected.len());
                for (element, want) in array.elements.iter().zip(expected) {
                    match element.as_ref().expect("no holes") {
                        Expr::Literal(literal) => assert_eq!(&literal.value, want),
                        other => panic!("expected literal, got {:?}", other),
                    }
                }
            }
            other => panic!("expected array, got {:?}", other),
        },
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn asi_accepts_and_rejects_where_specified() {
    // Virtual semicolon: before `}`, at a line break, and at EOF.
    assert!(parse_script("{ x = 1 }", &ParseOptions::default()).is_ok());
    assert!(parse_script("x = 1\ny = 2", &ParseOptions::default()).is_ok());
    assert!(parse_script("x = 1", &ParseOptions::default()).is_ok());
    // No insertion point: same line, no brace, not EOF.
    assert!(parse_script("x = 1 y = 2", &ParseOptions::default()).is_err());
}

#[test]
fn directive_prologue_is_recorded() {
    let program = script("'use strict'; foo();");
    match &program.body[0] {
        Stmt::Expression(statement) => {
            assert_eq!(statement.directive.as_deref(), Some("use strict"));
        }
        other => panic!("expected directive, got {:?}", other),
    }
    match &program.body[1] {
        Stmt::Expression(statement) => assert!(statement.directive.is_none()),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn locations_track_lines_and_columns() {
    let options = ParseOptions {
        loc: true,
        ..ParseOptions::default()
    };
    let program = parse("var a;\nvar b;", &options).unwrap();
    assert_eq!(program.body[0].span(), esparse::Span::new(0, 6));
    match &program.body[1] {
        Stmt::Variable(declaration) => {
            assert_eq!(declaration.loc.start.line, 2);
            assert_eq!(declaration.loc.start.column, 0);
        }
        other => panic!("expected declaration, got {:?}", other),
    }
}

#[test]
fn source_name_is_attached_to_locations() {
    let options = ParseOptions {
        loc: true,
        source: Some("demo.js".to_string()),
        ..ParseOptions::default()
    };
    let program = parse("x", &options).unwrap();
    assert_eq!(program.loc.source.as_deref(), Some("demo.js"));
}
