//! Edge case tests for esparse-par

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::{Parser, ParserConfig};

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source, ParserConfig::default());
        parser.parse_script().expect(source)
    }

    fn parse_fails(source: &str) -> bool {
        let mut parser = Parser::new(source, ParserConfig::default());
        parser.parse_script().is_err()
    }

    fn first_expression(program: &Program) -> &Expr {
        match &program.body[0] {
            Stmt::Expression(statement) => &statement.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    // ==================== EDGE CASES ====================

    /// EDGE CASE: Empty program
    #[test]
    fn test_edge_empty_program() {
        let program = parse("");
        assert!(program.body.is_empty());
        assert_eq!(program.source_type, SourceType::Script);
    }

    /// EDGE CASE: Whitespace and comments only
    #[test]
    fn test_edge_comments_only() {
        let program = parse("  // nothing here\n/* or here */  ");
        assert!(program.body.is_empty());
    }

    /// EDGE CASE: ASI at end of input
    #[test]
    fn test_edge_asi_at_eof() {
        let program = parse("x = 1");
        assert_eq!(program.body.len(), 1);
    }

    /// EDGE CASE: ASI before a closing brace
    #[test]
    fn test_edge_asi_before_brace() {
        let program = parse("{ a = 1 }");
        assert!(matches!(&program.body[0], Stmt::Block(b) if b.body.len() == 1));
    }

    /// EDGE CASE: ASI on a line break, but not within one statement
    #[test]
    fn test_edge_asi_line_break() {
        let program = parse("a = 1\nb = 2");
        assert_eq!(program.body.len(), 2);
        assert!(parse_fails("a = 1 b = 2"));
    }

    /// EDGE CASE: restricted production - return argument stays on the line
    #[test]
    fn test_edge_return_asi() {
        let program = parse("function f() { return\n42 }");
        match &program.body[0] {
            Stmt::Function(f) => {
                assert!(matches!(&f.body.body[0], Stmt::Return(r) if r.argument.is_none()));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    /// EDGE CASE: postfix update must not cross a line break
    #[test]
    fn test_edge_postfix_asi() {
        // `a\n++\nb` is `a; ++b;` by ASI.
        let program = parse("a\n++\nb");
        assert_eq!(program.body.len(), 2);
    }

    /// EDGE CASE: division after an identifier, regex after an operator
    #[test]
    fn test_edge_regex_vs_division() {
        let program = parse("a/b/g");
        match first_expression(&program) {
            Expr::Binary(outer) => {
                assert_eq!(outer.operator, "/");
                assert!(matches!(outer.left.as_ref(), Expr::Binary(inner) if inner.operator == "/"));
            }
            other => panic!("expected division chain, got {:?}", other),
        }

        let program = parse("x = /b/g");
        match first_expression(&program) {
            Expr::Assignment(assignment) => match assignment.right.as_ref() {
                Expr::Literal(literal) => {
                    let regex = literal.regex.as_ref().expect("regex data");
                    assert_eq!(regex.pattern, "b");
                    assert_eq!(regex.flags, "g");
                }
                other => panic!("expected regex literal, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    /// EDGE CASE: arrow parameters versus parenthesised sequence
    #[test]
    fn test_edge_arrow_vs_sequence() {
        let program = parse("(a, b) => a + b");
        match first_expression(&program) {
            Expr::Arrow(arrow) => {
                assert_eq!(arrow.params.len(), 2);
                assert!(arrow.expression);
                assert!(matches!(arrow.body, ArrowBody::Expr(_)));
            }
            other => panic!("expected arrow function, got {:?}", other),
        }

        let program = parse("(a, b)");
        assert!(matches!(first_expression(&program), Expr::Sequence(_)));
    }

    /// EDGE CASE: arrow with default, rest, and destructured parameters
    #[test]
    fn test_edge_arrow_parameter_forms() {
        let program = parse("(a = 1, [b], {c}, ...rest) => 0");
        match first_expression(&program) {
            Expr::Arrow(arrow) => {
                assert_eq!(arrow.params.len(), 4);
                assert!(matches!(arrow.params[0], Pattern::Assignment(_)));
                assert!(matches!(arrow.params[1], Pattern::Array(_)));
                assert!(matches!(arrow.params[2], Pattern::Object(_)));
                assert!(matches!(arrow.params[3], Pattern::Rest(_)));
            }
            other => panic!("expected arrow function, got {:?}", other),
        }
    }

    /// EDGE CASE: empty parameter list arrow requires the arrow
    #[test]
    fn test_edge_empty_parens() {
        let program = parse("() => 1");
        assert!(matches!(first_expression(&program), Expr::Arrow(_)));
        assert!(parse_fails("()"));
    }

    /// EDGE CASE: shorthand-with-initializer is only valid as a pattern
    #[test]
    fn test_edge_cover_initialized_name() {
        let program = parse("({a = 1} = o)");
        assert!(matches!(first_expression(&program), Expr::Assignment(_)));
        assert!(parse_fails("({a = 1})"));
    }

    /// EDGE CASE: operator precedence and associativity
    #[test]
    fn test_edge_precedence() {
        let program = parse("1 + 2 * 3");
        match first_expression(&program) {
            Expr::Binary(add) => {
                assert_eq!(add.operator, "+");
                assert!(matches!(add.right.as_ref(), Expr::Binary(mul) if mul.operator == "*"));
            }
            other => panic!("expected binary expression, got {:?}", other),
        }

        // Left associative: (1 - 2) - 3
        let program = parse("1 - 2 - 3");
        match first_expression(&program) {
            Expr::Binary(outer) => {
                assert!(matches!(outer.left.as_ref(), Expr::Binary(_)));
                assert!(matches!(outer.right.as_ref(), Expr::Literal(_)));
            }
            other => panic!("expected binary expression, got {:?}", other),
        }

        // Logical operators become logical nodes.
        let program = parse("a && b || c");
        match first_expression(&program) {
            Expr::Logical(or) => {
                assert_eq!(or.operator, "||");
                assert!(matches!(or.left.as_ref(), Expr::Logical(and) if and.operator == "&&"));
            }
            other => panic!("expected logical expression, got {:?}", other),
        }

        // Exponentiation is right associative.
        let program = parse("2 ** 3 ** 2");
        match first_expression(&program) {
            Expr::Binary(outer) => {
                assert_eq!(outer.operator, "**");
                assert!(matches!(outer.right.as_ref(), Expr::Binary(_)));
            }
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    /// EDGE CASE: `in` is disabled inside a for-loop head
    #[test]
    fn test_edge_allow_in() {
        let program = parse("for (var i = 0 in xs) ;");
        assert!(matches!(&program.body[0], Stmt::ForIn(_)));

        let program = parse("for (a in xs) ;");
        assert!(matches!(&program.body[0], Stmt::ForIn(_)));

        let program = parse("x = a in b");
        assert!(matches!(first_expression(&program), Expr::Assignment(_)));
    }

    /// EDGE CASE: for-of takes an assignment expression on the right
    #[test]
    fn test_edge_for_of() {
        let program = parse("for (const x of xs) {}");
        match &program.body[0] {
            Stmt::ForOf(for_of) => {
                assert!(matches!(&for_of.left, ForTarget::Variable(v) if v.kind == DeclarationKind::Const));
            }
            other => panic!("expected for-of, got {:?}", other),
        }
    }

    /// EDGE CASE: strict mode flips on via directive and stays on
    #[test]
    fn test_edge_use_strict_directive() {
        assert!(parse_fails("'use strict'; with (o) {}"));
        // The same statement is fine without the directive.
        let program = parse("with (o) {}");
        assert!(matches!(&program.body[0], Stmt::With(_)));
    }

    /// EDGE CASE: legacy octal is rejected under strict
    #[test]
    fn test_edge_strict_octal() {
        assert!(parse_fails("'use strict'; var x = 010;"));
        let program = parse("var x = 010;");
        match &program.body[0] {
            Stmt::Variable(declaration) => {
                let init = declaration.declarations[0].init.as_ref().unwrap();
                assert!(matches!(init, Expr::Literal(l)
                    if matches!(l.value, LiteralValue::Number(n) if n == 8.0)));
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    /// EDGE CASE: duplicate parameters only error in strict code
    #[test]
    fn test_edge_strict_param_dupe() {
        assert!(parse_fails("'use strict'; function f(a, a) {}"));
        assert!(!parse_fails("function f(a, a) {}"));
        assert!(parse_fails("function f(a, a) { 'use strict'; }"));
    }

    /// EDGE CASE: generators make yield an expression
    #[test]
    fn test_edge_yield() {
        let program = parse("function* g() { yield 1; yield* h(); }");
        match &program.body[0] {
            Stmt::Function(f) => {
                assert!(f.generator);
                assert_eq!(f.body.body.len(), 2);
            }
            other => panic!("expected generator, got {:?}", other),
        }
        // Outside a generator, yield is a plain name in sloppy mode.
        let program = parse("var yield = 1;");
        assert!(matches!(&program.body[0], Stmt::Variable(_)));
        assert!(parse_fails("'use strict'; var yield = 1;"));
    }

    /// EDGE CASE: async functions make await an expression
    #[test]
    fn test_edge_async_await() {
        let program = parse("async function f() { await x; }");
        match &program.body[0] {
            Stmt::Function(f) => {
                assert!(f.is_async);
                match &f.body.body[0] {
                    Stmt::Expression(statement) => {
                        assert!(matches!(statement.expression, Expr::Await(_)));
                    }
                    other => panic!("expected expression statement, got {:?}", other),
                }
            }
            other => panic!("expected async function, got {:?}", other),
        }
        // Outside async code, await is a plain identifier.
        let program = parse("var await = 1;");
        assert!(matches!(&program.body[0], Stmt::Variable(_)));
    }

    /// EDGE CASE: async arrows, both forms
    #[test]
    fn test_edge_async_arrows() {
        let program = parse("async x => x");
        match first_expression(&program) {
            Expr::Arrow(arrow) => assert!(arrow.is_async),
            other => panic!("expected async arrow, got {:?}", other),
        }
        let program = parse("async (a, b) => a");
        match first_expression(&program) {
            Expr::Arrow(arrow) => {
                assert!(arrow.is_async);
                assert_eq!(arrow.params.len(), 2);
            }
            other => panic!("expected async arrow, got {:?}", other),
        }
        // `async` on its own is still an ordinary call head.
        let program = parse("async(a, b)");
        assert!(matches!(first_expression(&program), Expr::Call(_)));
    }

    /// EDGE CASE: classes are strict and allow one constructor
    #[test]
    fn test_edge_class_rules() {
        let program = parse("class A { constructor() {} m() {} static s() {} get x() { return 1; } }");
        match &program.body[0] {
            Stmt::Class(class) => {
                assert_eq!(class.body.body.len(), 4);
                assert_eq!(class.body.body[0].kind, MethodKind::Constructor);
                assert!(class.body.body[2].is_static);
                assert_eq!(class.body.body[3].kind, MethodKind::Get);
            }
            other => panic!("expected class, got {:?}", other),
        }
        assert!(parse_fails("class A { constructor() {} constructor() {} }"));
        assert!(parse_fails("class A { static prototype() {} }"));
    }

    /// EDGE CASE: labels must be declared to be referenced
    #[test]
    fn test_edge_labels() {
        let program = parse("outer: for (;;) { break outer; }");
        assert!(matches!(&program.body[0], Stmt::Labeled(_)));
        assert!(parse_fails("break missing;"));
        assert!(parse_fails("for (;;) { continue missing; }"));
        assert!(parse_fails("continue;"));
    }

    /// EDGE CASE: new.target only inside a function body
    #[test]
    fn test_edge_new_target() {
        let program = parse("function f() { return new.target; }");
        assert!(matches!(&program.body[0], Stmt::Function(_)));
        assert!(parse_fails("new.target"));
    }

    /// EDGE CASE: template literals nest through the curly stack
    #[test]
    fn test_edge_nested_templates() {
        let program = parse("tag`a${ `b${c}` }d`");
        assert!(matches!(first_expression(&program), Expr::TaggedTemplate(_)));
    }

    /// EDGE CASE: trailing commas in calls and arrays
    #[test]
    fn test_edge_trailing_commas() {
        let program = parse("f(a, b)");
        assert!(matches!(first_expression(&program), Expr::Call(_)));
        let program = parse("[1, 2, , ]");
        match first_expression(&program) {
            Expr::Array(array) => assert_eq!(array.elements.len(), 3),
            other => panic!("expected array, got {:?}", other),
        }
    }

    /// EDGE CASE: module-only syntax fails in scripts
    #[test]
    fn test_edge_module_syntax_in_script() {
        assert!(parse_fails("import x from \"m\";"));
        assert!(parse_fails("export default 1;"));
    }

    /// EDGE CASE: modules parse imports and exports
    #[test]
    fn test_edge_module_declarations() {
        let source = "import d, { a as b } from \"m\"; export { b }; export default d;";
        let mut parser = Parser::new(source, ParserConfig::default());
        let program = parser.parse_module().expect(source);
        assert_eq!(program.source_type, SourceType::Module);
        assert_eq!(program.body.len(), 3);
        assert!(matches!(&program.body[0], Stmt::Import(i) if i.specifiers.len() == 2));
    }

    /// EDGE CASE: duplicate exports are rejected
    #[test]
    fn test_edge_duplicate_export() {
        let source = "var a = 1; export { a }; export { a };";
        let mut parser = Parser::new(source, ParserConfig::default());
        assert!(parser.parse_module().is_err());
    }

    /// EDGE CASE: tolerant mode records and keeps going
    #[test]
    fn test_edge_tolerant_mode() {
        let config = ParserConfig {
            tolerant: true,
            ..ParserConfig::default()
        };
        let mut parser = Parser::new("1 = 2", config);
        let program = parser.parse_script().expect("tolerant parse");
        let errors = program.errors.expect("error list");
        assert!(!errors.is_empty());
        assert_eq!(errors[0].description, "Invalid left-hand side in assignment");
    }

    /// EDGE CASE: node ranges nest within their parents
    #[test]
    fn test_edge_ranges_nest() {
        let source = "var answer = 6 * 7;";
        let program = parse(source);
        assert_eq!(program.span.start, 0);
        assert_eq!(program.span.end, source.len());
        match &program.body[0] {
            Stmt::Variable(declaration) => {
                let declarator = &declaration.declarations[0];
                assert!(declaration.span.start <= declarator.span.start);
                assert!(declarator.span.end <= declaration.span.end);
                assert_eq!(&source[declarator.id.span().start..declarator.id.span().end], "answer");
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    /// EDGE CASE: token collection captures every token in order
    #[test]
    fn test_edge_token_collection() {
        let config = ParserConfig {
            tokens: true,
            ..ParserConfig::default()
        };
        let mut parser = Parser::new("a + b", config);
        let program = parser.parse_script().unwrap();
        let tokens = program.tokens.expect("token list");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.windows(2).all(|w| w[0].end <= w[1].start));
    }
}
