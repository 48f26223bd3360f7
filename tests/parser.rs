#[cfg(test)]
mod parser_tests {
    use heartlisp::ast::{Expr, Lambda};
    use heartlisp::ast_printer::Ast;
    use heartlisp::error::LangError;
    use heartlisp::parser::Parser;
    use heartlisp::scanner::{stream_tokens, tokenize, Scanner};

    fn parse(source: &str) -> Vec<Expr> {
        match Parser::new(tokenize(source)).parse() {
            Ok(forms) => forms,
            Err(e) => panic!("failed to parse {:?}: {}", source, e),
        }
    }

    fn parse_one(source: &str) -> Expr {
        let mut forms: Vec<Expr> = parse(source);
        assert_eq!(forms.len(), 1, "expected one form in {:?}", source);
        forms.remove(0)
    }

    fn parse_err(source: &str) -> LangError {
        match Parser::new(tokenize(source)).parse() {
            Ok(forms) => panic!("expected {:?} to fail, got {:?}", source, forms),
            Err(e) => e,
        }
    }

    fn ident(name: &str) -> Expr {
        Expr::IdentLiteral(name.to_string())
    }

    #[test]
    fn test_atoms() {
        assert_eq!(parse_one("42"), Expr::IntLiteral(42));
        assert_eq!(parse_one("-7"), Expr::IntLiteral(-7));
        assert_eq!(parse_one("2.5"), Expr::FloatLiteral(2.5));
        assert_eq!(parse_one("true"), Expr::BoolLiteral(true));
        assert_eq!(parse_one("false"), Expr::BoolLiteral(false));
        assert_eq!(parse_one("nil"), Expr::NilLiteral);
        assert_eq!(parse_one("foo"), ident("foo"));
        assert_eq!(
            parse_one(r#""a\n\"b\"""#),
            Expr::StringLiteral("a\n\"b\"".to_string())
        );
    }

    #[test]
    fn test_function_definition_uses_heart() {
        assert_eq!(
            parse_one("(<3 add [a b] (+ a b))"),
            Expr::FunctionDefinition {
                name: "add".to_string(),
                function: Lambda::new(
                    vec!["a".to_string(), "b".to_string()],
                    Expr::NamedCall {
                        function: "+".to_string(),
                        arguments: vec![ident("a"), ident("b")],
                    },
                ),
            }
        );
    }

    #[test]
    fn test_class_definition() {
        assert_eq!(
            parse_one("(class Point [x y])"),
            Expr::ClassDefinition {
                name: "Point".to_string(),
                fields: vec!["x".to_string(), "y".to_string()],
            }
        );
    }

    #[test]
    fn test_if_without_else_defaults_to_nil() {
        assert_eq!(
            parse_one("(if c 1)"),
            Expr::IfFlow {
                condition: Box::new(ident("c")),
                then_branch: Box::new(Expr::IntLiteral(1)),
                else_branch: Box::new(Expr::NilLiteral),
            }
        );
    }

    #[test]
    fn test_let_and_lambda() {
        assert_eq!(
            parse_one("(let f (fn [x] x) (f 1))"),
            Expr::VariableDefinition {
                ident: "f".to_string(),
                value: Box::new(Expr::LambdaLiteral(Lambda::new(
                    vec!["x".to_string()],
                    ident("x")
                ))),
                body: Box::new(Expr::NamedCall {
                    function: "f".to_string(),
                    arguments: vec![Expr::IntLiteral(1)],
                }),
            }
        );
    }

    #[test]
    fn test_call_with_expression_head() {
        assert_eq!(
            parse_one("((fn [] 1))"),
            Expr::Call {
                function: Box::new(Expr::LambdaLiteral(Lambda::new(
                    vec![],
                    Expr::IntLiteral(1)
                ))),
                arguments: vec![],
            }
        );
    }

    #[test]
    fn test_flow_forms_and_arrays() {
        assert_eq!(
            parse_one("(do (or a b) (and) [1 [2]])"),
            Expr::DoFlow(vec![
                Expr::OrFlow(vec![ident("a"), ident("b")]),
                Expr::AndFlow(vec![]),
                Expr::ArrayLiteral(vec![
                    Expr::IntLiteral(1),
                    Expr::ArrayLiteral(vec![Expr::IntLiteral(2)]),
                ]),
            ])
        );
    }

    #[test]
    fn test_braces_become_unsupported_nodes() {
        assert!(matches!(
            parse_one("{a {b} c}"),
            Expr::Unsupported { form } if form == "{ a { b } c }"
        ));
    }

    #[test]
    fn test_multiple_top_level_forms() {
        assert_eq!(parse("(class A []) 1 \"s\"").len(), 3);
        assert!(parse("   \n ").is_empty());
    }

    #[test]
    fn test_parser_accepts_any_token_source() {
        let source = "(<3 id [x] x) (id 5)";
        let expected: Vec<Expr> = parse(source);

        let from_scanner: Vec<Expr> = Parser::new(Scanner::new(source)).parse().unwrap();
        assert_eq!(from_scanner, expected);

        let streamed: Vec<Expr> =
            stream_tokens(source, 2, |rx| Parser::new(rx.iter()).parse()).unwrap();
        assert_eq!(streamed, expected);
    }

    #[test]
    fn test_parse_errors() {
        for source in [
            "(",
            ")",
            "()",
            "(+ 1",
            "[1 2",
            "{",
            "(<3 [x] x)",
            "(<3 f x x)",
            "(class [x])",
            "(let 1 2 3)",
            "(if)",
            "(fn [1] x)",
            "\"open",
            "if",
            "<3",
            "99999999999999999999",
        ] {
            assert!(
                matches!(parse_err(source), LangError::Parse { .. }),
                "{:?} should be a parse error",
                source
            );
        }
    }

    #[test]
    fn test_printer_output_reparses_to_same_tree() {
        let printer = Ast;

        for source in [
            "(<3 fact [n] (if (< n 2) 1 (* n (fact (- n 1)))))",
            "(class Point [x y])",
            "(let s \"tab\\there \\\"q\\\"\" (do (print s) [1 2.0 -3.5 nil true]))",
            "((fn [a] (or a (and false a))) 1)",
            "(if x y)",
        ] {
            let tree: Expr = parse_one(source);
            let printed: String = printer.print(&tree);
            assert_eq!(parse_one(&printed), tree, "printed as {}", printed);
        }
    }
}
