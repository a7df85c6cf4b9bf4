use pretty_assertions::assert_eq;
use crate::interpreter::object::ObjectType;
use super::*;

fn eval_with_output(source: &str) -> (Object, String) {
    let (program, errors) = crate::interpreter::parse(source);
    assert_eq!(Vec::<String>::new(), errors, "unexpected parse errors for {:?}", source);

    let env = Environment::new_global();
    let mut evaluator = Evaluator::new(Vec::new());
    let result = evaluator.evaluate_program(&program, &env);

    (result, String::from_utf8(evaluator.into_output()).expect("output is utf-8"))
}

fn eval(source: &str) -> Object {
    eval_with_output(source).0
}

fn eval_error(source: &str) -> String {
    match eval(source) {
        Object::Error(err) => err.to_string(),
        other => panic!("expected error for {:?}, got {:?}", source, other),
    }
}

fn assert_evals(cases: &[(&str, Object)]) {
    for (source, expected) in cases {
        assert_eq!(*expected, eval(source), "evaluating {:?}", source);
    }
}

mod expressions {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_integer_arithmetic() {
        assert_evals(&[
            ("5", Object::Integer(5)),
            ("-10", Object::Integer(-10)),
            ("--5", Object::Integer(5)),
            ("5 + 5 + 5 + 5 - 10", Object::Integer(10)),
            ("2 * 2 * 2 * 2 * 2", Object::Integer(32)),
            ("-50 + 100 + -50", Object::Integer(0)),
            ("5 * 2 + 10", Object::Integer(20)),
            ("5 + 2 * 10", Object::Integer(25)),
            ("50 / 2 * 2 + 10", Object::Integer(60)),
            ("2 * (5 + 10)", Object::Integer(30)),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::Integer(50)),
            ("7 / 2", Object::Integer(3)),
            ("-7 / 2", Object::Integer(-3)),
        ]);
    }

    #[test]
    pub fn test_integer_arithmetic_wraps() {
        assert_evals(&[
            ("9223372036854775807 + 1", Object::Integer(i64::MIN)),
            ("-9223372036854775807 - 2", Object::Integer(i64::MAX)),
        ]);
    }

    #[test]
    pub fn test_boolean_expressions() {
        assert_evals(&[
            ("true", Object::TRUE),
            ("1 < 2", Object::TRUE),
            ("1 > 2", Object::FALSE),
            ("1 == 1", Object::TRUE),
            ("1 != 1", Object::FALSE),
            ("true == true", Object::TRUE),
            ("true != false", Object::TRUE),
            ("(1 < 2) == true", Object::TRUE),
            ("(1 > 2) == true", Object::FALSE),
            ("\"a\" == \"a\"", Object::TRUE),
            ("\"a\" != \"b\"", Object::TRUE),
            ("[1, 2] == [1, 2]", Object::TRUE),
        ]);
    }

    #[test]
    pub fn test_bang_operator() {
        assert_evals(&[
            ("!true", Object::FALSE),
            ("!false", Object::TRUE),
            ("!5", Object::FALSE),
            ("!!true", Object::TRUE),
            ("!!5", Object::TRUE),
            ("!\"\"", Object::FALSE),
        ]);
    }

    #[test]
    pub fn test_if_else() {
        assert_evals(&[
            ("if (true) { 10 }", Object::Integer(10)),
            ("if (false) { 10 }", Object::NULL),
            ("if (1) { 10 }", Object::Integer(10)),
            ("if (1 < 2) { 10 }", Object::Integer(10)),
            ("if (1 > 2) { 10 }", Object::NULL),
            ("if (1 > 2) { 10 } else { 20 }", Object::Integer(20)),
            ("if (1 < 2) { 10 } else { 20 }", Object::Integer(10)),
            ("if (1 < 2) { }", Object::NULL),
        ]);
    }

    #[test]
    pub fn test_string_concatenation() {
        assert_evals(&[
            ("\"Hello\" + \" \" + \"World!\"", Object::string("Hello World!")),
            ("\"answer: \" + 42", Object::string("answer: 42")),
            ("\"flag: \" + true", Object::string("flag: true")),
        ]);
    }

    #[test]
    pub fn test_array_literals_and_index() {
        assert_evals(&[
            ("[1, 2 * 2, 3 + 3]", Object::array(vec![Object::Integer(1), Object::Integer(4), Object::Integer(6)])),
            ("[1, 2, 3][0]", Object::Integer(1)),
            ("[1, 2, 3][1 + 1]", Object::Integer(3)),
            ("let i = 0; [1][i];", Object::Integer(1)),
            ("let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];", Object::Integer(6)),
            ("[1, 2, 3][3]", Object::NULL),
            ("[1, 2, 3][-1]", Object::NULL),
        ]);
    }

    #[test]
    pub fn test_hash_literals_and_index() {
        let result = eval(r#"let two = "two";
            {
                "one": 10 - 9,
                two: 1 + 1,
                "thr" + "ee": 6 / 2,
                4: 4,
                true: 5,
                false: 6
            }"#);

        let expected = [
            (Object::string("one"), 1),
            (Object::string("two"), 2),
            (Object::string("three"), 3),
            (Object::Integer(4), 4),
            (Object::TRUE, 5),
            (Object::FALSE, 6),
        ];

        match result {
            Object::Hash(hash) => {
                assert_eq!(expected.len(), hash.pairs.len());

                for (key, value) in expected {
                    let hash_key = key.hash_key().expect("hashable key");
                    assert_eq!(Some(&Object::Integer(value)), hash.get(&hash_key), "value for {}", key);
                }
            },
            other => panic!("expected hash, got {:?}", other),
        }

        assert_evals(&[
            ("{\"foo\": 5}[\"foo\"]", Object::Integer(5)),
            ("{\"foo\": 5}[\"bar\"]", Object::NULL),
            ("let key = \"foo\"; {\"foo\": 5}[key]", Object::Integer(5)),
            ("{}[\"foo\"]", Object::NULL),
            ("{5: 5}[5]", Object::Integer(5)),
            ("{true: 5}[true]", Object::Integer(5)),
        ]);
    }

    #[test]
    pub fn test_hash_duplicate_keys_keep_last_value() {
        assert_eq!(Object::Integer(2), eval("{\"a\": 1, \"a\": 2}[\"a\"]"));
        assert_eq!("{a: 2, b: 3}", eval("{\"a\": 1, \"b\": 3, \"a\": 2}").inspect());
    }
}

mod statements {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_let_statements() {
        assert_evals(&[
            ("let a = 5; a;", Object::Integer(5)),
            ("let a = 5 * 5; a;", Object::Integer(25)),
            ("let a = 5; let b = a; b;", Object::Integer(5)),
            ("let a = 5; let b = a; let c = a + b + 5; c;", Object::Integer(15)),
            ("let a = 5;", Object::Integer(5)),
        ]);
    }

    #[test]
    pub fn test_return_statements() {
        assert_evals(&[
            ("return 10;", Object::Integer(10)),
            ("return 10; 9;", Object::Integer(10)),
            ("return 2 * 5; 9;", Object::Integer(10)),
            ("9; return 2 * 5; 9;", Object::Integer(10)),
            ("return;", Object::NULL),
            ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", Object::Integer(10)),
            ("let f = fn(x) { return x; x + 10; }; f(10);", Object::Integer(10)),
            ("let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);", Object::Integer(20)),
        ]);
    }

    #[test]
    pub fn test_empty_program_is_null() {
        assert_eq!(Object::NULL, eval(""));
    }

    #[test]
    pub fn test_evaluate_keeps_return_wrapper() {
        let (program, _) = crate::interpreter::parse("return 1 + 2;");
        let env = Environment::new_global();
        let mut evaluator = Evaluator::new(Vec::new());

        assert_eq!(Object::Return(Box::new(Object::Integer(3))),
            evaluator.evaluate(Node::Stmt(&program.statements[0]), &env));
        assert_eq!(Object::Integer(3), evaluator.evaluate(Node::Program(&program), &env));
    }

    #[test]
    pub fn test_bindings_persist_across_programs() {
        let env = Environment::new_global();
        let mut evaluator = Evaluator::new(Vec::new());

        for (source, expected) in [("let x = 2;", Object::Integer(2)), ("let y = x * 3;", Object::Integer(6)), ("x + y", Object::Integer(8))] {
            let (program, _) = crate::interpreter::parse(source);
            assert_eq!(expected, evaluator.evaluate_program(&program, &env));
        }
    }
}

mod functions {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_function_object() {
        match eval("fn(x) { x + 2; };") {
            Object::Function(function) => {
                assert_eq!(vec!["x"], function.literal.params.iter().map(|param| param.name()).collect::<Vec<_>>());
                assert_eq!("{ (x + 2) }", function.literal.body.to_string());
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    pub fn test_function_application() {
        assert_evals(&[
            ("let identity = fn(x) { x; }; identity(5);", Object::Integer(5)),
            ("let identity = fn(x) { return x; }; identity(5);", Object::Integer(5)),
            ("let double = fn(x) { x * 2; }; double(5);", Object::Integer(10)),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", Object::Integer(10)),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", Object::Integer(20)),
            ("fn(x) { x; }(5)", Object::Integer(5)),
            ("fn() { }()", Object::NULL),
        ]);
    }

    #[test]
    pub fn test_closures() {
        assert_evals(&[
            ("let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(2);", Object::Integer(4)),
            ("let x = 1; let f = fn() { x }; let x = 2; f()", Object::Integer(2)),
        ]);
    }

    #[test]
    pub fn test_recursion() {
        let source = "let fib = fn(n) { if (n < 2) { return n; } fib(n - 1) + fib(n - 2) }; fib(15);";
        assert_eq!(Object::Integer(610), eval(source));
    }

    #[test]
    pub fn test_let_in_function_does_not_leak() {
        assert_evals(&[
            ("let x = 1; let f = fn() { let x = 2; x }; f() + x", Object::Integer(3)),
            ("let f = fn(a) { a }; f(1); a", Object::Error(RuntimeError::IdentifierNotFound(String::from("a")))),
        ]);
    }

    #[test]
    pub fn test_higher_order_builtins() {
        let source = r#"
            let map = fn(arr, f) {
                let iter = fn(arr, accumulated) {
                    if (len(arr) == 0) {
                        accumulated
                    } else {
                        iter(rest(arr), push(accumulated, f(first(arr))));
                    }
                };
                iter(arr, []);
            };
            let a = [1, 2, 3, 4];
            let double = fn(x) { x * 2 };
            map(a, double);
        "#;

        assert_eq!("[2, 4, 6, 8]", eval(source).inspect());
    }

    #[test]
    pub fn test_push_does_not_mutate() {
        assert_evals(&[
            ("let a = [1]; let b = push(a, 2); a", Object::array(vec![Object::Integer(1)])),
            ("let a = [1]; let b = push(a, 2); b", Object::array(vec![Object::Integer(1), Object::Integer(2)])),
        ]);
    }

    #[test]
    pub fn test_builtins_are_shadowable() {
        assert_eq!(Object::Integer(7), eval("let len = fn(x) { 7 }; len([1, 2])"));
        assert_eq!(Object::Integer(3), eval("len(\"abc\")"));
        assert_eq!("builtin function len", eval("len").inspect());
    }

    #[test]
    pub fn test_puts_writes_to_output() {
        let (result, output) = eval_with_output("puts(\"hello\", 1 + 2); puts([1, true]);");

        assert_eq!(Object::NULL, result);
        assert_eq!("hello\n3\n[1, true]\n", output);
    }
}

mod errors {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_error_messages() {
        let cases = [
            ("5 + true;", "type mismatch: Integer + Boolean"),
            ("5 + true; 5;", "type mismatch: Integer + Boolean"),
            ("-true", "unknown operator: -Boolean"),
            ("-\"a\"", "unknown operator: -String"),
            ("true + false;", "unknown operator: Boolean + Boolean"),
            ("5; true + false; 5", "unknown operator: Boolean + Boolean"),
            ("if (10 > 1) { true + false; }", "unknown operator: Boolean + Boolean"),
            ("if (10 > 1) { if (10 > 1) { return true + false; } return 1; }", "unknown operator: Boolean + Boolean"),
            ("\"Hello\" - \"World\"", "unknown operator: String - String"),
            ("\"a\" + [1]", "unknown operator: String + Array"),
            ("foobar", "identifier not found: foobar"),
            ("{\"name\": \"Monkey\"}[fn(x) { x }];", "unusable as hash key: Function"),
            ("{[1]: 2}", "unusable as hash key: Array"),
            ("1[0]", "index operator not supported: Integer"),
            ("[1, 2][\"a\"]", "index operator not supported: Array"),
            ("5(1)", "not a function: Integer"),
            ("10 / 0", "division by zero"),
            ("fn(x) { x }(1, 2)", "wrong number of arguments. got=2, wanted=1"),
            ("len(1)", "argument to `len` not supported, got Integer"),
            ("len(\"one\", \"two\")", "wrong number of arguments. got=2, wanted=1"),
            ("first(1)", "argument to `first` must be Array, got Integer"),
        ];

        for (source, expected) in cases {
            assert_eq!(expected, eval_error(source), "evaluating {:?}", source);
        }
    }

    #[test]
    pub fn test_error_stops_evaluation() {
        let (result, output) = eval_with_output("puts(1); missing; puts(2);");

        assert_eq!(Object::Error(RuntimeError::IdentifierNotFound(String::from("missing"))), result);
        assert_eq!("1\n", output);
    }

    #[test]
    pub fn test_error_in_argument_skips_call() {
        let (result, output) = eval_with_output("puts(1, 2 + true, 3)");

        assert_eq!(Object::Error(RuntimeError::TypeMismatch {
            left: ObjectType::Integer,
            operator: String::from("+"),
            right: ObjectType::Boolean,
        }), result);
        assert_eq!("", output);
    }

    #[test]
    pub fn test_error_escapes_functions() {
        assert_eq!("identifier not found: y", eval_error("let f = fn(x) { let a = y; a }; let b = f(1); 10"));
    }
}
