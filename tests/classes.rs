#[cfg(test)]
mod class_tests {
    use std::rc::Rc;

    use heartlisp::class::ClassInfo;
    use heartlisp::error::LangError;
    use heartlisp::interpreter::Interpreter;
    use heartlisp::value::Value;

    fn run(interpreter: &Interpreter, source: &str) -> Result<Value, LangError> {
        interpreter.run_source(source)
    }

    #[test]
    fn test_point_round_trip() {
        let interpreter = Interpreter::default();
        run(&interpreter, "(class Point [x y])").unwrap();

        let point: Value = run(&interpreter, "(Point 1 2)").unwrap();
        let Value::Instance(instance) = &point else {
            panic!("expected an instance, got {}", point);
        };

        assert_eq!(instance.class().name(), "Point");
        assert_eq!(instance.field("x"), Some(&Value::Int(1)));
        assert_eq!(instance.field("y"), Some(&Value::Int(2)));

        let order: Vec<&str> = instance.fields().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, ["x", "y"]);

        assert_eq!(point.to_string(), "Point{x: 1, y: 2}");
    }

    #[test]
    fn test_constructor_arity() {
        let interpreter = Interpreter::default();
        run(&interpreter, "(class Point [x y])").unwrap();

        for source in ["(Point 1)", "(Point 1 2 3)"] {
            let err = run(&interpreter, source).unwrap_err();
            assert!(
                matches!(err, LangError::Arity { expected: 2, .. }),
                "{} gave {}",
                source,
                err
            );
        }
    }

    #[test]
    fn test_duplicate_fields_fail_at_definition() {
        let interpreter = Interpreter::default();

        let err = run(&interpreter, "(class Bad [a b a])").unwrap_err();
        assert!(matches!(err, LangError::Definition { .. }));
        assert!(err.to_string().contains("'a'"));

        // Nothing was bound.
        assert!(!interpreter.globals().contains("Bad"));
    }

    #[test]
    fn test_constructor_is_a_native_function() {
        let interpreter = Interpreter::default();
        run(&interpreter, "(class Empty [])").unwrap();

        assert!(matches!(
            interpreter.globals().lookup("Empty"),
            Some(Value::NativeFunction(ref native)) if native.name() == "Empty"
        ));
        assert_eq!(run(&interpreter, "(Empty)").unwrap().to_string(), "Empty{}");
    }

    #[test]
    fn test_field_access_and_class_of() {
        let interpreter = Interpreter::default();

        let source = r#"
            (class Pair [left right])
            (let p (Pair "a" [1 2])
              [(get p "left") (get p "right") (class-of p)])
        "#;

        let Value::Array(values) = run(&interpreter, source).unwrap() else {
            panic!("expected an array");
        };

        assert_eq!(values[0], Value::from("a"));
        assert_eq!(values[1], Value::array(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(values[2].to_string(), "<class Pair>");

        let err = run(&interpreter, "(get (Pair 1 2) \"middle\")").unwrap_err();
        assert!(matches!(err, LangError::Native { .. }));
    }

    #[test]
    fn test_instances_compare_structurally_within_a_class() {
        let interpreter = Interpreter::default();

        let source = r#"
            (class V [n])
            (class W [n])
            [(= (V 1) (V 1)) (= (V 1) (V 2)) (= (V 1) (W 1))]
        "#;

        assert_eq!(
            run(&interpreter, source).unwrap(),
            Value::array(vec![Value::Bool(true), Value::Bool(false), Value::Bool(false)])
        );
    }

    #[test]
    fn test_class_info_directly() {
        let class: Rc<ClassInfo> = ClassInfo::new("Pt", vec!["x".into(), "y".into()]).unwrap();
        assert_eq!(class.fields(), ["x".to_string(), "y".to_string()]);

        let instance: Value = class
            .constructor()
            .call(&[Value::Int(3), Value::Float(4.5)])
            .unwrap();
        assert_eq!(instance.to_string(), "Pt{x: 3, y: 4.5}");
        assert_eq!(instance.type_name(), "instance");
        assert!(instance.as_callable().is_none());

        assert!(matches!(
            class.make_instance(&[]),
            Err(LangError::Arity { expected: 2, got: 0, .. })
        ));
        assert!(matches!(
            ClassInfo::new("Dup", vec!["f".into(), "f".into()]),
            Err(LangError::Definition { .. })
        ));
    }
}
