use std::collections::BTreeMap;

use serde_json::json;

use crate::runtime::{
    context::Context,
    error::ErrorKind,
    eval::materialize::materialize,
    value::{FunctionBody, Value},
};

fn context_with(name: &str, value: Value) -> Context {
    let mut ctx = Context::default();
    ctx.vars_mut().insert(name.to_string(), value);
    ctx
}

#[test]
fn scalars_and_text() {
    let mut ctx = Context::default();
    assert_eq!(materialize(&mut ctx, &json!(null)).unwrap(), Value::Null);
    assert_eq!(materialize(&mut ctx, &json!(2.5)).unwrap(), Value::Number(2.5));
    assert_eq!(
        materialize(&mut ctx, &json!(["hello"])).unwrap(),
        Value::text("hello")
    );
}

#[test]
fn sequences_become_programs() {
    let mut ctx = Context::default();
    let value = materialize(&mut ctx, &json!([1, "#put"])).unwrap();
    match value {
        Value::Function(FunctionBody::Program(program)) => assert_eq!(program.len(), 2),
        other => panic!("expected program, got {:?}", other),
    }
}

#[test]
fn array_literal_resolves_push_expressions() {
    let mut ctx = context_with("x", Value::Number(7.0));

    let value = materialize(&mut ctx, &json!({"@": [1, "$x", ["s"], null]})).unwrap();

    assert_eq!(
        value,
        Value::array(vec![
            Value::Number(1.0),
            Value::Number(7.0),
            Value::text("s"),
            Value::Null,
        ])
    );
    assert!(ctx.stack().is_empty());
}

#[test]
fn dict_literal_resolves_push_expressions() {
    let mut ctx = context_with("x", Value::text("v"));

    let value = materialize(&mut ctx, &json!({"!": {"b": "$x", "a": {"@": []}}})).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("a".to_string(), Value::array(vec![]));
    expected.insert("b".to_string(), Value::text("v"));
    assert_eq!(value, Value::dict(expected));
    assert!(ctx.stack().is_empty());
}

#[test]
fn nested_literals() {
    let mut ctx = Context::default();
    let value = materialize(&mut ctx, &json!({"@": [{"@": [1]}, {"!": {"k": true}}]})).unwrap();

    let mut inner = BTreeMap::new();
    inner.insert("k".to_string(), Value::Boolean(true));
    assert_eq!(
        value,
        Value::array(vec![
            Value::array(vec![Value::Number(1.0)]),
            Value::dict(inner),
        ])
    );
}

#[test]
fn element_strings_must_be_push_expressions() {
    let mut ctx = Context::default();
    let err = materialize(&mut ctx, &json!({"@": ["#put"]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInstruction);

    let err = materialize(&mut ctx, &json!({"!": {"k": "plain"}})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInstruction);
}

#[test]
fn undefined_element_variable() {
    let mut ctx = Context::default();
    let err = materialize(&mut ctx, &json!({"@": ["$missing"]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UndefinedVariable);
}

#[test]
fn unknown_shapes() {
    let mut ctx = Context::default();
    for literal in [json!({"x": 1}), json!({"@": 1}), json!({"!": []}), json!("$x")] {
        let err = materialize(&mut ctx, &literal).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType, "{}", literal);
    }
}

fn letters_with_stack() -> Context {
    let mut ctx = context_with(
        "l",
        Value::array(vec![Value::text("a"), Value::text("b"), Value::text("c")]),
    );
    for n in [9.0, 2.0, 0.0] {
        ctx.stack_mut().push(Value::Number(n));
    }
    ctx
}

#[test]
fn array_elements_pop_stack_indexes_in_order() {
    let mut ctx = letters_with_stack();

    let value = materialize(&mut ctx, &json!({"@": ["$l.&0", "$l.&0"]})).unwrap();

    assert_eq!(value, Value::array(vec![Value::text("a"), Value::text("c")]));
    assert_eq!(ctx.stack().snapshot(), [Value::Number(9.0)]);
}

#[test]
fn dict_entries_pop_stack_indexes_in_order() {
    let mut ctx = letters_with_stack();

    let value = materialize(&mut ctx, &json!({"!": {"first": "$l.&0", "second": "$l.&0"}}))
        .unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("first".to_string(), Value::text("a"));
    expected.insert("second".to_string(), Value::text("c"));
    assert_eq!(value, Value::dict(expected));
    assert_eq!(ctx.stack().snapshot(), [Value::Number(9.0)]);
}

#[test]
fn stack_index_underflow_in_literal() {
    let mut ctx = context_with("l", Value::array(vec![Value::Null]));

    for literal in [json!({"@": ["$l.&0"]}), json!({"!": {"k": "$l.&0"}})] {
        let err = materialize(&mut ctx, &literal).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StackUnderflow);
    }
}
