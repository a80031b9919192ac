//! Builds runtime values out of structured literals.
//!
//! Strings inside array and dict literals are push expressions, resolved
//! against the context at the moment the literal is reached.

use std::collections::BTreeMap;

use crate::{
    runtime::{
        context::Context,
        error::{ErrorKind, FlexError},
        value::{FunctionBody, Value},
    },
    syntax::{
        grammar::{Path, parse_push},
        literal::{self, ARRAY_TAG, DICT_TAG, Literal},
        program::Program,
        shape::{Shape, classify},
    },
};

use super::expr_ops::{execute_push, resolve_push};

fn unknown_type(literal: &Literal) -> FlexError {
    FlexError::new(
        ErrorKind::UnknownType,
        format!("Unknown type: `{}'", literal::render(literal)),
    )
}

fn element_path(text: &str) -> Result<Path, FlexError> {
    parse_push(text).ok_or_else(|| {
        FlexError::new(
            ErrorKind::MalformedInstruction,
            format!("Expected push expression-like syntax: `{}'", text),
        )
    })
}

/// Converts a literal into a value.
pub(crate) fn materialize(ctx: &mut Context, literal: &Literal) -> Result<Value, FlexError> {
    match (classify(literal), literal) {
        (Shape::JsNull, _) => Ok(Value::Null),
        (Shape::Boolean, Literal::Bool(b)) => Ok(Value::Boolean(*b)),
        (Shape::Number, Literal::Number(n)) => {
            n.as_f64().map(Value::Number).ok_or_else(|| unknown_type(literal))
        }
        (Shape::String, Literal::Array(items)) => match items.as_slice() {
            [Literal::String(text)] => Ok(Value::text(text.as_str())),
            _ => Err(unknown_type(literal)),
        },
        (Shape::Function, _) => Ok(Value::Function(FunctionBody::Program(
            Program::from_literal(literal)?,
        ))),
        (Shape::Array, Literal::Object(map)) => match map.get(ARRAY_TAG) {
            Some(Literal::Array(items)) => materialize_array(ctx, items),
            _ => Err(unknown_type(literal)),
        },
        (Shape::Dict, Literal::Object(map)) => match map.get(DICT_TAG) {
            Some(Literal::Object(entries)) => materialize_dict(ctx, entries),
            _ => Err(unknown_type(literal)),
        },
        _ => Err(unknown_type(literal)),
    }
}

/// String elements are resolved directly; the stack is left untouched.
fn materialize_array(ctx: &mut Context, items: &[Literal]) -> Result<Value, FlexError> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        let value = match item {
            Literal::String(text) => resolve_push(ctx, &element_path(text)?)?,
            other => materialize(ctx, other)?,
        };
        values.push(value);
    }
    Ok(Value::array(values))
}

/// String entries are pushed and then popped back into their slot.
fn materialize_dict(
    ctx: &mut Context,
    entries: &serde_json::Map<String, Literal>,
) -> Result<Value, FlexError> {
    let mut values = BTreeMap::new();
    for (key, item) in entries {
        let value = match item {
            Literal::String(text) => {
                execute_push(ctx, &element_path(text)?)?;
                ctx.stack_mut().pop()?
            }
            other => materialize(ctx, other)?,
        };
        values.insert(key.clone(), value);
    }
    Ok(Value::dict(values))
}
