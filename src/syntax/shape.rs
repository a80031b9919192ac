//! Structural classification of literal and runtime data.

use std::fmt;

use serde::Serialize;

use crate::syntax::literal::{ARRAY_TAG, DICT_TAG, Literal};

/// Shape of a datum, decided purely by its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// FLEX's own null (runtime only).
    NullValue,
    /// The decoder's absence marker (`null` in JSON).
    JsNull,
    String,
    Number,
    Boolean,
    Function,
    Array,
    Dict,
    /// Bare text awaiting grammar classification.
    Instr,
    Unknown,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::NullValue => "null-value",
            Shape::JsNull => "js-null",
            Shape::String => "string",
            Shape::Number => "number",
            Shape::Boolean => "boolean",
            Shape::Function => "function",
            Shape::Array => "array",
            Shape::Dict => "dict",
            Shape::Instr => "instr",
            Shape::Unknown => "unknown",
        }
    }

    /// Shapes pushed onto the stack exactly as written.
    pub fn is_scalar_literal(self) -> bool {
        matches!(
            self,
            Shape::Boolean | Shape::Number | Shape::NullValue | Shape::Function
        )
    }

    /// Shapes that must be materialized before they are pushed.
    pub fn is_structured_literal(self) -> bool {
        matches!(
            self,
            Shape::String | Shape::Array | Shape::Dict | Shape::JsNull
        )
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies decoded literal data.
///
/// A one-string sequence is text and any other sequence a program; objects
/// must carry exactly one reserved tag key.
pub fn classify(literal: &Literal) -> Shape {
    match literal {
        Literal::Null => Shape::JsNull,
        Literal::Bool(_) => Shape::Boolean,
        Literal::Number(_) => Shape::Number,
        Literal::String(_) => Shape::Instr,
        Literal::Array(items) => match items.as_slice() {
            [Literal::String(_)] => Shape::String,
            _ => Shape::Function,
        },
        Literal::Object(map) if map.len() == 1 => {
            if map.contains_key(ARRAY_TAG) {
                Shape::Array
            } else if map.contains_key(DICT_TAG) {
                Shape::Dict
            } else {
                Shape::Unknown
            }
        }
        Literal::Object(_) => Shape::Unknown,
    }
}
