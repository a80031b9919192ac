use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{
    runtime::native_function::NativeFunction,
    syntax::{literal::Literal, program::Program, shape::Shape},
};

/// Runtime value living on the stack, in variables and inside containers.
///
/// Containers are `Rc`-shared and copied on write (see [`Rc::make_mut`]), so
/// FLEX values behave as plain values: storing an array in two variables and
/// mutating one never changes the other. Values form trees, never cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// FLEX's own null, distinct from an absent value.
    Null,
    Boolean(bool),
    Number(f64),
    /// UTF-8 text.
    Text(Rc<str>),
    /// Ordered collection of values.
    Array(Rc<Vec<Value>>),
    /// String-keyed map, ordered by key.
    Dict(Rc<BTreeMap<String, Value>>),
    /// Callable program or host capability.
    Function(FunctionBody),
}

/// What runs when a function value or a named function is called.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Native(NativeFunction),
    Program(Program),
}

impl Value {
    pub fn text(text: impl Into<Rc<str>>) -> Self {
        Value::Text(text.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn dict(entries: BTreeMap<String, Value>) -> Self {
        Value::Dict(Rc::new(entries))
    }

    /// Returns the canonical runtime type label used in error messages.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Array(_) => "Array",
            Value::Dict(_) => "Dict",
            Value::Function(_) => "Function",
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Null => Shape::NullValue,
            Value::Boolean(_) => Shape::Boolean,
            Value::Number(_) => Shape::Number,
            Value::Text(_) => Shape::String,
            Value::Array(_) => Shape::Array,
            Value::Dict(_) => Shape::Dict,
            Value::Function(_) => Shape::Function,
        }
    }

    /// Text printed by `#put` and `stack-dump`.
    ///
    /// Text is written raw; composites are serialized as JSON.
    pub fn to_output_string(&self) -> String {
        match self {
            Value::Text(text) => text.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Array(_) | Value::Dict(_) | Value::Function(_) => {
                // Serializing a Value cannot fail: keys are strings and
                // non-finite numbers are written as null.
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// The literal form that would rebuild this value as an instruction.
    pub fn to_literal(&self) -> Literal {
        match self {
            Value::Null => Literal::Null,
            Value::Boolean(b) => Literal::Bool(*b),
            Value::Number(n) => number_literal(*n),
            Value::Text(text) => Literal::Array(vec![Literal::String(text.to_string())]),
            Value::Array(items) => {
                let mut tagged = serde_json::Map::new();
                tagged.insert(
                    "@".to_string(),
                    Literal::Array(items.iter().map(Value::to_literal).collect()),
                );
                Literal::Object(tagged)
            }
            Value::Dict(entries) => {
                let inner = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_literal()))
                    .collect();
                let mut tagged = serde_json::Map::new();
                tagged.insert("!".to_string(), Literal::Object(inner));
                Literal::Object(tagged)
            }
            Value::Function(FunctionBody::Program(program)) => program.to_literal(),
            Value::Function(FunctionBody::Native(native)) => {
                Literal::String(native.name.to_string())
            }
        }
    }
}

/// Formats a number the way FLEX prints it: integral values lose the
/// trailing `.0`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub(crate) fn number_literal(n: f64) -> Literal {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        Literal::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Literal::Number)
            .unwrap_or(Literal::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => number_literal(*n).serialize(serializer),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Function(FunctionBody::Program(program)) => {
                program.to_literal().serialize(serializer)
            }
            Value::Function(FunctionBody::Native(native)) => {
                serializer.serialize_str(&format!("<native {}>", native.name))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(text) => write!(f, "\"{}\"", text),
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Dict(entries) => {
                let items: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Value::Function(FunctionBody::Program(program)) => {
                write!(f, "<program/{}>", program.len())
            }
            Value::Function(FunctionBody::Native(native)) => write!(f, "<native {}>", native.name),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.into())
    }
}
