//! Path-based reads and writes into nested arrays and dicts.
//!
//! A path is walked one step at a time. Walking descends while steps remain
//! and the slot holds a container it may enter: an array inside an array, or
//! any container inside a dict. A scalar slot ends the walk early and the
//! remaining steps are ignored.

use std::rc::Rc;

use crate::runtime::{
    error::{ErrorKind, FlexError},
    stack::Stack,
    value::Value,
};

/// Largest number of `Null` slots a single write may add past an array's end.
pub const MAX_ARRAY_PADDING: usize = 1 << 16;

/// Largest position a number converts to exactly (2^53).
const MAX_EXACT_POSITION: f64 = 9_007_199_254_740_992.0;

/// A resolved index: an array position or a dict key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    Position(usize),
    Key(String),
}

impl Index {
    /// Interprets a runtime value as an index.
    ///
    /// Non-negative integral numbers are positions, text is a key. Numbers
    /// too large to be an exact position are rejected.
    pub fn from_value(value: &Value) -> Result<Self, FlexError> {
        match value {
            Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
                if *n > MAX_EXACT_POSITION {
                    return Err(position_out_of_range(&format!("{:e}", n)));
                }
                Ok(Index::Position(*n as usize))
            }
            Value::Text(text) => Ok(Index::Key(text.to_string())),
            other => Err(FlexError::new(
                ErrorKind::InvalidIndex,
                format!("invalid index: {}", other),
            )),
        }
    }

    /// Dict key for this index; positions become their decimal text.
    fn into_key(self) -> String {
        match self {
            Index::Position(position) => position.to_string(),
            Index::Key(key) => key,
        }
    }
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStep {
    Index(Index),
    /// Pops the stack when the step is reached.
    StackTop,
}

impl IndexStep {
    pub fn position(position: usize) -> Self {
        IndexStep::Index(Index::Position(position))
    }

    pub fn key(key: impl Into<String>) -> Self {
        IndexStep::Index(Index::Key(key.into()))
    }

    fn resolve(&self, stack: &mut Stack) -> Result<Index, FlexError> {
        match self {
            IndexStep::Index(index) => Ok(index.clone()),
            IndexStep::StackTop => Index::from_value(&stack.pop()?),
        }
    }
}

pub(crate) fn position_out_of_range(position: &str) -> FlexError {
    FlexError::new(
        ErrorKind::InvalidIndex,
        format!("invalid index: position `{}' is out of range", position),
    )
}

fn not_indexable(value: &Value) -> FlexError {
    FlexError::new(
        ErrorKind::ShapeMismatch,
        format!("cannot index into {}", value.type_name()),
    )
}

fn key_on_array(key: &str) -> FlexError {
    FlexError::new(
        ErrorKind::ShapeMismatch,
        format!("expected array position, got dict key `{}'", key),
    )
}

fn dict_in_array() -> FlexError {
    FlexError::new(
        ErrorKind::ShapeMismatch,
        "expected array element to be an array, found dict",
    )
}

fn lookup<'a>(container: &'a Value, index: &Index) -> Result<Option<&'a Value>, FlexError> {
    match (container, index) {
        (Value::Array(items), Index::Position(position)) => Ok(items.get(*position)),
        (Value::Array(_), Index::Key(key)) => Err(key_on_array(key)),
        (Value::Dict(entries), Index::Position(position)) => {
            Ok(entries.get(&position.to_string()))
        }
        (Value::Dict(entries), Index::Key(key)) => Ok(entries.get(key)),
        (other, _) => Err(not_indexable(other)),
    }
}

/// Whether walking continues from `container` into `slot`.
fn descends(container: &Value, slot: &Value) -> Result<bool, FlexError> {
    match (container, slot) {
        (Value::Array(_), Value::Array(_)) => Ok(true),
        (Value::Array(_), Value::Dict(_)) => Err(dict_in_array()),
        (Value::Dict(_), Value::Array(_) | Value::Dict(_)) => Ok(true),
        _ => Ok(false),
    }
}

/// Reads the slot `path` designates inside `container`.
///
/// Returns `None` when the slot does not exist. `&0` steps pop `stack` as
/// they are reached.
pub fn get(
    container: &Value,
    path: &[IndexStep],
    stack: &mut Stack,
) -> Result<Option<Value>, FlexError> {
    if !matches!(container, Value::Array(_) | Value::Dict(_)) {
        return Err(not_indexable(container));
    }

    let mut current = container;
    for (i, step) in path.iter().enumerate() {
        let index = step.resolve(stack)?;
        let last = i + 1 == path.len();
        match lookup(current, &index)? {
            Some(slot) if !last && descends(current, slot)? => current = slot,
            Some(slot) => return Ok(Some(slot.clone())),
            None => return Ok(None),
        }
    }
    Ok(Some(current.clone()))
}

/// Writes `value` into the slot `path` designates inside `container`.
///
/// Arrays written past their end are padded with `Null`, at most
/// [`MAX_ARRAY_PADDING`] slots per write; dict keys are
/// created as needed. Shared containers along the path are copied first, so
/// other holders of the same value never observe the write.
pub fn set(
    container: &mut Value,
    value: Value,
    path: &[IndexStep],
    stack: &mut Stack,
) -> Result<(), FlexError> {
    let Some((step, rest)) = path.split_first() else {
        *container = value;
        return Ok(());
    };
    let index = step.resolve(stack)?;

    match container {
        Value::Array(items) => {
            let position = match index {
                Index::Position(position) => position,
                Index::Key(key) => return Err(key_on_array(&key)),
            };
            let items = Rc::make_mut(items);
            if !rest.is_empty()
                && let Some(slot) = items.get_mut(position)
            {
                match slot {
                    Value::Array(_) => return set(slot, value, rest, stack),
                    Value::Dict(_) => return Err(dict_in_array()),
                    _ => {}
                }
            }
            if position >= items.len() {
                let new_len = position
                    .checked_add(1)
                    .filter(|len| len - items.len() <= MAX_ARRAY_PADDING)
                    .ok_or_else(|| position_out_of_range(&position.to_string()))?;
                items.resize(new_len, Value::Null);
            }
            items[position] = value;
            Ok(())
        }
        Value::Dict(entries) => {
            let key = index.into_key();
            let entries = Rc::make_mut(entries);
            if !rest.is_empty()
                && let Some(slot) = entries.get_mut(&key)
                && matches!(slot, Value::Array(_) | Value::Dict(_))
            {
                return set(slot, value, rest, stack);
            }
            entries.insert(key, value);
            Ok(())
        }
        other => Err(not_indexable(other)),
    }
}
