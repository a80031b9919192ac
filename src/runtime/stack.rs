use crate::runtime::{error::FlexError, value::Value};

/// LIFO value stack of a context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Removes and returns the most recently pushed value.
    #[inline]
    pub fn pop(&mut self) -> Result<Value, FlexError> {
        self.values.pop().ok_or_else(FlexError::stack_underflow)
    }

    pub fn flush(&mut self) {
        self.values.clear();
    }

    /// Bottom-to-top view of the current contents.
    pub fn snapshot(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
