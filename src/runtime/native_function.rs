use std::fmt;

use crate::runtime::NativeFn;

/// Host capability registered in a context's function table.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        Self { name, func }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
