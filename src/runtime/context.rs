//! Interpreter state of one session and its admission check.

use std::collections::HashMap;

use crate::{
    runtime::{
        error::{ErrorKind, FlexError},
        natives,
        stack::Stack,
        value::{FunctionBody, Value},
    },
    syntax::grammar::is_name,
};

pub type Vars = HashMap<String, Value>;
pub type Functions = HashMap<String, FunctionBody>;

/// Name of the function slot memoizing the first evaluated program.
pub const MAIN_FUNCTION: &str = "main";

/// Stack, variables and function table of one evaluation session.
///
/// A context is owned by the host and lent out by exclusive reference to the
/// evaluator and to native functions; it is never cloned or shared.
#[derive(Debug, Default)]
pub struct Context {
    stack: Stack,
    vars: Vars,
    functions: Functions,
}

impl Context {
    /// Builds a validated context from its three components.
    pub fn new(stack: Stack, vars: Vars, functions: Functions) -> Result<Self, FlexError> {
        let context = Self {
            stack,
            vars,
            functions,
        };
        validate(&context)?;
        Ok(context)
    }

    /// An empty context preloaded with the host natives.
    pub fn with_natives() -> Self {
        let functions = natives::NATIVES
            .iter()
            .map(|native| (native.name.to_string(), FunctionBody::Native(*native)))
            .collect();
        Self {
            stack: Stack::new(),
            vars: Vars::new(),
            functions,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut Vars {
        &mut self.vars
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut Functions {
        &mut self.functions
    }

    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionBody> {
        self.functions.get(name)
    }

    /// Splits the context into its stack and variables so both can be
    /// borrowed at once.
    pub(crate) fn stack_and_vars(&mut self) -> (&mut Stack, &Vars) {
        (&mut self.stack, &self.vars)
    }
}

/// Structural contract check applied on construction and after every native
/// call.
///
/// Every variable and function must be addressable by a FLEX name. Any
/// violation is the single [`ErrorKind::UnsafeContext`] condition.
pub fn validate(context: &Context) -> Result<(), FlexError> {
    let vars_ok = context.vars.keys().all(|name| is_name(name));
    let functions_ok = context.functions.keys().all(|name| is_name(name));

    if vars_ok && functions_ok {
        Ok(())
    } else {
        Err(FlexError::unsafe_context())
    }
}

/// Entry check of `evaluate`, reported as [`ErrorKind::InvalidApi`].
pub(crate) fn validate_api(context: &Context) -> Result<(), FlexError> {
    validate(context).map_err(|_| FlexError::new(ErrorKind::InvalidApi, "Invalid API"))
}
