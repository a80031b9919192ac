//! Program evaluation.
//!
//! [`Evaluator::evaluate`] walks a program's instructions against a host
//! [`Context`]. Calls to program-bodied functions recurse into `evaluate`;
//! every error unwinding through an instruction records that instruction so
//! the host sees the whole path, innermost last.

use crate::{
    runtime::{
        context::{Context, MAIN_FUNCTION, validate, validate_api},
        error::{ErrorKind, FlexError},
        output::{ConsoleSink, OutputSink},
        value::FunctionBody,
    },
    syntax::program::Program,
};

mod control_ops;
mod dispatch;
mod expr_ops;
pub mod index_ops;
mod materialize;
mod trace;

/// Nesting limit for program calls unless configured otherwise.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// What the evaluation loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Return,
}

/// Stack-machine evaluator writing program output to `S`.
pub struct Evaluator<S: OutputSink = ConsoleSink> {
    sink: S,
    trace: bool,
    max_call_depth: usize,
    depth: usize,
}

impl<S: OutputSink> Evaluator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            trace: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            depth: 0,
        }
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_max_call_depth(&mut self, depth: usize) {
        self.max_call_depth = depth;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs `program` against `ctx`.
    ///
    /// The context must pass the admission check. The first program
    /// evaluated in a context is remembered as its `main` function. Stops
    /// early on `#return`; `#exit` surfaces as a termination error.
    pub fn evaluate(&mut self, ctx: &mut Context, program: &Program) -> Result<(), FlexError> {
        validate_api(ctx)?;
        ctx.functions_mut()
            .entry(MAIN_FUNCTION.to_string())
            .or_insert_with(|| FunctionBody::Program(program.clone()));

        if self.depth >= self.max_call_depth {
            return Err(FlexError::new(
                ErrorKind::CallDepthExceeded,
                format!("call depth exceeded (limit {})", self.max_call_depth),
            ));
        }

        self.depth += 1;
        let result = self.run(ctx, program);
        self.depth -= 1;
        result
    }

    fn run(&mut self, ctx: &mut Context, program: &Program) -> Result<(), FlexError> {
        for (position, instruction) in program.instructions().iter().enumerate() {
            if self.trace {
                self.trace_instruction(ctx, position, instruction);
            }
            match self.dispatch(ctx, instruction) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Return) => break,
                Err(err) => return Err(err.within(instruction.text())),
            }
        }
        Ok(())
    }

    /// Calls a function body with whatever the stack currently holds.
    ///
    /// The context is re-validated after a native returns.
    pub(crate) fn call_function(
        &mut self,
        ctx: &mut Context,
        body: &FunctionBody,
    ) -> Result<(), FlexError> {
        match body {
            FunctionBody::Program(program) => self.evaluate(ctx, program),
            FunctionBody::Native(native) => {
                (native.func)(ctx, &mut self.sink)?;
                validate(ctx)
            }
        }
    }
}

impl Default for Evaluator<ConsoleSink> {
    fn default() -> Self {
        Self::new(ConsoleSink)
    }
}

/// Evaluates `program` once, writing to `sink`.
pub fn evaluate(
    ctx: &mut Context,
    program: &Program,
    sink: &mut dyn OutputSink,
) -> Result<(), FlexError> {
    Evaluator::new(sink).evaluate(ctx, program)
}

#[cfg(test)]
mod materialize_test;
