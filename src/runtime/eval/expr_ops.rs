use crate::{
    runtime::{
        context::{Context, Vars},
        error::{ErrorKind, FlexError},
        output::OutputSink,
        value::{FunctionBody, Value},
    },
    syntax::grammar::{Path, Segment},
};

use super::{
    Evaluator,
    index_ops::{self, Index, IndexStep},
};

/// Turns parsed segments into index steps.
///
/// `$name` segments are read from `vars` now; `&0` segments stay lazy and pop
/// the stack while the path is walked.
pub(super) fn resolve_segments(
    vars: &Vars,
    segments: &[Segment],
) -> Result<Vec<IndexStep>, FlexError> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Integer(digits) => digits
                .parse::<usize>()
                .map(IndexStep::position)
                .map_err(|_| index_ops::position_out_of_range(digits)),
            Segment::Variable(name) => {
                let value = vars.get(name).ok_or_else(|| {
                    FlexError::new(
                        ErrorKind::UndefinedVariable,
                        format!("Invalid index: undefined variable `{}'", name),
                    )
                })?;
                Index::from_value(value).map(IndexStep::Index)
            }
            Segment::Key(key) => Ok(IndexStep::key(key.as_str())),
            Segment::StackTop => Ok(IndexStep::StackTop),
        })
        .collect()
}

fn undefined_master(name: &str) -> FlexError {
    FlexError::new(
        ErrorKind::UndefinedVariable,
        format!("Invalid push expression: undefined variable `{}'", name),
    )
}

/// Value a push expression designates, without pushing it.
pub(super) fn resolve_push(ctx: &mut Context, path: &Path) -> Result<Value, FlexError> {
    let (stack, vars) = ctx.stack_and_vars();
    let root = vars.get(&path.name).ok_or_else(|| undefined_master(&path.name))?;
    if path.is_bare() {
        return Ok(root.clone());
    }

    let steps = resolve_segments(vars, &path.segments)?;
    index_ops::get(root, &steps, stack)?.ok_or_else(|| {
        FlexError::new(
            ErrorKind::UndefinedVariable,
            format!("Invalid push expression: undefined variable `${}'", path),
        )
    })
}

pub(super) fn execute_push(ctx: &mut Context, path: &Path) -> Result<(), FlexError> {
    let value = resolve_push(ctx, path)?;
    ctx.stack_mut().push(value);
    Ok(())
}

fn undefined_pop_target(name: &str) -> FlexError {
    FlexError::new(
        ErrorKind::UndefinedVariable,
        format!(
            "Invalid pop expression: cannot set index or key on undefined variable `{}'",
            name
        ),
    )
}

/// Pops the stack into a variable, or into a slot inside one.
///
/// The value is popped before the target is looked up.
pub(super) fn execute_pop(ctx: &mut Context, path: &Path) -> Result<(), FlexError> {
    let value = ctx.stack_mut().pop()?;
    if path.is_bare() {
        ctx.vars_mut().insert(path.name.clone(), value);
        return Ok(());
    }

    if ctx.var(&path.name).is_none() {
        return Err(undefined_pop_target(&path.name));
    }
    let steps = resolve_segments(ctx.vars(), &path.segments)?;

    // Taken out while written so the container is uniquely owned; a failed
    // write leaves it unchanged and it goes back either way.
    let mut target = ctx
        .vars_mut()
        .remove(&path.name)
        .ok_or_else(|| undefined_pop_target(&path.name))?;
    let result = index_ops::set(&mut target, value, &steps, ctx.stack_mut());
    ctx.vars_mut().insert(path.name.clone(), target);
    result
}

impl<S: OutputSink> Evaluator<S> {
    /// `:$name.path`: pushes the whole variable as receiver, then calls the
    /// function stored at `path`.
    pub(super) fn execute_class(&mut self, ctx: &mut Context, path: &Path) -> Result<(), FlexError> {
        let (stack, vars) = ctx.stack_and_vars();
        let receiver = vars.get(&path.name).ok_or_else(|| {
            FlexError::new(
                ErrorKind::UndefinedVariable,
                format!("Invalid class expression: undefined variable `{}'", path.name),
            )
        })?;
        let steps = resolve_segments(vars, &path.segments)?;
        let body = match index_ops::get(receiver, &steps, stack)? {
            Some(Value::Function(body)) => body,
            other => {
                let found = other.as_ref().map_or("nothing", Value::type_name);
                return Err(FlexError::new(
                    ErrorKind::NotAFunction,
                    format!("Invalid function: `:${}' holds {}", path, found),
                ));
            }
        };
        let receiver = receiver.clone();

        ctx.stack_mut().push(receiver);
        self.call_function(ctx, &body)
    }

    pub(super) fn execute_call(&mut self, ctx: &mut Context, name: &str) -> Result<(), FlexError> {
        let body: FunctionBody = ctx.function(name).cloned().ok_or_else(|| {
            FlexError::new(
                ErrorKind::UndefinedFunction,
                format!("Undefined function: `{}'", name),
            )
        })?;
        self.call_function(ctx, &body)
    }
}
