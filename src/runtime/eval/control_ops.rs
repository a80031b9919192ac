use crate::{
    runtime::{
        context::Context,
        error::{ErrorKind, FlexError},
        output::OutputSink,
        stack::Stack,
        value::Value,
    },
    syntax::grammar::ControlOp,
};

use super::{Evaluator, Flow};

impl<S: OutputSink> Evaluator<S> {
    pub(super) fn execute_control(
        &mut self,
        ctx: &mut Context,
        op: ControlOp,
    ) -> Result<Flow, FlexError> {
        match op {
            // `*` and `/` are accepted tokens without an effect.
            ControlOp::Nop | ControlOp::Mul | ControlOp::Div => {}
            ControlOp::Return => return Ok(Flow::Return),
            ControlOp::Exit => return Err(FlexError::terminated()),
            ControlOp::Flush => ctx.stack_mut().flush(),
            ControlOp::Put => {
                let value = ctx.stack_mut().pop()?;
                self.sink.emit(&value.to_output_string());
            }
            ControlOp::Clear => self.sink.clear(),
            ControlOp::Add | ControlOp::Sub => execute_binary_operation(ctx.stack_mut(), op)?,
        }
        Ok(Flow::Continue)
    }
}

/// Pops `a` then `b` and pushes `a op b`.
///
/// Both operands must share a type. `+` accepts numbers and text (joined in
/// pop order); `-` takes numbers only.
pub(super) fn execute_binary_operation(stack: &mut Stack, op: ControlOp) -> Result<(), FlexError> {
    let a = stack.pop()?;
    let b = stack.pop()?;

    if a.type_name() != b.type_name() {
        return Err(FlexError::new(
            ErrorKind::TypeMismatch,
            format!(
                "Values must be of equal type ({} {} {})",
                a.type_name(),
                op.as_str(),
                b.type_name()
            ),
        ));
    }

    let result = match (op, &a, &b) {
        (ControlOp::Add, Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (ControlOp::Sub, Value::Number(a), Value::Number(b)) => Value::Number(a - b),
        (ControlOp::Add, Value::Text(a), Value::Text(b)) => Value::text(format!("{}{}", a, b)),
        (ControlOp::Add, _, _) => {
            return Err(FlexError::new(
                ErrorKind::TypeMismatch,
                format!("`+' expects Number or Text, got {}", a.type_name()),
            ));
        }
        _ => {
            return Err(FlexError::new(
                ErrorKind::TypeMismatch,
                format!("`{}' expects Number, got {}", op.as_str(), a.type_name()),
            ));
        }
    };
    stack.push(result);
    Ok(())
}
