use crate::{
    runtime::{context::Context, error::FlexError, output::OutputSink},
    syntax::{grammar::Token, program::Instruction},
};

use super::{
    Evaluator, Flow,
    expr_ops::{execute_pop, execute_push},
    materialize::materialize,
};

impl<S: OutputSink> Evaluator<S> {
    pub(super) fn dispatch(
        &mut self,
        ctx: &mut Context,
        instruction: &Instruction,
    ) -> Result<Flow, FlexError> {
        match instruction {
            Instruction::Value(value) => ctx.stack_mut().push(value.clone()),
            Instruction::Structured(literal) => {
                let value = materialize(ctx, literal)?;
                ctx.stack_mut().push(value);
            }
            Instruction::Token { token, .. } => return self.execute_token(ctx, token),
            Instruction::Invalid { error, .. } => return Err(error.clone()),
        }
        Ok(Flow::Continue)
    }

    fn execute_token(&mut self, ctx: &mut Context, token: &Token) -> Result<Flow, FlexError> {
        match token {
            Token::Push(path) => execute_push(ctx, path)?,
            Token::Pop(path) => execute_pop(ctx, path)?,
            Token::Class(path) => self.execute_class(ctx, path)?,
            Token::Call(name) => self.execute_call(ctx, name)?,
            Token::Control(op) => return self.execute_control(ctx, *op),
        }
        Ok(Flow::Continue)
    }
}
