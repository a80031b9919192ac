use crate::{
    runtime::{context::Context, output::OutputSink, value::Value},
    syntax::program::Instruction,
};

use super::Evaluator;

impl<S: OutputSink> Evaluator<S> {
    pub(super) fn trace_instruction(
        &self,
        ctx: &Context,
        position: usize,
        instruction: &Instruction,
    ) {
        println!("{}", format_step(self.depth, position, instruction));
        println!("  stack: [{}]", format_stack(ctx.stack().snapshot()));
    }
}

pub(super) fn format_step(depth: usize, position: usize, instruction: &Instruction) -> String {
    format!(
        "D={:02} IP={:04} {:<8} {}",
        depth,
        position,
        instruction.kind_label(),
        instruction.text()
    )
}

pub(super) fn format_stack(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(|value| value.to_string()).collect();
    items.join(", ")
}
