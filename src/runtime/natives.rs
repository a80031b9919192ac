//! Host natives preloaded into interactive sessions.

use crate::runtime::{
    context::Context,
    error::{ErrorKind, FlexError},
    native_function::NativeFunction,
    output::OutputSink,
    value::Value,
};

pub const HELP_LINES: &[&str] = &[
    concat!("*** flex help v", env!("CARGO_PKG_VERSION"), " ***"),
    "Type your program as a JSON array, e.g. [1, 2, \"+\", \"#put\"]",
    "Push with `$name', bind with `&name', call functions by name",
    "Use sharp function `clear' to clear and sharp function `put' to print something",
];

fn native_stack_dump(ctx: &mut Context, out: &mut dyn OutputSink) -> Result<(), FlexError> {
    let items: Vec<String> = ctx
        .stack()
        .snapshot()
        .iter()
        .map(Value::to_output_string)
        .collect();
    out.emit(&items.join("; "));
    Ok(())
}

fn native_help(_ctx: &mut Context, out: &mut dyn OutputSink) -> Result<(), FlexError> {
    for line in HELP_LINES {
        out.emit(line);
    }
    Ok(())
}

/// Pops a prompt message, asks the sink for a line and pushes the answer.
fn native_read_line(ctx: &mut Context, out: &mut dyn OutputSink) -> Result<(), FlexError> {
    let message = match ctx.stack_mut().pop()? {
        Value::Text(text) => text,
        other => {
            return Err(FlexError::new(
                ErrorKind::TypeMismatch,
                format!("read-line expected Text prompt, got {}", other.type_name()),
            ));
        }
    };
    let answer = out.prompt(&message).ok_or_else(|| {
        FlexError::new(
            ErrorKind::InputExhausted,
            "end of input reached while reading a line",
        )
    })?;
    ctx.stack_mut().push(Value::text(answer));
    Ok(())
}

/// All host natives, registered under their FLEX names.
pub static NATIVES: &[NativeFunction] = &[
    NativeFunction::new("stack-dump", native_stack_dump),
    NativeFunction::new("help", native_help),
    NativeFunction::new("read-line", native_read_line),
];

#[cfg(test)]
pub(crate) fn get_native(name: &str) -> Option<&'static NativeFunction> {
    NATIVES.iter().find(|native| native.name == name)
}

#[cfg(test)]
#[path = "natives_test.rs"]
mod natives_test;
