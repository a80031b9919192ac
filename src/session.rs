//! Interactive sessions: one context evaluating program after program.

use std::{fmt, io::BufRead};

use crate::{
    runtime::{
        context::Context,
        error::{FlexError, TERMINATION_MARKER},
        eval::Evaluator,
        output::OutputSink,
    },
    syntax::program::Program,
};

/// Status line a session answers each submission with.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Dead,
    Error(FlexError),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("< OK!"),
            Reply::Dead => write!(f, "< {}", TERMINATION_MARKER),
            Reply::Error(err) => write!(f, "< {}", err),
        }
    }
}

impl From<Result<(), FlexError>> for Reply {
    fn from(result: Result<(), FlexError>) -> Self {
        match result {
            Ok(()) => Reply::Ok,
            Err(err) if err.is_termination() => Reply::Dead,
            Err(err) => Reply::Error(err),
        }
    }
}

/// A context preloaded with the host natives plus the evaluator driving it.
///
/// State committed by one submission stays visible to the next, including
/// state committed before a failing instruction. A termination ends the
/// session.
pub struct Session<S: OutputSink> {
    ctx: Context,
    evaluator: Evaluator<S>,
    finished: bool,
}

impl<S: OutputSink> Session<S> {
    pub fn new(sink: S) -> Self {
        Self::with_evaluator(Evaluator::new(sink))
    }

    pub fn with_evaluator(evaluator: Evaluator<S>) -> Self {
        Self {
            ctx: Context::with_natives(),
            evaluator,
            finished: false,
        }
    }

    /// Decodes and evaluates one submission.
    pub fn submit(&mut self, source: &str) -> Reply {
        if self.finished {
            return Reply::Dead;
        }
        let result = Program::parse(source)
            .and_then(|program| self.evaluator.evaluate(&mut self.ctx, &program));
        let reply = Reply::from(result);
        if reply == Reply::Dead {
            self.finished = true;
        }
        reply
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn evaluator(&self) -> &Evaluator<S> {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator<S> {
        &mut self.evaluator
    }
}

/// Evaluates one program in a fresh session context.
pub fn run_source<S: OutputSink>(
    source: &str,
    evaluator: &mut Evaluator<S>,
) -> Result<(), FlexError> {
    let program = Program::parse(source)?;
    let mut ctx = Context::with_natives();
    evaluator.evaluate(&mut ctx, &program)
}

/// Bracket balance of a JSON entry typed over several lines.
///
/// Brackets inside string literals do not count. JSON strings cannot span
/// lines, so a line ending inside a string completes the entry and leaves the
/// decode error to the evaluator.
#[derive(Debug, Default)]
pub struct EntryScanner {
    depth: i32,
    in_string: bool,
    escaped: bool,
}

impl EntryScanner {
    pub fn feed(&mut self, line: &str) {
        for ch in line.chars() {
            if self.in_string {
                match ch {
                    _ if self.escaped => self.escaped = false,
                    '\\' => self.escaped = true,
                    '"' => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => self.in_string = true,
                '{' | '[' => self.depth += 1,
                '}' | ']' => self.depth -= 1,
                _ => {}
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.depth <= 0 || self.in_string
    }
}

/// Reads one entry, asking for more lines while its brackets are unbalanced.
///
/// `on_continue` runs before each continuation line is read. Returns `None`
/// at end of input with nothing buffered, or on a read error.
pub fn read_entry(reader: &mut impl BufRead, mut on_continue: impl FnMut()) -> Option<String> {
    let mut input = String::new();
    let mut scanner = EntryScanner::default();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => return (!input.is_empty()).then_some(input),
            Ok(_) => {
                scanner.feed(&line);
                input.push_str(&line);
                if scanner.is_complete() {
                    return Some(input);
                }
                on_continue();
            }
            Err(_) => return None,
        }
    }
}
