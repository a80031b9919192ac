//! Runtime error kinds and the error value threaded through evaluation.

use std::fmt;

/// Marker printed for the termination signal raised by `#exit`.
pub const TERMINATION_MARKER: &str = "dead";

/// Message every failed post-native validation collapses into.
pub const UNSAFE_CONTEXT_MESSAGE: &str = "Unsafe: unknown api alteration";

/// Classifies a [`FlexError`].
///
/// Codes and titles are user-visible and are expected to remain stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StackUnderflow,
    UndefinedVariable,
    UndefinedFunction,
    NotAFunction,
    ShapeMismatch,
    InvalidIndex,
    UnknownType,
    MalformedInstruction,
    InvalidApi,
    UnsafeContext,
    TypeMismatch,
    CallDepthExceeded,
    Decode,
    /// The host ran out of input while a native was reading.
    InputExhausted,
    /// Not an error: the program asked the session to stop.
    Terminated,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::StackUnderflow => "E0101",
            ErrorKind::UndefinedVariable => "E0102",
            ErrorKind::UndefinedFunction => "E0103",
            ErrorKind::NotAFunction => "E0104",
            ErrorKind::ShapeMismatch => "E0105",
            ErrorKind::InvalidIndex => "E0106",
            ErrorKind::UnknownType => "E0107",
            ErrorKind::MalformedInstruction => "E0108",
            ErrorKind::InvalidApi => "E0109",
            ErrorKind::UnsafeContext => "E0110",
            ErrorKind::TypeMismatch => "E0111",
            ErrorKind::CallDepthExceeded => "E0112",
            ErrorKind::Decode => "E0113",
            ErrorKind::InputExhausted => "E0114",
            ErrorKind::Terminated => "E0000",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::StackUnderflow => "STACK UNDERFLOW",
            ErrorKind::UndefinedVariable => "UNDEFINED VARIABLE",
            ErrorKind::UndefinedFunction => "UNDEFINED FUNCTION",
            ErrorKind::NotAFunction => "NOT A FUNCTION",
            ErrorKind::ShapeMismatch => "SHAPE MISMATCH",
            ErrorKind::InvalidIndex => "INVALID INDEX",
            ErrorKind::UnknownType => "UNKNOWN TYPE",
            ErrorKind::MalformedInstruction => "MALFORMED INSTRUCTION",
            ErrorKind::InvalidApi => "INVALID API",
            ErrorKind::UnsafeContext => "UNSAFE CONTEXT",
            ErrorKind::TypeMismatch => "TYPE MISMATCH",
            ErrorKind::CallDepthExceeded => "CALL DEPTH EXCEEDED",
            ErrorKind::Decode => "DECODE ERROR",
            ErrorKind::InputExhausted => "INPUT EXHAUSTED",
            ErrorKind::Terminated => "TERMINATED",
        }
    }
}

/// Error raised while building or evaluating a FLEX program.
///
/// `trail` holds the textual form of every instruction the error unwound
/// through, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexError {
    kind: ErrorKind,
    message: String,
    trail: Vec<String>,
}

impl FlexError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trail: Vec::new(),
        }
    }

    pub fn terminated() -> Self {
        Self::new(ErrorKind::Terminated, TERMINATION_MARKER)
    }

    pub fn stack_underflow() -> Self {
        Self::new(
            ErrorKind::StackUnderflow,
            "stack underflow (trying to pop an empty stack)",
        )
    }

    pub fn unsafe_context() -> Self {
        Self::new(ErrorKind::UnsafeContext, UNSAFE_CONTEXT_MESSAGE)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    pub fn is_termination(&self) -> bool {
        self.kind == ErrorKind::Terminated
    }

    /// Records that this error unwound through `instruction`.
    ///
    /// Termination is returned untouched.
    pub fn within(mut self, instruction: impl Into<String>) -> Self {
        if self.is_termination() {
            return self;
        }
        self.trail.insert(0, instruction.into());
        self
    }
}

impl fmt::Display for FlexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_termination() {
            return f.write_str(TERMINATION_MARKER);
        }
        for instruction in &self.trail {
            write!(f, "On `{}': ", instruction)?;
        }
        f.write_str(&self.message)
    }
}

impl std::error::Error for FlexError {}
