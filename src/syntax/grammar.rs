//! Instruction token grammar.
//!
//! Tokens are classified once, in priority order:
//!
//! 1. push expression  `$name(.segment)*`
//! 2. pop expression   `&name(.segment)*`
//! 3. class expression `:$name(.segment)+`
//! 4. operator         one of `+ - * /` (`*` and `/` do nothing)
//! 5. plain call       `name`
//! 6. control token    `#op` / `~op`
//!
//! Names are `[a-z-]+`. A segment is a decimal integer, a `$name` variable
//! reference, the stack sentinel `&0`, or a bare name used as a dict key.

use std::fmt;

use crate::runtime::error::{ErrorKind, FlexError};

/// Stack sentinel segment: pop one value and use it as the index.
pub const STACK_SENTINEL: &str = "&0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Decimal digits, converted to a position when the path is walked.
    Integer(String),
    /// `$name`: the current value of a variable.
    Variable(String),
    /// Bare name used verbatim as a dict key.
    Key(String),
    /// `&0`.
    StackTop,
}

/// Master variable plus the dotted segments following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn is_bare(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOp {
    Nop,
    Return,
    Exit,
    Flush,
    Put,
    Clear,
    Add,
    Sub,
    Mul,
    Div,
}

impl ControlOp {
    fn from_sharp(name: &str) -> Option<Self> {
        match name {
            "nop" => Some(ControlOp::Nop),
            "return" => Some(ControlOp::Return),
            "exit" => Some(ControlOp::Exit),
            "flush" => Some(ControlOp::Flush),
            "put" => Some(ControlOp::Put),
            "clear" => Some(ControlOp::Clear),
            _ => None,
        }
    }

    fn from_operator(text: &str) -> Option<Self> {
        match text {
            "+" => Some(ControlOp::Add),
            "-" => Some(ControlOp::Sub),
            "*" => Some(ControlOp::Mul),
            "/" => Some(ControlOp::Div),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlOp::Nop => "#nop",
            ControlOp::Return => "#return",
            ControlOp::Exit => "#exit",
            ControlOp::Flush => "#flush",
            ControlOp::Put => "#put",
            ControlOp::Clear => "#clear",
            ControlOp::Add => "+",
            ControlOp::Sub => "-",
            ControlOp::Mul => "*",
            ControlOp::Div => "/",
        }
    }
}

/// A classified instruction token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Push(Path),
    Pop(Path),
    Class(Path),
    Call(String),
    Control(ControlOp),
}

impl Token {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Token::Push(_) => "push",
            Token::Pop(_) => "pop",
            Token::Class(_) => "class",
            Token::Call(_) => "call",
            Token::Control(_) => "control",
        }
    }
}

/// Returns whether `text` is a FLEX name (`[a-z-]+`).
pub fn is_name(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
}

fn parse_segment(text: &str) -> Option<Segment> {
    if text == STACK_SENTINEL {
        return Some(Segment::StackTop);
    }
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Segment::Integer(text.to_string()));
    }
    if let Some(name) = text.strip_prefix('$') {
        return is_name(name).then(|| Segment::Variable(name.to_string()));
    }
    is_name(text).then(|| Segment::Key(text.to_string()))
}

fn parse_path(body: &str) -> Option<Path> {
    let mut parts = body.split('.');
    let name = parts.next().filter(|name| is_name(name))?;
    let segments = parts.map(parse_segment).collect::<Option<Vec<_>>>()?;
    Some(Path {
        name: name.to_string(),
        segments,
    })
}

pub fn parse_push(text: &str) -> Option<Path> {
    parse_path(text.strip_prefix('$')?)
}

pub fn parse_pop(text: &str) -> Option<Path> {
    parse_path(text.strip_prefix('&')?)
}

/// Parses a class expression, including the segment-less form which the
/// caller must reject.
fn parse_class(text: &str) -> Option<Path> {
    parse_path(text.strip_prefix(":$")?)
}

/// `#op`, or its `~op` synonym.
fn parse_sharp(text: &str) -> Option<ControlOp> {
    let name = text.strip_prefix('#').or_else(|| text.strip_prefix('~'))?;
    ControlOp::from_sharp(name)
}

/// Classifies one instruction token.
pub fn classify_token(text: &str) -> Result<Token, FlexError> {
    if let Some(path) = parse_push(text) {
        return Ok(Token::Push(path));
    }
    if let Some(path) = parse_pop(text) {
        return Ok(Token::Pop(path));
    }
    if let Some(path) = parse_class(text) {
        if path.is_bare() {
            return Err(FlexError::new(
                ErrorKind::MalformedInstruction,
                "Invalid class expression: cannot use class expressions in non-class context",
            ));
        }
        return Ok(Token::Class(path));
    }
    // `-` is also a valid name; the operator reading wins.
    if let Some(op) = ControlOp::from_operator(text) {
        return Ok(Token::Control(op));
    }
    if is_name(text) {
        return Ok(Token::Call(text.to_string()));
    }
    if let Some(op) = parse_sharp(text) {
        return Ok(Token::Control(op));
    }
    Err(FlexError::new(
        ErrorKind::MalformedInstruction,
        "Malformed instruction",
    ))
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Integer(digits) => f.write_str(digits),
            Segment::Variable(name) => write!(f, "${}", name),
            Segment::Key(key) => f.write_str(key),
            Segment::StackTop => f.write_str(STACK_SENTINEL),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Push(path) => write!(f, "${}", path),
            Token::Pop(path) => write!(f, "&{}", path),
            Token::Class(path) => write!(f, ":${}", path),
            Token::Call(name) => f.write_str(name),
            Token::Control(op) => f.write_str(op.as_str()),
        }
    }
}

#[cfg(test)]
#[path = "grammar_test.rs"]
mod grammar_test;
