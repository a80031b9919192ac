//! Front end: literal decoding, shape classification and the token grammar.

pub mod grammar;
pub mod literal;
pub mod program;
pub mod shape;

pub use literal::{Literal, decode};
pub use program::{Instruction, Program};
