//! Runtime core types and program evaluation.
//!
//! # No-Cycle Invariant
//! FLEX values are trees. Containers are `Rc`-shared and copied on write, so a
//! value can never hold a reference back to one of its ancestors and reference
//! counting alone reclaims everything.
//!
//! Natives may alter the context they are lent; the evaluator re-validates it
//! after every native call.
use crate::runtime::{context::Context, error::FlexError, output::OutputSink};

pub mod context;
pub mod error;
pub mod eval;
pub mod native_function;
pub mod natives;
pub mod output;
pub mod stack;
pub mod value;

pub type NativeFn = fn(&mut Context, &mut dyn OutputSink) -> Result<(), FlexError>;
