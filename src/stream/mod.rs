//! Instruction streams.
//!
//! A stream is a typed sequence of entries. Each entry is either a `Step`
//! that the engine executes or an `Immediate` operand that the step right
//! before it reads. Streams are grouped into a `Program` so jumps can refer
//! to each other by `StreamId`, including a stream jumping to its own head.

mod entry;
mod program;

pub use entry::{Entry, Immediate, OperandKind, Step, StepHandler};
pub use program::{Cursor, Program, Stream, StreamId};
