//! The dispatch engine.
//!
//! This module is the imperative shell around the pure core: a `Machine`
//! holds a cursor into a shared `Program` plus its own timer, and each call to
//! `Machine::step` runs exactly one step through a `StepContext`.
//!
//! # Key Concepts
//!
//! - **Machine**: cursor, timer, and a handle to the program it walks
//! - **StepContext**: explicit context passed to every handler
//! - **StepResult**: idle, repeat, completed, or aborted
//! - **Built-in steps**: arm a timer, wait for it, jump to another stream
//!
//! There is no scheduler. The caller's main loop decides how often each
//! machine is stepped; nothing ever blocks inside a step.

pub mod builtin;
mod context;
mod error;
mod machine;

pub use context::StepContext;
pub use error::MachineError;
pub use machine::{Machine, StepResult};
