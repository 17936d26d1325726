//! Builder API for stream tables and programs.
//!
//! This module provides fluent builders and a table macro for laying out
//! streams, and validates them before anything is dispatched.

pub mod error;
pub mod macros;
pub mod program;
pub mod stream;

pub use error::{BuildError, BuildErrors};
pub use program::ProgramBuilder;
pub use stream::{Operand, StreamBuilder};

use crate::stream::Program;

/// Build a program holding a single self-repeating stream.
///
/// The stream's last step is followed by a jump back to its head, the usual
/// shape of a machine that runs forever.
///
/// # Example
///
/// ```
/// use steptable::builder::{looping, StreamBuilder};
///
/// let program = looping::<()>("heartbeat", StreamBuilder::new().delay_ms(1000)).unwrap();
/// assert!(program.stream_id("heartbeat").is_some());
/// ```
pub fn looping<C: 'static>(name: &str, body: StreamBuilder<C>) -> Result<Program<C>, BuildErrors> {
    ProgramBuilder::new().stream(name, body.jump(name)).build()
}
