//! Machine control errors.

use thiserror::Error;

/// Errors raised when the owner (re)starts a machine.
///
/// Dispatch itself never fails; see [`StepResult`](crate::engine::StepResult).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Stream '{name}' is not part of the machine's program")]
    UnknownStreamName { name: String },

    #[error("Stream {id} is not part of the machine's program")]
    UnknownStream { id: crate::stream::StreamId },
}
