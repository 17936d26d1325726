//! Build errors for programs and streams.

use crate::stream::OperandKind;
use std::fmt;
use thiserror::Error;

/// A single problem found while validating a program.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No streams defined. Add at least one stream with .stream(name, builder)")]
    NoStreams,

    #[error("Stream '{stream}' has no steps")]
    EmptyStream { stream: String },

    #[error("Stream '{stream}' is defined more than once")]
    DuplicateStream { stream: String },

    #[error("Step '{step}' at {stream}[{index}] expects a {expected} operand")]
    MissingOperand {
        stream: String,
        index: usize,
        step: String,
        expected: OperandKind,
    },

    #[error("Step '{step}' at {stream}[{index}] takes no operand")]
    UnexpectedOperand {
        stream: String,
        index: usize,
        step: String,
    },

    #[error("Step '{step}' at {stream}[{index}] expects a {expected} operand, got a {found}")]
    OperandMismatch {
        stream: String,
        index: usize,
        step: String,
        expected: OperandKind,
        found: OperandKind,
    },

    #[error("Step at {stream}[{index}] refers to unknown stream '{target}'")]
    UnknownJumpTarget {
        stream: String,
        index: usize,
        target: String,
    },

    #[error("Duration at {stream}[{index}] is {ticks} ticks, the timer holds at most 65535")]
    DurationOutOfRange {
        stream: String,
        index: usize,
        ticks: u64,
    },

    #[error("Tick rate must be at least 1 Hz")]
    InvalidTickRate,
}

/// Every problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildErrors {
    errors: Vec<BuildError>,
}

impl BuildErrors {
    pub(crate) fn new(errors: Vec<BuildError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.errors.iter()
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Program failed validation with {} error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BuildErrors {}

impl IntoIterator for BuildErrors {
    type Item = BuildError;
    type IntoIter = std::vec::IntoIter<BuildError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
