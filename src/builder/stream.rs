//! Builder for a single stream table.

use crate::core::Outcome;
use crate::engine::StepContext;
use crate::stream::{OperandKind, Step};
use std::borrow::Cow;

/// Operand as written in a stream table, before it is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Timer duration in milliseconds, converted with the program's tick rate.
    Millis(u32),

    /// Timer duration already expressed in ticks.
    Ticks(u32),

    /// Name of a stream in the same program.
    Stream(String),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Millis(_) | Operand::Ticks(_) => OperandKind::Duration,
            Operand::Stream(_) => OperandKind::Stream,
        }
    }
}

/// Ordered list of (step, operand) pairs forming one stream.
///
/// Nothing is checked here; [`ProgramBuilder::build`] validates every pair
/// and resolves jump targets.
///
/// [`ProgramBuilder::build`]: crate::builder::ProgramBuilder::build
pub struct StreamBuilder<C> {
    pub(crate) pairs: Vec<(Step<C>, Option<Operand>)>,
}

impl<C: 'static> StreamBuilder<C> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a step with the operand it consumes, if any.
    pub fn push(mut self, step: Step<C>, operand: Option<Operand>) -> Self {
        self.pairs.push((step, operand));
        self
    }

    /// Append an operand-free custom step.
    pub fn step<F>(self, name: impl Into<Cow<'static, str>>, handler: F) -> Self
    where
        F: Fn(&mut StepContext<'_, C>) -> Outcome + Send + Sync + 'static,
    {
        self.push(Step::new(name, handler), None)
    }

    /// Arm the machine timer without waiting for it.
    pub fn set_timer_ms(self, ms: u32) -> Self {
        self.push(Step::arm_timer(), Some(Operand::Millis(ms)))
    }

    pub fn set_timer_ticks(self, ticks: u32) -> Self {
        self.push(Step::arm_timer(), Some(Operand::Ticks(ticks)))
    }

    /// Wait for a timer armed earlier in the stream.
    pub fn wait_timer(self) -> Self {
        self.push(Step::wait_timer(), None)
    }

    /// Arm the timer and wait for it.
    pub fn delay_ms(self, ms: u32) -> Self {
        self.set_timer_ms(ms).wait_timer()
    }

    /// Continue at the head of the stream called `target`.
    pub fn jump(self, target: impl Into<String>) -> Self {
        self.push(Step::jump(), Some(Operand::Stream(target.into())))
    }

    /// Number of (step, operand) pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<C: 'static> Default for StreamBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
