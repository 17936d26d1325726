//! Entries making up an instruction stream.

use crate::core::Outcome;
use crate::engine::StepContext;
use crate::stream::StreamId;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Shared step handler.
///
/// Handlers receive the machine context explicitly and report an [`Outcome`].
/// They must never block: anything not ready yet is expressed as
/// [`Outcome::Repeat`] and polled again on the next dispatch.
pub type StepHandler<C> = Arc<dyn Fn(&mut StepContext<'_, C>) -> Outcome + Send + Sync>;

/// Kind of inline operand a step consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// A timer duration in ticks.
    Duration,

    /// A reference to another stream in the same program.
    Stream,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Duration => f.write_str("duration"),
            OperandKind::Stream => f.write_str("stream"),
        }
    }
}

/// Inline data consumed by the step right before it. Never executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Immediate {
    Ticks(u16),
    Stream(StreamId),
}

impl Immediate {
    pub fn kind(&self) -> OperandKind {
        match self {
            Immediate::Ticks(_) => OperandKind::Duration,
            Immediate::Stream(_) => OperandKind::Stream,
        }
    }
}

/// An executable entry: a named handler plus the operand it expects.
pub struct Step<C> {
    name: Cow<'static, str>,
    operand: Option<OperandKind>,
    handler: StepHandler<C>,
}

impl<C> Step<C> {
    /// Create an operand-free step.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, handler: F) -> Self
    where
        F: Fn(&mut StepContext<'_, C>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            operand: None,
            handler: Arc::new(handler),
        }
    }

    /// Create a step that consumes exactly one following operand.
    pub fn with_operand<F>(
        name: impl Into<Cow<'static, str>>,
        operand: OperandKind,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut StepContext<'_, C>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            operand: Some(operand),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operand this step reads, if any.
    pub fn operand(&self) -> Option<OperandKind> {
        self.operand
    }

    /// Number of stream entries this step occupies, operand included.
    pub fn width(&self) -> usize {
        1 + usize::from(self.operand.is_some())
    }

    pub(crate) fn invoke(&self, ctx: &mut StepContext<'_, C>) -> Outcome {
        (self.handler)(ctx)
    }
}

impl<C> Clone for Step<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            operand: self.operand,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("operand", &self.operand)
            .finish_non_exhaustive()
    }
}

/// One slot of an instruction stream.
pub enum Entry<C> {
    Step(Step<C>),
    Immediate(Immediate),
}

impl<C> Entry<C> {
    pub fn as_step(&self) -> Option<&Step<C>> {
        match self {
            Entry::Step(step) => Some(step),
            Entry::Immediate(_) => None,
        }
    }

    pub fn as_immediate(&self) -> Option<&Immediate> {
        match self {
            Entry::Step(_) => None,
            Entry::Immediate(immediate) => Some(immediate),
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Entry::Step(_))
    }
}

impl<C> Clone for Entry<C> {
    fn clone(&self) -> Self {
        match self {
            Entry::Step(step) => Entry::Step(step.clone()),
            Entry::Immediate(immediate) => Entry::Immediate(*immediate),
        }
    }
}

impl<C> fmt::Debug for Entry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Step(step) => f.debug_tuple("Step").field(&step.name).finish(),
            Entry::Immediate(immediate) => f.debug_tuple("Immediate").field(immediate).finish(),
        }
    }
}
