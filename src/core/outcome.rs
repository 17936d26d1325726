//! Result a step handler hands back to the engine.

use std::num::NonZeroUsize;

/// Classified result of one step invocation.
///
/// `Advance(n)` moves the cursor `n` entries forward, skipping the operands
/// that follow the step. A step with one operand therefore advances by 2 to
/// reach the next step; a step choosing between following jump pairs skips
/// `1 + 2k` entries to pass over `k` of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Stop the machine. The owner decides whether to restart it.
    Abort,

    /// Run the same step again on the next dispatch.
    Repeat,

    /// Move the cursor forward by this many entries.
    Advance(NonZeroUsize),
}

const fn forward(n: usize) -> Outcome {
    match NonZeroUsize::new(n) {
        Some(n) => Outcome::Advance(n),
        None => Outcome::Repeat,
    }
}

impl Outcome {
    /// Entries occupied by a jump step and its target operand.
    pub const JUMP_SIZE: usize = 2;

    /// Step finished, go to the next entry.
    pub const DONE: Outcome = forward(1);

    /// Skip the following operand-free step.
    pub const SKIP_NEXT: Outcome = forward(2);

    /// Skip the following jump pair.
    pub const SKIP_JUMP: Outcome = forward(1 + Self::JUMP_SIZE);

    /// Skip the following two jump pairs.
    pub const SKIP_TWO_JUMPS: Outcome = forward(1 + 2 * Self::JUMP_SIZE);

    /// Advance by `n` entries; zero means repeat.
    pub const fn advance(n: usize) -> Outcome {
        forward(n)
    }

    /// Pass over `jumps` jump pairs that directly follow the step.
    pub const fn skip_jumps(jumps: usize) -> Outcome {
        forward(1 + jumps * Self::JUMP_SIZE)
    }

    /// Entries the cursor moves; zero for repeat and abort.
    pub fn distance(&self) -> usize {
        match self {
            Outcome::Advance(n) => n.get(),
            Outcome::Abort | Outcome::Repeat => 0,
        }
    }
}
