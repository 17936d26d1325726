//! Built-in steps every stream can use.
//!
//! - `arm_timer` reads a duration operand and arms the machine's timer.
//! - `wait_timer` repeats until that timer expires.
//! - `jump` reads a stream operand and moves the machine to its head.

use crate::core::Outcome;
use crate::engine::StepContext;
use crate::stream::{OperandKind, Step};

pub const ARM_TIMER: &str = "arm_timer";
pub const WAIT_TIMER: &str = "wait_timer";
pub const JUMP: &str = "jump";

/// Arm the timer with the following duration operand, then move past it.
pub fn arm_timer<C>(ctx: &mut StepContext<'_, C>) -> Outcome {
    let Some(ticks) = ctx.ticks_operand() else {
        tracing::error!(position = ?ctx.position(), "arm_timer step has no duration operand");
        return Outcome::Abort;
    };
    ctx.arm_timer(ticks);
    Outcome::SKIP_NEXT
}

/// Poll the timer until it expires.
pub fn wait_timer<C>(ctx: &mut StepContext<'_, C>) -> Outcome {
    if ctx.timer_expired() {
        Outcome::DONE
    } else {
        Outcome::Repeat
    }
}

/// Continue at the head of the stream named by the following operand.
pub fn jump<C>(ctx: &mut StepContext<'_, C>) -> Outcome {
    let Some(target) = ctx.stream_operand() else {
        tracing::error!(position = ?ctx.position(), "jump step has no stream operand");
        return Outcome::Abort;
    };
    ctx.jump(target);
    Outcome::Repeat
}

impl<C: 'static> Step<C> {
    /// Built-in step arming the machine timer; expects a duration operand.
    pub fn arm_timer() -> Self {
        Step::with_operand(ARM_TIMER, OperandKind::Duration, arm_timer::<C>)
    }

    /// Built-in step waiting for the machine timer.
    pub fn wait_timer() -> Self {
        Step::new(WAIT_TIMER, wait_timer::<C>)
    }

    /// Built-in step relocating the machine; expects a stream operand.
    pub fn jump() -> Self {
        Step::with_operand(JUMP, OperandKind::Stream, jump::<C>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ManualClock, Timer};
    use crate::stream::{Cursor, Entry, Immediate, StreamId};

    fn run<C>(
        handler: fn(&mut StepContext<'_, C>) -> Outcome,
        following: &[Entry<C>],
        timer: &mut Timer,
        clock: &ManualClock,
        data: &mut C,
    ) -> (Outcome, Option<Cursor>) {
        let position = Cursor::new(StreamId::new(0), 0);
        let mut ctx = StepContext::new(position, following, timer, clock, data);
        let outcome = handler(&mut ctx);
        (outcome, ctx.relocation())
    }

    #[test]
    fn arm_timer_consumes_operand() {
        let clock = ManualClock::new(40);
        let mut timer = Timer::default();
        let following = [Entry::Immediate(Immediate::Ticks(25))];

        let (outcome, relocation) = run(
            arm_timer::<()>,
            &following,
            &mut timer,
            &clock,
            &mut (),
        );

        assert_eq!(outcome, Outcome::SKIP_NEXT);
        assert_eq!(relocation, None);
        assert_eq!(timer.armed_at(), 40);
        assert_eq!(timer.duration(), 25);
    }

    #[test]
    fn arm_timer_without_operand_aborts() {
        let clock = ManualClock::new(0);
        let mut timer = Timer::default();

        let (outcome, _) = run(arm_timer::<()>, &[], &mut timer, &clock, &mut ());

        assert_eq!(outcome, Outcome::Abort);
    }

    #[test]
    fn wait_timer_repeats_until_expiry() {
        let clock = ManualClock::new(0);
        let mut timer = Timer::default();
        timer.arm(0, 10);

        clock.set(9);
        let (outcome, _) = run(wait_timer::<()>, &[], &mut timer, &clock, &mut ());
        assert_eq!(outcome, Outcome::Repeat);

        clock.set(10);
        let (outcome, _) = run(wait_timer::<()>, &[], &mut timer, &clock, &mut ());
        assert_eq!(outcome, Outcome::DONE);
    }

    #[test]
    fn jump_relocates_to_target_head() {
        let clock = ManualClock::new(0);
        let mut timer = Timer::default();
        let target = StreamId::new(2);
        let following = [Entry::Immediate(Immediate::Stream(target))];

        let (outcome, relocation) = run(jump::<()>, &following, &mut timer, &clock, &mut ());

        assert_eq!(outcome, Outcome::Repeat);
        assert_eq!(relocation, Some(Cursor::new(target, 0)));
    }

    #[test]
    fn jump_with_wrong_operand_aborts() {
        let clock = ManualClock::new(0);
        let mut timer = Timer::default();
        let following = [Entry::Immediate(Immediate::Ticks(1))];

        let (outcome, relocation) = run(jump::<()>, &following, &mut timer, &clock, &mut ());

        assert_eq!(outcome, Outcome::Abort);
        assert_eq!(relocation, None);
    }

    #[test]
    fn builtin_steps_declare_operands() {
        assert_eq!(Step::<()>::arm_timer().operand(), Some(OperandKind::Duration));
        assert_eq!(Step::<()>::wait_timer().operand(), None);
        assert_eq!(Step::<()>::jump().operand(), Some(OperandKind::Stream));
        assert_eq!(Step::<()>::jump().name(), JUMP);
    }
}
