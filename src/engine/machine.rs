//! Dispatch engine: one step per call, cursor moved by the step's outcome.

use crate::core::{Outcome, TickSource, Timer};
use crate::engine::context::StepContext;
use crate::engine::error::MachineError;
use crate::stream::{Cursor, Entry, Program, StreamId};
use std::fmt;
use std::sync::Arc;

/// What a single dispatch did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepResult {
    /// The machine is stopped; nothing ran.
    Idle,

    /// The step asked to run again (or relocated the machine).
    Repeat,

    /// The step finished and the cursor moved on. The machine stops if the
    /// cursor walked past the end of its stream.
    Completed,

    /// The step aborted, or left the cursor somewhere it cannot run from.
    /// The machine is stopped.
    Aborted,
}

impl StepResult {
    /// Whether another dispatch in the same loop iteration could make progress.
    pub fn made_progress(&self) -> bool {
        matches!(self, StepResult::Completed)
    }
}

enum Landing {
    Step,
    EndOfStream,
    Operand,
    UnknownStream,
}

/// A runtime instance walking a [`Program`].
///
/// The machine owns its cursor and timer; the program is shared. A new machine
/// is stopped until its owner calls [`start`](Machine::start). The owner then
/// calls [`step`](Machine::step) once per main-loop iteration (or several
/// times via [`run_until_blocked`](Machine::run_until_blocked)).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use steptable::builder::{ProgramBuilder, StreamBuilder};
/// use steptable::core::{ManualClock, Outcome};
/// use steptable::engine::{Machine, StepResult};
///
/// let program = ProgramBuilder::<u32>::new()
///     .stream(
///         "count",
///         StreamBuilder::<u32>::new()
///             .delay_ms(5)
///             .step("bump", |ctx| {
///                 *ctx.data_mut() += 1;
///                 Outcome::DONE
///             }),
///     )
///     .build()
///     .unwrap();
///
/// let clock = ManualClock::new(0);
/// let mut count = 0;
/// let mut machine = Machine::new("counter", Arc::new(program));
/// machine.start_named("count").unwrap();
///
/// assert_eq!(machine.step(&clock, &mut count), StepResult::Completed); // arm
/// assert_eq!(machine.step(&clock, &mut count), StepResult::Repeat); // wait
/// clock.advance(5);
/// assert_eq!(machine.step(&clock, &mut count), StepResult::Completed); // expired
/// assert_eq!(machine.step(&clock, &mut count), StepResult::Completed); // bump
/// assert_eq!(count, 1);
/// assert!(!machine.is_running());
/// ```
pub struct Machine<C> {
    name: String,
    program: Arc<Program<C>>,
    cursor: Option<Cursor>,
    timer: Timer,
}

impl<C> Machine<C> {
    /// Create a stopped machine bound to `program`.
    pub fn new(name: impl Into<String>, program: Arc<Program<C>>) -> Self {
        Self {
            name: name.into(),
            program,
            cursor: None,
            timer: Timer::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Arc<Program<C>> {
        &self.program
    }

    /// Current position; `None` while stopped.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn is_running(&self) -> bool {
        self.cursor.is_some()
    }

    /// Point the machine at the head of `stream`.
    pub fn start(&mut self, stream: StreamId) -> Result<(), MachineError> {
        let head = self
            .program
            .head(stream)
            .ok_or(MachineError::UnknownStream { id: stream })?;
        tracing::debug!(machine = %self.name, stream = %stream, "machine started");
        self.cursor = Some(head);
        Ok(())
    }

    /// Point the machine at the head of the stream called `name`.
    pub fn start_named(&mut self, name: &str) -> Result<(), MachineError> {
        let stream = self
            .program
            .stream_id(name)
            .ok_or_else(|| MachineError::UnknownStreamName {
                name: name.to_string(),
            })?;
        self.start(stream)
    }

    /// Start the machine only if it is stopped. Returns whether it restarted.
    pub fn restart_if_stopped(&mut self, stream: StreamId) -> Result<bool, MachineError> {
        if self.is_running() {
            return Ok(false);
        }
        self.start(stream)?;
        Ok(true)
    }

    /// Stop the machine before its next dispatch. Timer state is left as is.
    pub fn stop(&mut self) {
        if self.cursor.take().is_some() {
            tracing::debug!(machine = %self.name, "machine stopped by owner");
        }
    }

    /// Execute exactly one step.
    ///
    /// Calling this on a stopped machine is a no-op returning
    /// [`StepResult::Idle`]. Otherwise the step under the cursor runs with
    /// `data` and `clock` in its context, and its [`Outcome`] moves the
    /// cursor: abort stops the machine, repeat leaves the cursor alone, and
    /// advance-by-N moves it N entries. When the handler relocated the machine
    /// the advance is counted from the relocation target.
    pub fn step(&mut self, clock: &dyn TickSource, data: &mut C) -> StepResult {
        let Some(position) = self.cursor else {
            return StepResult::Idle;
        };

        let program = Arc::clone(&self.program);
        let (Some(stream), Some(step)) = (
            program.stream(position.stream()),
            program.step_at(position),
        ) else {
            tracing::error!(
                machine = %self.name,
                cursor = ?position,
                "cursor does not point at a step, stopping machine"
            );
            self.cursor = None;
            return StepResult::Aborted;
        };

        let following = &stream.entries()[position.index() + 1..];
        let (outcome, relocation) = {
            let mut ctx = StepContext::new(position, following, &mut self.timer, clock, data);
            let outcome = step.invoke(&mut ctx);
            (outcome, ctx.relocation())
        };

        tracing::trace!(
            machine = %self.name,
            stream = stream.name(),
            step = step.name(),
            index = position.index(),
            ?outcome,
            "dispatched step"
        );

        let base = relocation.unwrap_or(position);
        let (target, result) = match outcome {
            Outcome::Abort => {
                tracing::debug!(
                    machine = %self.name,
                    stream = stream.name(),
                    step = step.name(),
                    "step aborted machine"
                );
                self.cursor = None;
                return StepResult::Aborted;
            }
            Outcome::Repeat => (base, StepResult::Repeat),
            Outcome::Advance(n) => (
                Cursor::new(base.stream(), base.index().saturating_add(n.get())),
                StepResult::Completed,
            ),
        };

        match Self::landing(&program, target) {
            Landing::Step => {
                self.cursor = Some(target);
                result
            }
            Landing::EndOfStream => {
                tracing::debug!(
                    machine = %self.name,
                    stream = %target.stream(),
                    "reached end of stream"
                );
                self.cursor = None;
                result
            }
            Landing::Operand => {
                tracing::error!(
                    machine = %self.name,
                    step = step.name(),
                    cursor = ?target,
                    "step advanced onto an operand, stopping machine"
                );
                self.cursor = None;
                StepResult::Aborted
            }
            Landing::UnknownStream => {
                tracing::error!(
                    machine = %self.name,
                    step = step.name(),
                    stream = %target.stream(),
                    "step jumped to a stream outside the program, stopping machine"
                );
                self.cursor = None;
                StepResult::Aborted
            }
        }
    }

    /// Dispatch repeatedly while steps complete, at most `budget` times.
    ///
    /// Stops at the first repeat, abort, or stop and returns that dispatch's
    /// result. Mirrors a main loop that drains every ready step of a machine
    /// before moving on to the next one. A zero budget dispatches nothing and
    /// reports `Repeat` for a running machine, `Idle` for a stopped one.
    pub fn run_until_blocked(
        &mut self,
        clock: &dyn TickSource,
        data: &mut C,
        budget: usize,
    ) -> StepResult {
        let mut last = if self.is_running() {
            StepResult::Repeat
        } else {
            StepResult::Idle
        };
        for _ in 0..budget {
            last = self.step(clock, data);
            if !last.made_progress() || !self.is_running() {
                break;
            }
        }
        last
    }

    fn landing(program: &Program<C>, target: Cursor) -> Landing {
        let Some(stream) = program.stream(target.stream()) else {
            return Landing::UnknownStream;
        };
        match stream.entries().get(target.index()) {
            Some(Entry::Step(_)) => Landing::Step,
            Some(Entry::Immediate(_)) => Landing::Operand,
            None => Landing::EndOfStream,
        }
    }
}

impl<C> Clone for Machine<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            program: Arc::clone(&self.program),
            cursor: self.cursor,
            timer: self.timer,
        }
    }
}

impl<C> fmt::Debug for Machine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.name)
            .field("cursor", &self.cursor)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ProgramBuilder, StreamBuilder};
    use crate::core::ManualClock;
    use crate::stream::Step;

    fn machine_for(builder: ProgramBuilder<Vec<&'static str>>) -> Machine<Vec<&'static str>> {
        Machine::new("test", Arc::new(builder.build().unwrap()))
    }

    fn log(label: &'static str, outcome: Outcome) -> Step<Vec<&'static str>> {
        Step::new(label, move |ctx: &mut StepContext<'_, Vec<&'static str>>| {
            ctx.data_mut().push(label);
            outcome
        })
    }

    #[test]
    fn new_machine_is_idle() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().push(log("a", Outcome::DONE), None),
        ));
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();

        assert!(!machine.is_running());
        assert_eq!(machine.step(&clock, &mut seen), StepResult::Idle);
        assert!(seen.is_empty());
    }

    #[test]
    fn advance_moves_cursor_by_distance() {
        let mut machine = machine_for(
            ProgramBuilder::new().stream(
                "main",
                StreamBuilder::new()
                    .push(log("a", Outcome::SKIP_NEXT), None)
                    .push(log("skipped", Outcome::DONE), None)
                    .push(log("c", Outcome::Repeat), None),
            ),
        );
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Completed);
        assert_eq!(machine.cursor().map(|c| c.index()), Some(2));
        assert_eq!(machine.step(&clock, &mut seen), StepResult::Repeat);
        assert_eq!(machine.step(&clock, &mut seen), StepResult::Repeat);
        assert_eq!(seen, vec!["a", "c", "c"]);
    }

    #[test]
    fn abort_stops_machine_and_keeps_timer() {
        let mut machine = machine_for(
            ProgramBuilder::new().stream(
                "main",
                StreamBuilder::new()
                    .set_timer_ticks(30)
                    .push(log("fail", Outcome::Abort), None),
            ),
        );
        let clock = ManualClock::new(7);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Completed);
        assert_eq!(machine.step(&clock, &mut seen), StepResult::Aborted);
        assert_eq!(machine.cursor(), None);
        assert_eq!(machine.timer().armed_at(), 7);
        assert_eq!(machine.timer().duration(), 30);

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Idle);
        assert_eq!(seen, vec!["fail"]);
    }

    #[test]
    fn walking_past_end_stops_machine() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().push(log("last", Outcome::SKIP_TWO_JUMPS), None),
        ));
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Completed);
        assert!(!machine.is_running());
        assert_eq!(machine.step(&clock, &mut seen), StepResult::Idle);
    }

    #[test]
    fn advancing_onto_operand_aborts() {
        let mut machine = machine_for(
            ProgramBuilder::new().stream(
                "main",
                StreamBuilder::new()
                    .push(log("off_by_one", Outcome::SKIP_NEXT), None)
                    .jump("main"),
            ),
        );
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Aborted);
        assert!(!machine.is_running());
    }

    #[test]
    fn relocating_step_applies_advance_from_target() {
        let mut machine = machine_for(
            ProgramBuilder::new()
                .stream(
                    "main",
                    StreamBuilder::new().step("hop", |ctx| {
                        ctx.jump(StreamId::new(1));
                        Outcome::DONE
                    }),
                )
                .stream(
                    "side",
                    StreamBuilder::new()
                        .push(log("side_head", Outcome::DONE), None)
                        .push(log("side_next", Outcome::Repeat), None),
                ),
        );
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Completed);
        assert_eq!(machine.cursor(), Some(Cursor::new(StreamId::new(1), 1)));
        machine.step(&clock, &mut seen);
        assert_eq!(seen, vec!["side_next"]);
    }

    #[test]
    fn jump_to_foreign_stream_aborts() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().step("escape", |ctx| {
                ctx.jump(StreamId::new(9));
                Outcome::Repeat
            }),
        ));
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.step(&clock, &mut seen), StepResult::Aborted);
        assert!(!machine.is_running());
    }

    #[test]
    fn start_rejects_unknown_streams() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().push(log("a", Outcome::DONE), None),
        ));

        assert_eq!(
            machine.start_named("nope"),
            Err(MachineError::UnknownStreamName {
                name: "nope".to_string()
            })
        );
        assert_eq!(
            machine.start(StreamId::new(4)),
            Err(MachineError::UnknownStream {
                id: StreamId::new(4)
            })
        );
        assert!(!machine.is_running());
    }

    #[test]
    fn restart_only_when_stopped() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().push(log("a", Outcome::Repeat), None),
        ));
        let main = machine.program().stream_id("main").unwrap();

        assert_eq!(machine.restart_if_stopped(main), Ok(true));
        assert_eq!(machine.restart_if_stopped(main), Ok(false));
        machine.stop();
        assert!(!machine.is_running());
        assert_eq!(machine.restart_if_stopped(main), Ok(true));
    }

    #[test]
    fn run_until_blocked_drains_ready_steps() {
        let mut machine = machine_for(
            ProgramBuilder::new().stream(
                "main",
                StreamBuilder::new()
                    .push(log("a", Outcome::DONE), None)
                    .push(log("b", Outcome::DONE), None)
                    .push(log("c", Outcome::Repeat), None),
            ),
        );
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.run_until_blocked(&clock, &mut seen, 10), StepResult::Repeat);
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn run_until_blocked_respects_budget() {
        let mut machine = machine_for(
            ProgramBuilder::new().stream(
                "main",
                StreamBuilder::new()
                    .push(log("a", Outcome::DONE), None)
                    .push(log("b", Outcome::DONE), None)
                    .push(log("c", Outcome::DONE), None),
            ),
        );
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();
        machine.start_named("main").unwrap();

        assert_eq!(machine.run_until_blocked(&clock, &mut seen, 2), StepResult::Completed);
        assert_eq!(seen, vec!["a", "b"]);
        assert!(machine.is_running());
    }

    #[test]
    fn run_until_blocked_with_zero_budget_reports_state() {
        let mut machine = machine_for(ProgramBuilder::new().stream(
            "main",
            StreamBuilder::new().push(log("a", Outcome::Repeat), None),
        ));
        let clock = ManualClock::new(0);
        let mut seen = Vec::new();

        assert_eq!(machine.run_until_blocked(&clock, &mut seen, 0), StepResult::Idle);

        machine.start_named("main").unwrap();
        assert_eq!(machine.run_until_blocked(&clock, &mut seen, 0), StepResult::Repeat);
        assert!(machine.is_running());
        assert!(seen.is_empty());
    }
}
