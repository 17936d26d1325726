//! Context handed to a step handler for the duration of one dispatch.

use crate::core::{TickSource, Timer};
use crate::stream::{Cursor, Entry, Immediate, StreamId};

/// Everything a handler may touch while it runs.
///
/// The context borrows the owning machine's timer, the entries that follow the
/// running step, the tick source, and the application data passed to
/// [`Machine::step`](crate::engine::Machine::step). Handlers that need shared
/// state (a ring buffer, a device handle) reach it through [`data_mut`].
///
/// [`data_mut`]: StepContext::data_mut
pub struct StepContext<'a, C> {
    position: Cursor,
    following: &'a [Entry<C>],
    timer: &'a mut Timer,
    clock: &'a dyn TickSource,
    data: &'a mut C,
    relocation: Option<Cursor>,
}

impl<'a, C> StepContext<'a, C> {
    pub(crate) fn new(
        position: Cursor,
        following: &'a [Entry<C>],
        timer: &'a mut Timer,
        clock: &'a dyn TickSource,
        data: &'a mut C,
    ) -> Self {
        Self {
            position,
            following,
            timer,
            clock,
            data,
            relocation: None,
        }
    }

    /// Where the running step sits.
    pub fn position(&self) -> Cursor {
        self.position
    }

    pub fn data(&self) -> &C {
        &*self.data
    }

    pub fn data_mut(&mut self) -> &mut C {
        &mut *self.data
    }

    /// Read the tick source.
    pub fn now(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Arm the machine's timer for `ticks` from now.
    pub fn arm_timer(&mut self, ticks: u16) {
        let now = self.clock.now_ms();
        self.timer.arm(now, ticks);
    }

    /// Check the machine's timer against the tick source.
    pub fn timer_expired(&self) -> bool {
        self.timer.is_expired(self.clock.now_ms())
    }

    pub fn timer(&self) -> &Timer {
        &*self.timer
    }

    /// Operand `offset` entries after the running step, starting at 0.
    ///
    /// Returns `None` when that entry is a step or lies past the stream end.
    pub fn operand(&self, offset: usize) -> Option<&Immediate> {
        self.following.get(offset).and_then(Entry::as_immediate)
    }

    /// The duration operand directly after the running step.
    pub fn ticks_operand(&self) -> Option<u16> {
        match self.operand(0) {
            Some(Immediate::Ticks(ticks)) => Some(*ticks),
            _ => None,
        }
    }

    /// The stream operand directly after the running step.
    pub fn stream_operand(&self) -> Option<StreamId> {
        match self.operand(0) {
            Some(Immediate::Stream(stream)) => Some(*stream),
            _ => None,
        }
    }

    /// Move the machine to the head of `stream`.
    ///
    /// The outcome returned by the handler is then applied from that head, so
    /// a relocating step normally returns [`Outcome::Repeat`] to run the
    /// target's first step on the next dispatch.
    ///
    /// [`Outcome::Repeat`]: crate::core::Outcome::Repeat
    pub fn jump(&mut self, stream: StreamId) {
        self.relocation = Some(Cursor::head(stream));
    }

    pub(crate) fn relocation(&self) -> Option<Cursor> {
        self.relocation
    }
}
