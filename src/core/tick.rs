//! Tick sources polled by the timer steps.
//!
//! The engine never owns time. It reads a monotonically increasing millisecond
//! counter through [`TickSource`]; only the low 16 bits need to be meaningful.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond counter.
///
/// Reading the counter cannot fail. Implementations may wrap at any width of
/// at least 16 bits.
pub trait TickSource {
    fn now_ms(&self) -> u32;
}

impl<F> TickSource for F
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        self()
    }
}

/// Wall-clock-independent tick source backed by [`Instant`].
///
/// Counts milliseconds since the clock was created, wrapping at `u32::MAX`.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}

/// Tick source that only moves when told to.
///
/// Useful for deterministic tests and for hosts that drive time from an
/// interrupt-updated counter.
///
/// # Example
///
/// ```rust
/// use steptable::core::{ManualClock, TickSource};
///
/// let clock = ManualClock::new(0);
/// clock.advance(15);
/// assert_eq!(clock.now_ms(), 15);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn new(start: u32) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }

    /// Move the counter forward, wrapping at `u32::MAX`.
    pub fn advance(&self, ticks: u32) {
        self.now.set(self.now.get().wrapping_add(ticks));
    }
}

impl TickSource for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
