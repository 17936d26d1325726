//! Wraparound-safe one-shot timer.
//!
//! The timer stores only the low 16 bits of the tick counter at arm time and a
//! duration. Expiry is a fresh modular subtraction on every check, so a counter
//! rolling over past 65535 needs no special handling. The window is bounded on
//! purpose: a duration must fit in 16 bits, and the timer has to be polled at
//! least once before the counter moves a full period past the arm point.

use serde::{Deserialize, Serialize};

/// Timer state embedded in every machine.
///
/// All methods are pure; the caller supplies the current tick reading.
///
/// # Example
///
/// ```rust
/// use steptable::core::Timer;
///
/// let mut timer = Timer::default();
/// timer.arm(65_530, 10);
///
/// assert!(!timer.is_expired(65_535));
/// assert!(!timer.is_expired(65_539)); // counter wrapped, 9 ticks elapsed
/// assert!(timer.is_expired(65_540));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    armed_at: u16,
    duration: u16,
}

impl Timer {
    /// Record `now` (truncated to 16 bits) as the arm point.
    pub fn arm(&mut self, now: u32, duration: u16) {
        self.armed_at = now as u16;
        self.duration = duration;
    }

    /// Ticks elapsed since arming, modulo 65536.
    pub fn elapsed(&self, now: u32) -> u16 {
        (now as u16).wrapping_sub(self.armed_at)
    }

    /// Check whether at least `duration` ticks have passed since arming.
    pub fn is_expired(&self, now: u32) -> bool {
        self.elapsed(now) >= self.duration
    }

    /// Ticks left before expiry, zero once expired.
    pub fn remaining(&self, now: u32) -> u16 {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn armed_at(&self) -> u16 {
        self.armed_at
    }

    pub fn duration(&self) -> u16 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_timer_is_expired() {
        let timer = Timer::default();
        assert!(timer.is_expired(0));
        assert!(timer.is_expired(12_345));
    }

    #[test]
    fn expires_exactly_at_duration() {
        let mut timer = Timer::default();
        timer.arm(100, 10);

        assert!(!timer.is_expired(100));
        assert!(!timer.is_expired(109));
        assert!(timer.is_expired(110));
        assert!(timer.is_expired(200));
    }

    #[test]
    fn arm_truncates_to_sixteen_bits() {
        let mut timer = Timer::default();
        timer.arm(0x0001_0005, 3);

        assert_eq!(timer.armed_at(), 5);
        assert!(!timer.is_expired(0x0002_0007));
        assert!(timer.is_expired(0x0002_0008));
    }

    #[test]
    fn expiry_survives_counter_wrap() {
        let mut timer = Timer::default();
        timer.arm(u16::MAX as u32 - 2, 5);

        assert!(!timer.is_expired(u16::MAX as u32));
        assert!(!timer.is_expired(u16::MAX as u32 + 2));
        assert!(timer.is_expired(u16::MAX as u32 + 3));
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let mut timer = Timer::default();
        timer.arm(42, 0);
        assert!(timer.is_expired(42));
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let mut timer = Timer::default();
        timer.arm(1_000, 50);

        assert_eq!(timer.remaining(1_000), 50);
        assert_eq!(timer.remaining(1_030), 20);
        assert_eq!(timer.remaining(1_050), 0);
        assert_eq!(timer.remaining(1_070), 0);
    }

    #[test]
    fn rearming_replaces_previous_state() {
        let mut timer = Timer::default();
        timer.arm(0, 100);
        timer.arm(500, 5);

        assert_eq!(timer.armed_at(), 500);
        assert_eq!(timer.duration(), 5);
        assert!(timer.is_expired(505));
    }

    #[test]
    fn timer_serializes_correctly() {
        let mut timer = Timer::default();
        timer.arm(7, 9);
        let json = serde_json::to_string(&timer).unwrap();
        let restored: Timer = serde_json::from_str(&json).unwrap();
        assert_eq!(timer, restored);
    }
}
