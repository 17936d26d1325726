//! Core engine primitives.
//!
//! This module contains the pure building blocks the dispatch engine is made of:
//! - The wraparound-safe `Timer`
//! - The `Outcome` a step reports back
//! - The `TickSource` abstraction and two implementations
//! - Build-time `EngineConfig`
//!
//! Nothing here touches a stream or a machine cursor.

mod config;
mod outcome;
mod tick;
mod timer;

pub use config::{EngineConfig, DEFAULT_TICK_RATE_HZ};
pub use outcome::Outcome;
pub use tick::{ManualClock, MonotonicClock, TickSource};
pub use timer::Timer;
