//! Steptable: a cooperative, table-driven state machine engine
//!
//! Steptable runs state machines one step at a time for single-threaded
//! control loops. A machine walks a stream of entries: ordinary steps, inline
//! timer delays, and jumps to other streams. Each step reports whether to
//! repeat, advance, or abort; the engine moves the machine's cursor
//! accordingly and returns control to the caller's loop.
//!
//! # Core Concepts
//!
//! - **Stream**: immutable sequence of steps and the operands they read
//! - **Program**: a validated, shareable set of named streams
//! - **Machine**: a cursor and a timer bound to a program
//! - **Outcome**: abort, repeat, or advance-by-N, reported by every step
//! - **Timer**: 16-bit wraparound-safe delay, polled never awaited
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use steptable::builder::{ProgramBuilder, StreamBuilder};
//! use steptable::core::{ManualClock, Outcome};
//! use steptable::engine::{Machine, StepResult};
//!
//! let program = ProgramBuilder::<Vec<u32>>::new()
//!     .stream(
//!         "sample",
//!         StreamBuilder::<Vec<u32>>::new()
//!             .delay_ms(10)
//!             .step("record", |ctx| {
//!                 let now = ctx.now();
//!                 ctx.data_mut().push(now);
//!                 Outcome::DONE
//!             })
//!             .jump("sample"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let clock = ManualClock::new(0);
//! let mut samples = Vec::new();
//! let mut machine = Machine::new("sampler", Arc::new(program));
//! machine.start_named("sample").unwrap();
//!
//! for _ in 0..100 {
//!     machine.run_until_blocked(&clock, &mut samples, 8);
//!     clock.advance(1);
//! }
//!
//! assert!(machine.is_running());
//! assert_eq!(samples.first(), Some(&10));
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod stream;

// Re-export commonly used types
pub use builder::{BuildError, ProgramBuilder, StreamBuilder};
pub use self::core::{Outcome, TickSource, Timer};
pub use engine::{Machine, StepContext, StepResult};
pub use stream::{Program, StreamId};
