//! Key Echo: two cooperating machines
//!
//! This demo wires an input machine and an output machine to one ring buffer.
//!
//! Key concepts:
//! - Two machines stepped from one main loop, never blocking
//! - Timeouts expressed as armed timers polled by a step
//! - Branching by skipping jump pairs
//! - Shared application data passed explicitly to every step
//!
//! Keystrokes are scripted so the demo runs unattended.
//!
//! Run with: RUST_LOG=steptable=debug cargo run --example key_echo

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use steptable::builder::ProgramBuilder;
use steptable::core::{MonotonicClock, Outcome, TickSource};
use steptable::engine::{Machine, StepContext};
use steptable::stream;
use tracing_subscriber::EnvFilter;

const RING_SIZE: usize = 512;

/// Shared state for both machines.
struct Console {
    /// Scripted keystrokes: (millisecond offset, byte).
    script: VecDeque<(u32, u8)>,
    started_at: u32,
    ring: [u8; RING_SIZE],
    head: usize,
    tail: usize,
    echoed: String,
}

impl Console {
    fn new(started_at: u32, text: &str) -> Self {
        let script = text
            .bytes()
            .enumerate()
            .map(|(i, byte)| (key_offset_ms(i), byte))
            .collect();
        Self {
            script,
            started_at,
            ring: [0; RING_SIZE],
            head: 0,
            tail: 0,
            echoed: String::new(),
        }
    }

    fn key_ready(&self, now: u32) -> bool {
        self.script
            .front()
            .is_some_and(|(at, _)| now.wrapping_sub(self.started_at) >= *at)
    }
}

/// When the i-th scripted key arrives, with a pause long enough to trip the
/// input timeout after the fifth key.
fn key_offset_ms(i: usize) -> u32 {
    let pause = if i > 4 { 4_000 } else { 0 };
    200 + 150 * i as u32 + pause
}

/// Skip the timeout jump when a key is waiting; nag on timeout.
fn input_available(ctx: &mut StepContext<'_, Console>) -> Outcome {
    if ctx.timer_expired() {
        println!("(no key for 3 seconds)");
        return Outcome::DONE;
    }
    let now = ctx.now();
    if ctx.data().key_ready(now) {
        return Outcome::SKIP_JUMP;
    }
    Outcome::Repeat
}

/// Push one key into the ring buffer; the first jump handles a full buffer.
fn read_key(ctx: &mut StepContext<'_, Console>) -> Outcome {
    let console = ctx.data_mut();
    let next = (console.head + 1) % RING_SIZE;
    if next == console.tail {
        tracing::warn!("ring buffer full, dropping key");
        return Outcome::DONE;
    }
    let Some((_, byte)) = console.script.pop_front() else {
        return Outcome::DONE;
    };
    console.ring[console.head] = byte;
    console.head = next;
    Outcome::SKIP_JUMP
}

/// Echo one buffered key, nagging if nothing arrives in time.
fn print_key(ctx: &mut StepContext<'_, Console>) -> Outcome {
    if ctx.timer_expired() {
        println!("hey give me keys");
        return Outcome::DONE;
    }
    let console = ctx.data_mut();
    if console.head == console.tail {
        return Outcome::Repeat;
    }
    let byte = console.ring[console.tail];
    console.tail = (console.tail + 1) % RING_SIZE;
    console.echoed.push(char::from(byte));
    println!("echo: {}", char::from(byte));
    Outcome::DONE
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Key Echo ===\n");

    let program = ProgramBuilder::<Console>::new()
        .stream(
            "get_key",
            stream![
                set_timer_ms(3000),
                step("input_available", input_available),
                jump("get_key"),
                step("read_key", read_key),
                jump("get_key"),
                jump("get_key"),
            ],
        )
        .stream(
            "display_key",
            stream![
                set_timer_ms(6000),
                step("print_key", print_key),
                jump("display_key"),
            ],
        )
        .build()
        .unwrap_or_else(|errors| panic!("{}", errors));
    let program = Arc::new(program);

    let clock = MonotonicClock::new();
    let text = "hello rust";
    let mut console = Console::new(clock.now_ms(), text);

    let get_key = program.stream_id("get_key").expect("stream exists");
    let display_key = program.stream_id("display_key").expect("stream exists");
    let mut input = Machine::new("input", Arc::clone(&program));
    let mut output = Machine::new("output", Arc::clone(&program));

    while console.echoed.len() < text.len() {
        input.restart_if_stopped(get_key).expect("stream exists");
        input.run_until_blocked(&clock, &mut console, 16);

        output.restart_if_stopped(display_key).expect("stream exists");
        output.run_until_blocked(&clock, &mut console, 16);

        thread::sleep(Duration::from_millis(1));
    }

    println!("\nEchoed: {}", console.echoed);
    println!("\n=== Demo Complete ===");
}
