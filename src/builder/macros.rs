//! Macros for writing stream tables.

/// Build a [`StreamBuilder`](crate::builder::StreamBuilder) from a table of
/// builder calls, one row per step.
///
/// # Example
///
/// ```
/// use steptable::builder::ProgramBuilder;
/// use steptable::core::Outcome;
/// use steptable::stream;
///
/// let program = ProgramBuilder::<()>::new()
///     .stream(
///         "blink",
///         stream![
///             step("led_on", |_ctx| Outcome::DONE),
///             delay_ms(500),
///             step("led_off", |_ctx| Outcome::DONE),
///             delay_ms(500),
///             jump("blink"),
///         ],
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(program.len(), 1);
/// ```
#[macro_export]
macro_rules! stream {
    (
        $(
            $method:ident ( $($arg:expr),* $(,)? )
        ),* $(,)?
    ) => {
        $crate::builder::StreamBuilder::new()
            $( .$method($($arg),*) )*
    };
}
