//! Builder for constructing validated programs.

use crate::builder::error::{BuildError, BuildErrors};
use crate::builder::stream::{Operand, StreamBuilder};
use crate::core::EngineConfig;
use crate::stream::{Entry, Immediate, Program, Step, Stream, StreamId};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing programs with a fluent API.
///
/// Streams may jump to any stream of the same builder, including ones added
/// later and themselves. Validation collects every problem instead of
/// stopping at the first.
pub struct ProgramBuilder<C> {
    config: EngineConfig,
    streams: Vec<(String, StreamBuilder<C>)>,
}

impl<C: 'static> ProgramBuilder<C> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            streams: Vec::new(),
        }
    }

    /// Replace the configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how many ticks the tick source advances per second.
    pub fn tick_rate(mut self, hz: u32) -> Self {
        self.config.tick_rate_hz = hz;
        self
    }

    /// Add a named stream. The first stream added gets `StreamId` 0.
    pub fn stream(mut self, name: impl Into<String>, builder: StreamBuilder<C>) -> Self {
        self.streams.push((name.into(), builder));
        self
    }

    /// Validate every stream and produce an immutable program.
    pub fn build(self) -> Result<Program<C>, BuildErrors> {
        let config = self.config;
        let mut checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = Vec::new();

        if config.tick_rate_hz == 0 {
            checks.push(Validation::fail(BuildError::InvalidTickRate));
        }
        if self.streams.is_empty() {
            checks.push(Validation::fail(BuildError::NoStreams));
        }

        let mut ids: HashMap<String, StreamId> = HashMap::new();
        for (index, (name, _)) in self.streams.iter().enumerate() {
            if ids.contains_key(name) {
                checks.push(Validation::fail(BuildError::DuplicateStream {
                    stream: name.clone(),
                }));
            } else {
                ids.insert(name.clone(), StreamId::new(index));
            }
        }

        let mut streams = Vec::with_capacity(self.streams.len());
        for (name, builder) in self.streams {
            if builder.is_empty() {
                checks.push(Validation::fail(BuildError::EmptyStream {
                    stream: name.clone(),
                }));
            }

            let mut entries = Vec::with_capacity(builder.len() * 2);
            for (step, operand) in builder.pairs {
                let index = entries.len();
                let resolved = resolve_operand(&name, index, &step, operand, &ids, &config);
                entries.push(Entry::Step(step));
                match resolved {
                    Ok(Some(immediate)) => entries.push(Entry::Immediate(immediate)),
                    Ok(None) => {}
                    Err(error) => checks.push(Validation::fail(error)),
                }
            }
            streams.push(Stream::new(name, entries));
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => {
                tracing::debug!(
                    streams = streams.len(),
                    tick_rate_hz = config.tick_rate_hz,
                    "program built"
                );
                Ok(Program::new(streams, config))
            }
            Validation::Failure(errors) => Err(BuildErrors::new(errors.iter().cloned().collect())),
        }
    }
}

impl<C: 'static> Default for ProgramBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check one (step, operand) pair and turn the operand into an immediate.
fn resolve_operand<C>(
    stream: &str,
    index: usize,
    step: &Step<C>,
    operand: Option<Operand>,
    ids: &HashMap<String, StreamId>,
    config: &EngineConfig,
) -> Result<Option<Immediate>, BuildError> {
    let duration = |ticks: u64| {
        u16::try_from(ticks)
            .map(|ticks| Some(Immediate::Ticks(ticks)))
            .map_err(|_| BuildError::DurationOutOfRange {
                stream: stream.to_string(),
                index,
                ticks,
            })
    };

    match (step.operand(), operand) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(BuildError::UnexpectedOperand {
            stream: stream.to_string(),
            index,
            step: step.name().to_string(),
        }),
        (Some(expected), None) => Err(BuildError::MissingOperand {
            stream: stream.to_string(),
            index,
            step: step.name().to_string(),
            expected,
        }),
        (Some(expected), Some(operand)) if operand.kind() != expected => {
            Err(BuildError::OperandMismatch {
                stream: stream.to_string(),
                index,
                step: step.name().to_string(),
                expected,
                found: operand.kind(),
            })
        }
        (Some(_), Some(Operand::Millis(ms))) => duration(config.ms_to_ticks(ms)),
        (Some(_), Some(Operand::Ticks(ticks))) => duration(u64::from(ticks)),
        (Some(_), Some(Operand::Stream(target))) => match ids.get(&target) {
            Some(id) => Ok(Some(Immediate::Stream(*id))),
            None => Err(BuildError::UnknownJumpTarget {
                stream: stream.to_string(),
                index,
                target,
            }),
        },
    }
}
