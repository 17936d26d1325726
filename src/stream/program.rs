//! Immutable, shareable sets of named streams.

use crate::core::EngineConfig;
use crate::stream::entry::{Entry, Step};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a stream within its [`Program`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamId(usize);

impl StreamId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of a machine: a stream and an entry index within it.
///
/// Cursors handed out by a [`Program`] always point at a step entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    stream: StreamId,
    index: usize,
}

impl Cursor {
    pub(crate) const fn new(stream: StreamId, index: usize) -> Self {
        Self { stream, index }
    }

    /// First entry of a stream.
    pub(crate) const fn head(stream: StreamId) -> Self {
        Self { stream, index: 0 }
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered, immutable sequence of entries.
pub struct Stream<C> {
    name: String,
    entries: Vec<Entry<C>>,
}

impl<C> Stream<C> {
    pub(crate) fn new(name: String, entries: Vec<Entry<C>>) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Entry<C>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step at `index`, or `None` when out of range or on an operand.
    pub fn step_at(&self, index: usize) -> Option<&Step<C>> {
        self.entries.get(index).and_then(Entry::as_step)
    }
}

impl<C> fmt::Debug for Stream<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("name", &self.name)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Validated set of streams that machines are bound to.
///
/// A program is only produced by
/// [`ProgramBuilder::build`](crate::builder::ProgramBuilder::build), which
/// guarantees every stream is non-empty, starts with a step, carries exactly
/// the operands its steps expect, and only jumps to streams it contains. It is
/// never mutated afterwards, so any number of machines can share one through
/// an `Arc`.
pub struct Program<C> {
    streams: Vec<Stream<C>>,
    names: HashMap<String, StreamId>,
    config: EngineConfig,
}

impl<C> Program<C> {
    pub(crate) fn new(streams: Vec<Stream<C>>, config: EngineConfig) -> Self {
        let names = streams
            .iter()
            .enumerate()
            .map(|(index, stream)| (stream.name.clone(), StreamId::new(index)))
            .collect();

        Self {
            streams,
            names,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Look up a stream by name.
    pub fn stream_id(&self, name: &str) -> Option<StreamId> {
        self.names.get(name).copied()
    }

    pub fn stream(&self, id: StreamId) -> Option<&Stream<C>> {
        self.streams.get(id.index())
    }

    pub fn streams(&self) -> impl Iterator<Item = (StreamId, &Stream<C>)> {
        self.streams
            .iter()
            .enumerate()
            .map(|(index, stream)| (StreamId::new(index), stream))
    }

    /// Cursor at the first step of a stream in this program.
    pub fn head(&self, id: StreamId) -> Option<Cursor> {
        self.stream(id).map(|_| Cursor::head(id))
    }

    /// Step a cursor points at, if the cursor belongs to this program.
    pub fn step_at(&self, cursor: Cursor) -> Option<&Step<C>> {
        self.stream(cursor.stream)?.step_at(cursor.index)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl<C> fmt::Debug for Program<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("streams", &self.streams)
            .field("config", &self.config)
            .finish()
    }
}
