//! Chunked input sources.
//!
//! A [`ChunkSource`] hands the driver one span at a time. It distinguishes
//! "nothing available yet" ([`SourceChunk::Pending`]) from end of stream
//! ([`SourceChunk::Complete`]); the driver suspends on the former and treats
//! the latter as final.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// One delivery from a [`ChunkSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceChunk<'a> {
    /// The next span of bytes. May split a logical unit anywhere.
    Data(&'a [u8]),
    /// No bytes right now; more may arrive later.
    Pending,
    /// End of stream.
    Complete,
}

/// Resumable iterator over externally buffered input.
pub trait ChunkSource {
    /// The next delivery. The returned span is valid until the next call.
    fn next_chunk(&mut self) -> SourceChunk<'_>;
}

/// A complete in-memory buffer delivered in pieces.
///
/// Splits either at a fixed chunk length or at caller-chosen offsets, then
/// reports [`SourceChunk::Complete`].
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
    splits: Splits<'a>,
}

#[derive(Clone, Debug)]
enum Splits<'a> {
    Fixed(usize),
    At(&'a [usize]),
}

impl<'a> SliceSource<'a> {
    /// Deliver `data` as a single chunk.
    pub fn whole(data: &'a [u8]) -> Self {
        Self::fixed(data, usize::MAX)
    }

    /// Deliver `data` in chunks of `chunk_len` bytes (the last may be shorter).
    ///
    /// A `chunk_len` of zero is treated as one.
    pub fn fixed(data: &'a [u8], chunk_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            splits: Splits::Fixed(chunk_len.max(1)),
        }
    }

    /// Deliver `data` split at the given ascending offsets.
    ///
    /// Offsets that are out of order or past the end are skipped.
    pub fn split_at(data: &'a [u8], offsets: &'a [usize]) -> Self {
        Self {
            data,
            pos: 0,
            splits: Splits::At(offsets),
        }
    }

    /// Bytes not yet delivered.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn next_end(&mut self) -> usize {
        let len = self.data.len();
        match &mut self.splits {
            Splits::Fixed(n) => self.pos.saturating_add(*n).min(len),
            Splits::At(offsets) => {
                while let [first, rest @ ..] = *offsets {
                    *offsets = rest;
                    if *first > self.pos && *first < len {
                        return *first;
                    }
                }
                len
            }
        }
    }
}

impl ChunkSource for SliceSource<'_> {
    fn next_chunk(&mut self) -> SourceChunk<'_> {
        if self.pos >= self.data.len() {
            return SourceChunk::Complete;
        }
        let start = self.pos;
        let end = self.next_end();
        self.pos = end;
        SourceChunk::Data(&self.data[start..end])
    }
}

/// Owned chunks pushed over time, as from a network stream.
///
/// Reports [`SourceChunk::Pending`] while empty and open, and
/// [`SourceChunk::Complete`] once empty and [closed](Self::close).
#[derive(Debug, Default)]
pub struct ChunkQueue {
    queue: VecDeque<Vec<u8>>,
    current: Vec<u8>,
    closed: bool,
}

impl ChunkQueue {
    /// An open, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk.
    pub fn push(&mut self, chunk: impl Into<Vec<u8>>) {
        self.queue.push_back(chunk.into());
    }

    /// Mark end of stream. Queued chunks are still delivered.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close()`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of chunks waiting.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no chunks are waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl ChunkSource for ChunkQueue {
    fn next_chunk(&mut self) -> SourceChunk<'_> {
        match self.queue.pop_front() {
            Some(chunk) => {
                self.current = chunk;
                SourceChunk::Data(&self.current)
            }
            None if self.closed => SourceChunk::Complete,
            None => SourceChunk::Pending,
        }
    }
}
