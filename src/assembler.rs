//! Reassembly of fragmented input.
//!
//! The engine consumes nothing from a span it answers with `NeedMoreData`,
//! so those bytes must be presented again together with the next chunk.
//! [`ChunkAssembler`] owns that pending buffer. While it is empty, chunks
//! pass straight through without a copy.

use alloc::vec::Vec;

use crate::DecodeError;

/// Owner of the pending (not yet consumed) input bytes.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    pending: Vec<u8>,
}

impl ChunkAssembler {
    /// Largest reservation made on the strength of an engine hint.
    pub const MAX_HINT_RESERVE: usize = 1 << 20;

    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reassembly is in progress.
    pub fn is_accumulating(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of bytes held back.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The span to hand the engine for `chunk`.
    ///
    /// Without a reassembly in progress this is `chunk` itself. Otherwise
    /// `chunk` is appended to the pending bytes and the whole accumulated
    /// span is returned.
    pub fn span<'a>(&'a mut self, chunk: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        if self.pending.is_empty() {
            return Ok(chunk);
        }
        append(&mut self.pending, chunk)?;
        Ok(&self.pending)
    }

    /// Keep `chunk` after the engine answered it with `NeedMoreData`.
    ///
    /// Call with the same chunk that was passed to [`span()`](Self::span).
    /// When a reassembly was already running the chunk is in the buffer and
    /// this is a no-op. `hint` is the engine's estimate of missing bytes. It
    /// only sizes a best-effort reservation of at most
    /// [`MAX_HINT_RESERVE`](Self::MAX_HINT_RESERVE) bytes; only a failure to
    /// store `chunk` itself is an error.
    pub fn hold(&mut self, chunk: &[u8], hint: Option<usize>) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            append(&mut self.pending, chunk)?;
        }
        if let Some(more) = hint {
            let more = more.min(Self::MAX_HINT_RESERVE);
            if self.pending.try_reserve(more).is_err() {
                log::debug!("pending input: ignoring size hint of {more} bytes");
            }
        }
        Ok(())
    }

    /// Bytes the pending buffer can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.pending.capacity()
    }

    /// Drop the pending bytes after the engine consumed them.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

fn append(buf: &mut Vec<u8>, data: &[u8]) -> Result<(), DecodeError> {
    buf.try_reserve(data.len())
        .map_err(|_| DecodeError::OutOfMemory {
            what: "pending input",
            bytes: buf.len().saturating_add(data.len()),
        })?;
    buf.extend_from_slice(data);
    Ok(())
}
