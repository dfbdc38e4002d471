//! The streaming decode driver.
//!
//! [`StreamDecoder`] is invoked synchronously whenever input is available.
//! It feeds each chunk to the engine (through the [`ChunkAssembler`] when a
//! reassembly is in progress), consults the metadata gate after every
//! successful call, and extracts the frame once the engine reports it ready.
//! When the source runs dry it returns [`LexerResult::NeedMoreData`]; the
//! caller resumes it later with the same source, or simply drops it to
//! cancel.
//!
//! ```
//! use zenstream::{
//!     DecodeEngine, DecoderConfig, EngineStatus, ImageSize, LexerResult, SliceSource,
//!     StreamDecoder, SurfaceTarget,
//! };
//!
//! /// Accepts any input and produces a 2×2 gray frame.
//! struct Flat;
//!
//! impl DecodeEngine for Flat {
//!     fn process(&mut self, _data: &[u8]) -> EngineStatus {
//!         EngineStatus::Ok
//!     }
//!     fn info(&self) -> Option<ImageSize> {
//!         Some(ImageSize::new(2, 2))
//!     }
//!     fn is_frame_ready(&self) -> bool {
//!         true
//!     }
//!     fn decode_frame(&mut self, out: &mut [u32]) -> (EngineStatus, usize) {
//!         out.fill(0xFF80_8080);
//!         (EngineStatus::Ok, out.len())
//!     }
//! }
//!
//! let mut decoder = StreamDecoder::new(
//!     DecoderConfig::new(),
//!     |_metadata_only: bool| Some(Flat),
//!     SurfaceTarget::new(),
//! );
//! let result = decoder.decode(&mut SliceSource::whole(b"any bytes"));
//! assert!(matches!(result, LexerResult::Success(_)));
//!
//! let output = decoder.into_target().into_output().unwrap();
//! assert_eq!(output.width(), 2);
//! ```

use crate::error::log_failure;
use crate::frame::extract_frame;
use crate::gate::{GateOutcome, MetadataGate};
use crate::status::{Disposition, interpret};
use crate::{
    ChunkAssembler, ChunkSource, Completion, ContractViolation, DecodeEngine, DecodeError,
    DecodeTarget, DecoderConfig, EngineFactory, ImageSize, LexerResult, ResourceLimits,
    SourceChunk, State, StreamingLexer, Transition,
};

/// Incremental decode driver for a single still image.
pub struct StreamDecoder<F: EngineFactory, T: DecodeTarget> {
    config: DecoderConfig,
    factory: F,
    engine: Option<F::Engine>,
    lexer: StreamingLexer,
    assembler: ChunkAssembler,
    gate: MetadataGate,
    target: T,
    bytes_in: u64,
}

impl<F, T> StreamDecoder<F, T>
where
    F: EngineFactory,
    T: DecodeTarget,
{
    /// Create a driver. No engine is created until the first non-empty chunk.
    pub fn new(config: DecoderConfig, factory: F, target: T) -> Self {
        Self {
            config,
            factory,
            engine: None,
            lexer: StreamingLexer::new(),
            assembler: ChunkAssembler::new(),
            gate: MetadataGate::default(),
            target,
            bytes_in: 0,
        }
    }

    /// Drain `source` until it is pending, complete, or the session ends.
    ///
    /// Returns [`LexerResult::NeedMoreData`] when the source has nothing
    /// right now. End of stream before a terminal result is a
    /// [`ContractViolation::EndOfStreamBeforeCompletion`].
    pub fn decode<S: ChunkSource + ?Sized>(&mut self, source: &mut S) -> LexerResult {
        if self.lexer.is_terminated() {
            return resumed_after_termination();
        }
        loop {
            let transition = match source.next_chunk() {
                SourceChunk::Data(chunk) => self.read_data(chunk),
                SourceChunk::Pending => return LexerResult::NeedMoreData,
                SourceChunk::Complete => return self.finish(),
            };
            if let Some(result) = self.lexer.apply(transition) {
                self.release();
                return result;
            }
        }
    }

    /// Handle one chunk directly, without a [`ChunkSource`].
    ///
    /// Returns [`LexerResult::NeedMoreData`] if the session continues.
    pub fn feed(&mut self, chunk: &[u8]) -> LexerResult {
        if self.lexer.is_terminated() {
            return resumed_after_termination();
        }
        let transition = self.read_data(chunk);
        match self.lexer.apply(transition) {
            Some(result) => {
                self.release();
                result
            }
            None => LexerResult::NeedMoreData,
        }
    }

    /// Signal end of stream.
    ///
    /// Every valid stream terminates before its input runs out, so reaching
    /// this while the session is running is always a failure.
    pub fn finish(&mut self) -> LexerResult {
        if self.lexer.is_terminated() {
            return resumed_after_termination();
        }
        let result = self.lexer.finish();
        self.release();
        result
    }

    /// Image size, once the metadata gate has fired.
    pub fn size(&self) -> Option<ImageSize> {
        self.gate.size()
    }

    /// Lexer state.
    pub fn state(&self) -> State {
        self.lexer.state()
    }

    /// Whether the session has ended.
    pub fn is_terminated(&self) -> bool {
        self.lexer.is_terminated()
    }

    /// Whether an engine handle is currently alive.
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Bytes held back for reassembly.
    pub fn pending_len(&self) -> usize {
        self.assembler.pending_len()
    }

    /// Session configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Borrow the output target.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutably borrow the output target.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Consume the driver and return the output target.
    pub fn into_target(self) -> T {
        self.target
    }

    fn read_data(&mut self, chunk: &[u8]) -> Transition {
        match self.process_chunk(chunk) {
            Ok(Some(done)) => Transition::TerminateSuccess(done),
            Ok(None) => Transition::Continue,
            Err(err) => {
                log_failure(&err);
                Transition::TerminateFailure(err)
            }
        }
    }

    fn process_chunk(&mut self, chunk: &[u8]) -> Result<Option<Completion>, DecodeError> {
        if chunk.is_empty() {
            return Ok(None);
        }
        self.bytes_in = self.bytes_in.saturating_add(chunk.len() as u64);
        self.config.limits.check_input(self.bytes_in)?;

        if self.engine.is_none() {
            let engine = self
                .factory
                .create(self.config.metadata_only)
                .ok_or(DecodeError::EngineUnavailable)?;
            log::trace!("engine created (metadata_only={})", self.config.metadata_only);
            self.engine = Some(engine);
        }
        let Some(engine) = self.engine.as_mut() else {
            return Err(DecodeError::EngineUnavailable);
        };

        let span = self.assembler.span(chunk)?;
        log::trace!("process {} bytes ({} new)", span.len(), chunk.len());
        match interpret(engine.process(span)) {
            Disposition::Advance => self.assembler.clear(),
            Disposition::Wait => {
                let hint = capped_hint(
                    engine.bytes_needed(),
                    &self.config.limits,
                    self.bytes_in,
                );
                self.assembler.hold(chunk, hint)?;
                return Ok(None);
            }
            Disposition::Fail(err) => return Err(err),
        }

        let size = match self.gate.observe(
            &*engine,
            &mut self.target,
            &self.config.limits,
            self.config.metadata_only,
        )? {
            GateOutcome::Pending => return Ok(None),
            GateOutcome::MetadataDone(_) => return Ok(Some(Completion::Metadata)),
            GateOutcome::Known(size) => size,
        };

        // Metadata and a ready frame can both appear after a single call.
        if !engine.is_frame_ready() {
            return Ok(None);
        }
        extract_frame(
            engine,
            &mut self.target,
            size,
            self.config.output_size,
            &self.config.limits,
        )?;
        Ok(Some(Completion::Frame))
    }

    /// Release the engine and pending input once the session has ended.
    fn release(&mut self) {
        if self.engine.take().is_some() {
            log::trace!("engine released");
        }
        self.assembler = ChunkAssembler::new();
    }
}

/// Limit an engine's bytes-needed hint to what the session may still buffer.
fn capped_hint(hint: Option<usize>, limits: &ResourceLimits, consumed: u64) -> Option<usize> {
    let hint = hint?;
    match limits.pending_headroom(consumed) {
        Some(left) => Some(hint.min(usize::try_from(left).unwrap_or(usize::MAX))),
        None => Some(hint),
    }
}

fn resumed_after_termination() -> LexerResult {
    let err: DecodeError = ContractViolation::ResumedAfterTermination.into();
    log_failure(&err);
    LexerResult::Failure(err)
}

impl<F, T> core::fmt::Debug for StreamDecoder<F, T>
where
    F: EngineFactory,
    T: DecodeTarget,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("config", &self.config)
            .field("state", &self.lexer.state())
            .field("terminated", &self.lexer.is_terminated())
            .field("size", &self.gate.size())
            .field("has_engine", &self.engine.is_some())
            .field("pending", &self.assembler.pending_len())
            .field("bytes_in", &self.bytes_in)
            .finish_non_exhaustive()
    }
}
