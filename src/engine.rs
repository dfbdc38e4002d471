//! The decoding engine seam.
//!
//! The driver never parses the bitstream itself. It talks to an opaque
//! [`DecodeEngine`] that consumes bytes and exposes readiness, image info,
//! and a full-resolution frame decode. Engines are created lazily through an
//! [`EngineFactory`] when the first chunk arrives, and released by `Drop`
//! when the session terminates.

use crate::ImageSize;

/// Outcome of an engine call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// The call succeeded and consumed its whole input span.
    Ok,
    /// The engine needs more bytes and consumed nothing of this span.
    NeedMoreData,
    /// The stream is malformed.
    InvalidData,
    /// Internal engine failure.
    Error,
}

impl EngineStatus {
    /// Map a raw status code from a foreign engine.
    ///
    /// `0..=3` map to `Ok`, `NeedMoreData`, `InvalidData`, `Error`. Any
    /// other code is treated as [`EngineStatus::Error`].
    pub const fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::NeedMoreData,
            2 => Self::InvalidData,
            _ => Self::Error,
        }
    }
}

/// A live decoding handle.
///
/// # Input contract
///
/// The driver hands [`process()`](DecodeEngine::process) a span that starts
/// at the first byte the engine has not yet consumed:
///
/// - If `process` returns [`EngineStatus::NeedMoreData`], it consumed none
///   of the span. The driver keeps those bytes and presents them again,
///   followed by the next chunk.
/// - Any other status means the whole span was consumed. The engine keeps
///   whatever partial state it needs internally.
///
/// The engine never sees a span shorter than one it previously rejected with
/// `NeedMoreData`.
///
/// # Release
///
/// Dropping the engine releases it. The driver drops it exactly once, as
/// soon as the session terminates.
pub trait DecodeEngine {
    /// Feed a span of encoded bytes.
    fn process(&mut self, data: &[u8]) -> EngineStatus;

    /// How many more bytes the engine expects before it can make progress.
    ///
    /// Only a sizing hint for the pending buffer. Default: unknown.
    fn bytes_needed(&self) -> Option<usize> {
        None
    }

    /// Image dimensions, once the header has been parsed.
    fn info(&self) -> Option<ImageSize>;

    /// Whether a complete frame can be decoded now.
    fn is_frame_ready(&self) -> bool;

    /// Decode the ready frame at full resolution into `out`.
    ///
    /// Pixels are packed `0xXXRRGGBB` (see
    /// [`PixelFormat::Bgrx8`](crate::PixelFormat::Bgrx8)), row-major with no
    /// padding. Returns the status and the number of pixels written.
    fn decode_frame(&mut self, out: &mut [u32]) -> (EngineStatus, usize);
}

/// Creates [`DecodeEngine`] handles.
///
/// Implemented for any `FnMut(bool) -> Option<E>` closure, where the
/// argument is `metadata_only`.
pub trait EngineFactory {
    /// Engine type produced by this factory.
    type Engine: DecodeEngine;

    /// Create a handle. `None` means the engine could not be created.
    fn create(&mut self, metadata_only: bool) -> Option<Self::Engine>;
}

impl<F, E> EngineFactory for F
where
    F: FnMut(bool) -> Option<E>,
    E: DecodeEngine,
{
    type Engine = E;

    fn create(&mut self, metadata_only: bool) -> Option<E> {
        self(metadata_only)
    }
}
