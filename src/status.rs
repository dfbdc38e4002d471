//! Maps engine statuses onto driver actions.

use crate::{DecodeError, EngineStatus};

/// What the driver does after a `process` call.
#[derive(Debug)]
pub(crate) enum Disposition {
    /// Bytes were consumed: check the metadata gate, then frame readiness.
    Advance,
    /// Nothing was consumed: keep the span and wait for the next chunk.
    Wait,
    /// Terminal failure. No further engine calls are made.
    Fail(DecodeError),
}

/// Interpret the status returned by [`DecodeEngine::process`](crate::DecodeEngine::process).
///
/// Malformed and corrupt streams are not recoverable by re-feeding, so
/// `InvalidData` and `Error` are terminal.
pub(crate) fn interpret(status: EngineStatus) -> Disposition {
    match status {
        EngineStatus::Ok => Disposition::Advance,
        EngineStatus::NeedMoreData => Disposition::Wait,
        EngineStatus::InvalidData => Disposition::Fail(DecodeError::InvalidData),
        EngineStatus::Error => Disposition::Fail(DecodeError::Engine),
    }
}

/// Map a non-`Ok` frame-decode status onto its error.
pub(crate) fn frame_failure(status: EngineStatus) -> DecodeError {
    match status {
        EngineStatus::InvalidData => DecodeError::InvalidData,
        // `NeedMoreData` after the engine claimed a ready frame is an engine fault.
        _ => DecodeError::Engine,
    }
}
