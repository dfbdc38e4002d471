//! Decode error types.
//!
//! Every failure is terminal. [`DecodeError::class()`] separates failures
//! caused by the input from breaches of the driver's own invariants, which
//! are also logged under the `zenstream::contract` target.

use crate::LimitExceeded;

/// Terminal failure of a streaming decode session.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The engine factory could not create a decoding handle.
    #[error("decoding engine could not be created")]
    EngineUnavailable,

    /// An allocation failed or its size overflowed.
    #[error("out of memory allocating {what} ({bytes} bytes)")]
    OutOfMemory {
        /// Which buffer was being allocated.
        what: &'static str,
        /// Requested size in bytes (saturated on overflow).
        bytes: usize,
    },

    /// The engine rejected the stream as malformed.
    #[error("invalid image data")]
    InvalidData,

    /// The engine reported an internal error or an unrecognized status.
    #[error("decoding engine error")]
    Engine,

    /// A configured resource limit was exceeded.
    #[error("resource limit exceeded: {0}")]
    Limit(#[from] LimitExceeded),

    /// The output sink could not be built or refused a row.
    #[error("output sink failure: {0}")]
    Sink(#[from] SinkError),

    /// The engine or the caller broke the driver's calling contract.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

/// Broad category of a [`DecodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Allocation failure, handle creation failure, or a resource limit.
    ResourceExhaustion,
    /// The stream itself is corrupt or unsupported.
    MalformedInput,
    /// An internal invariant was breached.
    ContractViolation,
    /// The output collaborator failed.
    Sink,
}

impl DecodeError {
    /// Category of this failure.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EngineUnavailable | Self::OutOfMemory { .. } | Self::Limit(_) => {
                ErrorClass::ResourceExhaustion
            }
            Self::InvalidData | Self::Engine => ErrorClass::MalformedInput,
            Self::Sink(_) => ErrorClass::Sink,
            Self::Contract(_) => ErrorClass::ContractViolation,
        }
    }

    /// Whether this failure is an invariant breach rather than bad input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

/// Log a terminal failure. Contract violations go to `zenstream::contract`
/// at error level; everything else is a warning.
pub(crate) fn log_failure(err: &DecodeError) {
    if err.is_contract_violation() {
        log::error!(target: "zenstream::contract", "{err}");
    } else {
        log::warn!("decode failed: {err}");
    }
}

/// A breach of the driver's calling contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ContractViolation {
    /// The input ended before the engine produced a terminal result.
    #[error("input ended before the engine finished decoding")]
    EndOfStreamBeforeCompletion,

    /// `decode_frame` wrote a different number of pixels than the frame holds.
    #[error("engine wrote {actual} pixels, expected {expected}")]
    PixelCountMismatch {
        /// `width × height` of the full frame.
        expected: usize,
        /// Count reported by the engine.
        actual: usize,
    },

    /// The driver was resumed after it had already terminated.
    #[error("driver resumed after termination")]
    ResumedAfterTermination,
}

/// Failure reported by an output sink.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SinkError {
    /// The sink cannot be built for the requested geometry or format.
    #[error("cannot build sink: {0}")]
    Unsupported(&'static str),

    /// A row had the wrong number of pixels.
    #[error("row {row} has {actual} pixels, expected {expected}")]
    RowWidth {
        /// Input row index.
        row: u32,
        /// Input width.
        expected: usize,
        /// Pixels supplied.
        actual: usize,
    },

    /// More rows were written than the input height.
    #[error("row {row} is past the input height {height}")]
    TooManyRows {
        /// Index of the rejected row.
        row: u32,
        /// Input height.
        height: u32,
    },

    /// The sink's backing storage could not be allocated.
    #[error("sink allocation failed")]
    OutOfMemory,
}
