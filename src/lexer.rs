//! Two-state streaming lexer.
//!
//! The driver runs in [`State::Data`] while chunks arrive. End of stream
//! moves it to [`State::Finished`], which is only legal after the engine has
//! already produced a terminal result. Every chunk yields a [`Transition`];
//! the lexer folds transitions into the [`LexerResult`] the caller sees.

use crate::error::log_failure;
use crate::{ContractViolation, DecodeError};

/// Lexer state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Normal operation: feed chunks to the engine.
    #[default]
    Data,
    /// The input source is exhausted.
    Finished,
}

/// Result of handling one chunk.
#[derive(Debug)]
pub enum Transition {
    /// Stay in `Data` and read more bytes (unbounded).
    Continue,
    /// The session succeeded.
    TerminateSuccess(Completion),
    /// The session failed.
    TerminateFailure(DecodeError),
}

/// How a successful session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Completion {
    /// Metadata-only session: the size was posted, no frame was decoded.
    Metadata,
    /// The frame was decoded and fully written to the sink.
    Frame,
}

/// What a driver invocation reports to its caller.
#[derive(Debug)]
#[must_use]
pub enum LexerResult {
    /// The source has no bytes right now; resume when it does.
    NeedMoreData,
    /// Terminal success.
    Success(Completion),
    /// Terminal failure.
    Failure(DecodeError),
}

impl LexerResult {
    /// Whether the session has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NeedMoreData)
    }

    /// Convert a terminal result into a `Result`. `None` while still running.
    pub fn into_result(self) -> Option<Result<Completion, DecodeError>> {
        match self {
            Self::NeedMoreData => None,
            Self::Success(done) => Some(Ok(done)),
            Self::Failure(err) => Some(Err(err)),
        }
    }
}

/// The lexer: current state plus whether a terminal result was reached.
#[derive(Debug, Default)]
pub struct StreamingLexer {
    state: State,
    terminated: bool,
}

impl StreamingLexer {
    /// A lexer in [`State::Data`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether a terminal transition has been applied.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Apply the transition for a chunk handled in `Data`.
    ///
    /// Returns `None` to keep reading, or the terminal result.
    pub fn apply(&mut self, transition: Transition) -> Option<LexerResult> {
        match transition {
            Transition::Continue => None,
            Transition::TerminateSuccess(done) => {
                self.terminated = true;
                Some(LexerResult::Success(done))
            }
            Transition::TerminateFailure(err) => {
                self.terminated = true;
                Some(LexerResult::Failure(err))
            }
        }
    }

    /// The source reported end of stream.
    ///
    /// Reaching `Finished` while still running means the engine never
    /// produced a terminal result, which is a contract violation.
    pub fn finish(&mut self) -> LexerResult {
        self.state = State::Finished;
        self.terminated = true;
        let err: DecodeError = ContractViolation::EndOfStreamBeforeCompletion.into();
        log_failure(&err);
        LexerResult::Failure(err)
    }
}
