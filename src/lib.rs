//! Streaming still-image decode driver.
//!
//! This crate sits between a chunked byte source and an opaque decoding
//! engine. It owns the parts every incremental decoder needs around the
//! bitstream parser itself:
//!
//! - [`StreamDecoder`]: the synchronous, resumable driver
//! - [`DecodeEngine`] / [`EngineFactory`]: the engine seam
//! - [`ChunkAssembler`]: reassembly of spans the engine could not consume
//! - [`RowSink`] / [`DecodeTarget`]: row output and image-level notifications
//! - [`StreamingLexer`]: the two-state `Data` / `Finished` lexer
//! - [`ChunkSource`]: chunked input, with [`SliceSource`] and [`ChunkQueue`]
//! - [`Surface`] / [`SurfaceTarget`]: an in-memory RGBA sink with downscaling
//! - [`ResourceLimits`]: per-session resource caps
//!
//! The engine decodes one frame at full resolution into packed
//! [`PixelFormat::Bgrx8`] pixels; the sink owns any rescaling.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod assembler;
mod config;
mod decoder;
mod engine;
mod error;
mod frame;
mod gate;
mod info;
mod lexer;
mod limits;
mod output;
mod sink;
mod source;
mod status;
mod surface;

pub use assembler::ChunkAssembler;
pub use config::DecoderConfig;
pub use decoder::StreamDecoder;
pub use engine::{DecodeEngine, EngineFactory, EngineStatus};
pub use error::{ContractViolation, DecodeError, ErrorClass, SinkError};
pub use info::ImageSize;
pub use lexer::{Completion, LexerResult, State, StreamingLexer, Transition};
pub use limits::{LimitExceeded, ResourceLimits};
pub use output::DecodeOutput;
pub use sink::{DecodeTarget, InvalidRect, PixelFormat, Rect, RowSink, SinkConfig};
pub use source::{ChunkQueue, ChunkSource, SliceSource, SourceChunk};
pub use surface::{Surface, SurfaceTarget};

// Re-exports for sink implementors and users.
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use rgb;
pub use rgb::{Rgb, Rgba};
