//! Shared fixtures: a synthetic engine with a tiny container format and a
//! target that records every notification.
//!
//! Stream layout: `b"ZS"`, width as `u16` LE, height as `u16` LE, then one
//! seed byte. Pixel `(x, y)` decodes to `0xFF_xx_yy_ss` with `xx = x & 0xFF`,
//! `yy = y & 0xFF`, `ss = seed`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use zenstream::{
    DecodeEngine, DecodeTarget, EngineStatus, ImageSize, ImgVec, InvalidRect, Rgba, RowSink,
    SinkConfig, SinkError, Surface,
};

pub const MAGIC: &[u8; 2] = b"ZS";
pub const HEADER_LEN: usize = 6;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encode a synthetic stream.
pub fn encode(width: u16, height: u16, seed: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 1);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(seed);
    out
}

/// The packed pixel the engine writes at `(x, y)`.
pub fn pixel(seed: u8, x: usize, y: usize) -> u32 {
    0xFF00_0000 | (((x & 0xFF) as u32) << 16) | (((y & 0xFF) as u32) << 8) | seed as u32
}

/// Everything the engines created by one factory did.
#[derive(Debug, Default)]
pub struct Calls {
    pub created: Vec<bool>,
    pub process_spans: Vec<usize>,
    pub decode_frames: usize,
    pub dropped: usize,
}

pub type SharedCalls = Rc<RefCell<Calls>>;

/// Fault injection.
#[derive(Clone, Copy, Debug, Default)]
pub struct Behavior {
    /// Status returned by every `process` call instead of parsing.
    pub process_status: Option<EngineStatus>,
    /// Status returned by the `process` call with this zero-based index.
    pub fail_call: Option<(usize, EngineStatus)>,
    /// Status returned by `decode_frame` instead of decoding.
    pub frame_status: Option<EngineStatus>,
    /// Overrides the bytes-needed hint while the header is incomplete.
    pub hint: Option<usize>,
    /// Report one pixel fewer than written.
    pub miscount: bool,
    /// The factory refuses to create engines.
    pub unavailable: bool,
}

pub struct SyntheticEngine {
    calls: SharedCalls,
    behavior: Behavior,
    size: Option<ImageSize>,
    seed: Option<u8>,
}

impl SyntheticEngine {
    fn parse_header(&mut self, data: &[u8]) -> EngineStatus {
        let magic_len = data.len().min(MAGIC.len());
        if data[..magic_len] != MAGIC[..magic_len] {
            return EngineStatus::InvalidData;
        }
        if data.len() < HEADER_LEN {
            return EngineStatus::NeedMoreData;
        }
        let width = u16::from_le_bytes([data[2], data[3]]);
        let height = u16::from_le_bytes([data[4], data[5]]);
        self.size = Some(ImageSize::new(width.into(), height.into()));
        self.seed = data.get(HEADER_LEN).copied();
        EngineStatus::Ok
    }
}

impl DecodeEngine for SyntheticEngine {
    fn process(&mut self, data: &[u8]) -> EngineStatus {
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.process_spans.push(data.len());
            calls.process_spans.len() - 1
        };
        if let Some(status) = self.behavior.process_status {
            return status;
        }
        if let Some((at, status)) = self.behavior.fail_call
            && at == index
        {
            return status;
        }
        if self.size.is_none() {
            return self.parse_header(data);
        }
        if self.seed.is_none() {
            self.seed = data.first().copied();
        }
        EngineStatus::Ok
    }

    fn bytes_needed(&self) -> Option<usize> {
        self.size
            .is_none()
            .then(|| self.behavior.hint.unwrap_or(HEADER_LEN + 1))
    }

    fn info(&self) -> Option<ImageSize> {
        self.size
    }

    fn is_frame_ready(&self) -> bool {
        self.size.is_some() && self.seed.is_some()
    }

    fn decode_frame(&mut self, out: &mut [u32]) -> (EngineStatus, usize) {
        self.calls.borrow_mut().decode_frames += 1;
        if let Some(status) = self.behavior.frame_status {
            return (status, 0);
        }
        let (Some(size), Some(seed)) = (self.size, self.seed) else {
            return (EngineStatus::Error, 0);
        };
        let width = size.width as usize;
        for (i, px) in out.iter_mut().enumerate() {
            *px = pixel(seed, i % width, i / width);
        }
        let written = out.len() - usize::from(self.behavior.miscount);
        (EngineStatus::Ok, written)
    }
}

impl Drop for SyntheticEngine {
    fn drop(&mut self) {
        self.calls.borrow_mut().dropped += 1;
    }
}

/// A factory closure plus the log its engines write to.
pub fn factory(behavior: Behavior) -> (impl FnMut(bool) -> Option<SyntheticEngine>, SharedCalls) {
    let calls = SharedCalls::default();
    let shared = Rc::clone(&calls);
    let factory = move |metadata_only: bool| {
        shared.borrow_mut().created.push(metadata_only);
        if behavior.unavailable {
            return None;
        }
        Some(SyntheticEngine {
            calls: Rc::clone(&shared),
            behavior,
            size: None,
            seed: None,
        })
    };
    (factory, calls)
}

/// A notification observed by [`Recorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Size(ImageSize),
    SinkCreated(SinkConfig),
    Invalidated(InvalidRect),
    /// Lengths of every row the sink received.
    FrameStop(Vec<usize>),
    Done,
}

/// Surface sink that records row lengths and can fail on demand.
pub struct RecordingSink {
    surface: Surface,
    row_lens: Vec<usize>,
    fail_at: Option<usize>,
}

impl RowSink for RecordingSink {
    fn write_row(&mut self, row: &[u32]) -> Result<(), SinkError> {
        if self.fail_at == Some(self.row_lens.len()) {
            return Err(SinkError::OutOfMemory);
        }
        self.row_lens.push(row.len());
        self.surface.write_row(row)
    }

    fn take_invalid_rect(&mut self) -> Option<InvalidRect> {
        self.surface.take_invalid_rect()
    }
}

/// Target that logs every notification in order.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub fail_sink_at: Option<usize>,
    surface: Option<Surface>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at_row(row: usize) -> Self {
        Self {
            fail_sink_at: Some(row),
            ..Self::default()
        }
    }

    pub fn sizes(&self) -> Vec<ImageSize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Size(size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    pub fn image(&self) -> Option<ImgVec<Rgba<u8>>> {
        self.surface.clone().map(Surface::into_image)
    }
}

impl DecodeTarget for Recorder {
    type Sink = RecordingSink;

    fn post_size(&mut self, size: ImageSize) {
        self.events.push(Event::Size(size));
    }

    fn create_sink(&mut self, config: SinkConfig) -> Result<RecordingSink, SinkError> {
        self.events.push(Event::SinkCreated(config));
        Ok(RecordingSink {
            surface: Surface::new(config)?,
            row_lens: Vec::new(),
            fail_at: self.fail_sink_at,
        })
    }

    fn post_invalidation(&mut self, rect: InvalidRect) {
        self.events.push(Event::Invalidated(rect));
    }

    fn post_frame_stop(&mut self, sink: RecordingSink) {
        self.events.push(Event::FrameStop(sink.row_lens));
        self.surface = Some(sink.surface);
    }

    fn post_decode_done(&mut self) {
        self.events.push(Event::Done);
    }
}
