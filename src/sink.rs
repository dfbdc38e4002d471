//! Row sink and output collaborator traits.
//!
//! The driver decodes a frame at full resolution and pushes it, one
//! full-width row at a time and top to bottom, into a [`RowSink`]. The sink
//! owns any rescaling and format conversion and reports which part of the
//! output became valid. A [`DecodeTarget`] builds sinks and receives the
//! image-level notifications.
//!
//! # Call order for one session
//!
//! ```text
//! post_size(size)                    at most once
//! create_sink(config) -> sink        only for full decodes
//! sink.write_row(row)  × height      top to bottom
//! sink.take_invalid_rect()
//! post_invalidation(rect)            if the sink reported a region
//! post_frame_stop(sink)
//! post_decode_done()
//! ```
//!
//! On failure the sequence stops wherever the failure occurred and the sink
//! is dropped.

use crate::{ImageSize, SinkError};

/// Packed pixel format handed to sinks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 8-bit B, G, R, padding in memory order on little-endian hosts;
    /// read as a `u32` this is `0xXXRRGGBB`. The padding byte is ignored.
    #[default]
    Bgrx8,
}

impl PixelFormat {
    /// Bytes per packed pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Bgrx8 => 4,
        }
    }

    /// Split a packed pixel into `[r, g, b]`.
    #[inline]
    pub const fn unpack_rgb(self, pixel: u32) -> [u8; 3] {
        match self {
            Self::Bgrx8 => [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8],
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Smallest rectangle containing both. An empty side is ignored.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Region that became newly valid, in both coordinate spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvalidRect {
    /// Rows and columns of the full-resolution input.
    pub input_space: Rect,
    /// Matching region of the (possibly downscaled) output.
    pub output_space: Rect,
}

/// Geometry and format of a sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Full frame size; every row written has `input_size.width` pixels.
    pub input_size: ImageSize,
    /// Size the sink produces, never larger than `input_size`.
    pub output_size: ImageSize,
    /// Format of the packed rows.
    pub format: PixelFormat,
}

impl SinkConfig {
    /// Whether the sink has to rescale.
    pub fn is_scaled(&self) -> bool {
        self.input_size != self.output_size
    }
}

/// Receives full-resolution rows in top-to-bottom order.
///
/// This trait is object-safe.
pub trait RowSink {
    /// Write the next row. `row.len()` equals the input width.
    fn write_row(&mut self, row: &[u32]) -> Result<(), SinkError>;

    /// Region made valid since the last call, if any.
    fn take_invalid_rect(&mut self) -> Option<InvalidRect>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, row: &[u32]) -> Result<(), SinkError> {
        (**self).write_row(row)
    }

    fn take_invalid_rect(&mut self) -> Option<InvalidRect> {
        (**self).take_invalid_rect()
    }
}

/// Output collaborator of a decode session.
pub trait DecodeTarget {
    /// Sink type built for a frame.
    type Sink: RowSink;

    /// Image dimensions are known. Called at most once per session.
    fn post_size(&mut self, size: ImageSize);

    /// Build a sink for one frame. An error ends the session.
    fn create_sink(&mut self, config: SinkConfig) -> Result<Self::Sink, SinkError>;

    /// Part of the output became valid.
    fn post_invalidation(&mut self, rect: InvalidRect);

    /// Every row of the frame was written. The sink is handed back.
    fn post_frame_stop(&mut self, sink: Self::Sink);

    /// The session decoded successfully.
    fn post_decode_done(&mut self);
}
