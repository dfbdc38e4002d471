//! In-memory RGBA surface sink.
//!
//! [`Surface`] is a [`RowSink`] that unpacks BGRX rows into `Rgba<u8>` and
//! downsamples with a nearest-neighbour mapping: output row `oy` takes input
//! row `oy × in_h / out_h`, and likewise for columns. [`SurfaceTarget`]
//! builds surfaces and collects them into a [`DecodeOutput`].

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use rgb::Rgba;

use crate::{
    DecodeOutput, DecodeTarget, ImageSize, InvalidRect, Rect, RowSink, SinkConfig, SinkError,
};

/// RGBA8 surface filled one input row at a time.
#[derive(Clone, Debug)]
pub struct Surface {
    config: SinkConfig,
    buf: Vec<Rgba<u8>>,
    next_row: u32,
    dirty: Option<InvalidRect>,
}

impl Surface {
    /// Build a surface for `config`.
    ///
    /// Fails if the output is larger than the input in either dimension or
    /// if either size has zero area.
    pub fn new(config: SinkConfig) -> Result<Self, SinkError> {
        let SinkConfig {
            input_size,
            output_size,
            ..
        } = config;
        if input_size.is_empty() || output_size.is_empty() {
            return Err(SinkError::Unsupported("zero-area surface"));
        }
        if !output_size.fits_within(input_size) {
            return Err(SinkError::Unsupported("upscaling"));
        }
        let len = output_size.pixel_count().ok_or(SinkError::OutOfMemory)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| SinkError::OutOfMemory)?;
        buf.resize(len, Rgba::new(0, 0, 0, 0));
        Ok(Self {
            config,
            buf,
            next_row: 0,
            dirty: None,
        })
    }

    /// Geometry this surface was built for.
    pub fn config(&self) -> SinkConfig {
        self.config
    }

    /// Input rows written so far.
    pub fn rows_written(&self) -> u32 {
        self.next_row
    }

    /// Whether every input row has been written.
    pub fn is_complete(&self) -> bool {
        self.next_row == self.config.input_size.height
    }

    /// Borrow the output pixels.
    pub fn image(&self) -> ImgRef<'_, Rgba<u8>> {
        let ImageSize { width, height } = self.config.output_size;
        ImgRef::new(&self.buf[..], width as usize, height as usize)
    }

    /// Take the output pixels.
    pub fn into_image(self) -> ImgVec<Rgba<u8>> {
        let ImageSize { width, height } = self.config.output_size;
        ImgVec::new(self.buf, width as usize, height as usize)
    }

    /// Output rows fed by input row `y`: `first_output_row(y)..first_output_row(y + 1)`.
    fn first_output_row(&self, y: u32) -> u32 {
        let in_h = self.config.input_size.height as u64;
        let out_h = self.config.output_size.height as u64;
        (y as u64 * out_h).div_ceil(in_h).min(out_h) as u32
    }

    fn mark_dirty(&mut self, y: u32, out_start: u32, out_end: u32) {
        let input = Rect::new(0, y, self.config.input_size.width, 1);
        let output = Rect::new(
            0,
            out_start,
            self.config.output_size.width,
            out_end - out_start,
        );
        let dirty = self.dirty.get_or_insert_default();
        dirty.input_space = dirty.input_space.union(input);
        dirty.output_space = dirty.output_space.union(output);
    }
}

impl RowSink for Surface {
    fn write_row(&mut self, row: &[u32]) -> Result<(), SinkError> {
        let ImageSize {
            width: in_w,
            height: in_h,
        } = self.config.input_size;
        let y = self.next_row;
        if y >= in_h {
            return Err(SinkError::TooManyRows { row: y, height: in_h });
        }
        if row.len() != in_w as usize {
            return Err(SinkError::RowWidth {
                row: y,
                expected: in_w as usize,
                actual: row.len(),
            });
        }

        let out_w = self.config.output_size.width as usize;
        let format = self.config.format;
        let out_start = self.first_output_row(y);
        let out_end = self.first_output_row(y + 1);
        for oy in out_start..out_end {
            let start = oy as usize * out_w;
            let dst = &mut self.buf[start..start + out_w];
            for (ox, px) in dst.iter_mut().enumerate() {
                let ix = ox * in_w as usize / out_w;
                let [r, g, b] = format.unpack_rgb(row[ix]);
                *px = Rgba::new(r, g, b, 255);
            }
        }

        self.next_row = y + 1;
        self.mark_dirty(y, out_start, out_end);
        Ok(())
    }

    fn take_invalid_rect(&mut self) -> Option<InvalidRect> {
        self.dirty.take()
    }
}

/// [`DecodeTarget`] that renders into a [`Surface`].
#[derive(Debug, Default)]
pub struct SurfaceTarget {
    size: Option<ImageSize>,
    invalidations: Vec<InvalidRect>,
    surface: Option<Surface>,
    frame_complete: bool,
    done: bool,
}

impl SurfaceTarget {
    /// An empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// The posted image size.
    pub fn size(&self) -> Option<ImageSize> {
        self.size
    }

    /// Every invalidation posted, in order.
    pub fn invalidations(&self) -> &[InvalidRect] {
        &self.invalidations
    }

    /// The completed surface, after the frame stop.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Whether the frame stop was posted.
    pub fn is_frame_complete(&self) -> bool {
        self.frame_complete
    }

    /// Whether decode-done was posted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The decoded image, if the session completed a full decode.
    pub fn into_output(self) -> Option<DecodeOutput> {
        if !self.done {
            return None;
        }
        let size = self.size?;
        let surface = self.surface?;
        Some(DecodeOutput::new(surface.into_image(), size))
    }
}

impl DecodeTarget for SurfaceTarget {
    type Sink = Surface;

    fn post_size(&mut self, size: ImageSize) {
        self.size = Some(size);
    }

    fn create_sink(&mut self, config: SinkConfig) -> Result<Surface, SinkError> {
        Surface::new(config)
    }

    fn post_invalidation(&mut self, rect: InvalidRect) {
        self.invalidations.push(rect);
    }

    fn post_frame_stop(&mut self, sink: Surface) {
        self.surface = Some(sink);
        self.frame_complete = true;
    }

    fn post_decode_done(&mut self) {
        self.done = true;
    }
}
