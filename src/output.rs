//! Decoded image output.

use alloc::vec::Vec;
use imgref::{ImgRef, ImgVec};
use rgb::{Rgb, Rgba};

use crate::ImageSize;

/// Output from a completed decode session.
///
/// Holds the pixels at the output size together with the full size the
/// stream announced.
#[derive(Clone)]
pub struct DecodeOutput {
    pixels: ImgVec<Rgba<u8>>,
    source_size: ImageSize,
}

impl DecodeOutput {
    /// Create a new decode output.
    pub fn new(pixels: ImgVec<Rgba<u8>>, source_size: ImageSize) -> Self {
        Self {
            pixels,
            source_size,
        }
    }

    /// Borrow the pixels.
    pub fn pixels(&self) -> ImgRef<'_, Rgba<u8>> {
        self.pixels.as_ref()
    }

    /// Take the pixels, consuming this output.
    pub fn into_pixels(self) -> ImgVec<Rgba<u8>> {
        self.pixels
    }

    /// Convert to RGB8, consuming this output. Alpha is always opaque.
    pub fn into_rgb8(self) -> ImgVec<Rgb<u8>> {
        let (width, height) = (self.pixels.width(), self.pixels.height());
        let buf: Vec<Rgb<u8>> = self
            .pixels
            .pixels()
            .map(|px| Rgb::new(px.r, px.g, px.b))
            .collect();
        ImgVec::new(buf, width, height)
    }

    /// Output width.
    pub fn width(&self) -> u32 {
        self.pixels.width() as u32
    }

    /// Output height.
    pub fn height(&self) -> u32 {
        self.pixels.height() as u32
    }

    /// Output dimensions.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width(), self.height())
    }

    /// Full image size announced by the stream.
    pub fn source_size(&self) -> ImageSize {
        self.source_size
    }

    /// Whether the output is smaller than the source.
    pub fn is_downscaled(&self) -> bool {
        self.size() != self.source_size
    }
}

impl core::fmt::Debug for DecodeOutput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodeOutput")
            .field("size", &self.size())
            .field("source_size", &self.source_size)
            .finish()
    }
}
