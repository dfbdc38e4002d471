//! Image dimension types.

/// Width × height of an image in pixels.
///
/// Recorded at most once per decode session, by the metadata gate, the
/// first time the engine can describe the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count, or `None` if it does not fit in `usize`.
    pub fn pixel_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `self` fits inside `other` in both dimensions.
    pub const fn fits_within(self, other: ImageSize) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Clamp each dimension to at most the matching dimension of `max`.
    pub fn clamp_to(self, max: ImageSize) -> ImageSize {
        ImageSize {
            width: self.width.min(max.width),
            height: self.height.min(max.height),
        }
    }
}

impl core::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
