//! Resource limits for a streaming decode session.
//!
//! [`ResourceLimits`] caps what a single session may consume. [`LimitExceeded`]
//! is returned when a check fails. The driver checks dimensions before the
//! size is announced, so an oversized image is rejected before any pixel
//! work or any observer sees it.

use crate::ImageSize;

/// Resource limits for a decode session.
///
/// All fields are optional; `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use zenstream::ResourceLimits;
///
/// let limits = ResourceLimits::none()
///     .with_max_pixels(100_000_000)
///     .with_max_memory(512 * 1024 * 1024);
/// assert!(limits.has_any());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResourceLimits {
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum size of the full-resolution pixel buffer in bytes.
    pub max_memory_bytes: Option<u64>,
    /// Maximum image width in pixels.
    pub max_width: Option<u32>,
    /// Maximum image height in pixels.
    pub max_height: Option<u32>,
    /// Maximum number of encoded bytes accepted over the whole session.
    pub max_input_bytes: Option<u64>,
}

impl ResourceLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum total pixels.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum pixel-buffer allocation in bytes.
    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Set maximum image width in pixels.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set maximum image height in pixels.
    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Set maximum encoded input size in bytes.
    pub fn with_max_input(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_pixels.is_some()
            || self.max_memory_bytes.is_some()
            || self.max_width.is_some()
            || self.max_height.is_some()
            || self.max_input_bytes.is_some()
    }

    /// Most bytes a pending-input buffer may grow by after `consumed` input
    /// bytes: the input still allowed under `max_input_bytes`, and never more
    /// than `max_memory_bytes`. `None` if neither limit is set.
    pub fn pending_headroom(&self, consumed: u64) -> Option<u64> {
        let input = self.max_input_bytes.map(|max| max.saturating_sub(consumed));
        match (input, self.max_memory_bytes) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Check image dimensions against `max_width`, `max_height`, and `max_pixels`.
    pub fn check_size(&self, size: ImageSize) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_width
            && size.width > max
        {
            return Err(LimitExceeded::Width {
                actual: size.width,
                max,
            });
        }
        if let Some(max) = self.max_height
            && size.height > max
        {
            return Err(LimitExceeded::Height {
                actual: size.height,
                max,
            });
        }
        if let Some(max) = self.max_pixels {
            let pixels = size.width as u64 * size.height as u64;
            if pixels > max {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Check a pixel-buffer size against `max_memory_bytes`.
    pub fn check_memory(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_memory_bytes
            && bytes > max
        {
            return Err(LimitExceeded::Memory { actual: bytes, max });
        }
        Ok(())
    }

    /// Check the cumulative input byte count against `max_input_bytes`.
    pub fn check_input(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_input_bytes
            && bytes > max
        {
            return Err(LimitExceeded::Input { actual: bytes, max });
        }
        Ok(())
    }
}

/// A resource limit was exceeded.
///
/// Each variant carries the actual value and the limit that was exceeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Image width exceeded `max_width`.
    Width {
        /// Actual width.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Image height exceeded `max_height`.
    Height {
        /// Actual height.
        actual: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// Pixel count exceeded `max_pixels`.
    Pixels {
        /// Actual pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Pixel buffer exceeded `max_memory_bytes`.
    Memory {
        /// Buffer size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Encoded input exceeded `max_input_bytes`.
    Input {
        /// Bytes received so far.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Width { actual, max } => write!(f, "width {actual} exceeds limit {max}"),
            Self::Height { actual, max } => write!(f, "height {actual} exceeds limit {max}"),
            Self::Pixels { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::Memory { actual, max } => {
                write!(f, "pixel buffer {actual} bytes exceeds limit {max}")
            }
            Self::Input { actual, max } => {
                write!(f, "input {actual} bytes exceeds limit {max}")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
