//! Session configuration.

use crate::{ImageSize, ResourceLimits};

/// Configuration for one [`StreamDecoder`](crate::StreamDecoder) session.
///
/// # Example
///
/// ```
/// use zenstream::{DecoderConfig, ImageSize, ResourceLimits};
///
/// let config = DecoderConfig::new()
///     .with_output_size(ImageSize::new(320, 240))
///     .with_limits(ResourceLimits::none().with_max_pixels(50_000_000));
/// assert!(!config.metadata_only);
///
/// let config = DecoderConfig::metadata();
/// assert!(config.metadata_only);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecoderConfig {
    /// Stop as soon as the size is known; never decode a frame.
    pub metadata_only: bool,
    /// Size the sink should produce. `None` means full size. The frame is
    /// always decoded at full size; the sink does the scaling.
    pub output_size: Option<ImageSize>,
    /// Resource limits for the session.
    pub limits: ResourceLimits,
}

impl DecoderConfig {
    /// Full decode at full size with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata-only session.
    pub fn metadata() -> Self {
        Self::default().with_metadata_only(true)
    }

    /// Set whether the session stops after the size is known.
    pub fn with_metadata_only(mut self, metadata_only: bool) -> Self {
        self.metadata_only = metadata_only;
        self
    }

    /// Request a downscaled output size.
    pub fn with_output_size(mut self, size: ImageSize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }
}
