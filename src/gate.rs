//! First-availability detection of image dimensions.

use crate::{DecodeEngine, DecodeError, DecodeTarget, ImageSize, ResourceLimits};

/// Result of consulting the gate after a successful `process` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GateOutcome {
    /// The engine has not parsed the header yet.
    Pending,
    /// The size is known (possibly from an earlier call).
    Known(ImageSize),
    /// The size was just posted and this is a metadata-only session.
    MetadataDone(ImageSize),
}

/// Records the image size once and posts it to the target exactly once.
#[derive(Debug, Default)]
pub(crate) struct MetadataGate {
    size: Option<ImageSize>,
}

impl MetadataGate {
    pub(crate) fn size(&self) -> Option<ImageSize> {
        self.size
    }

    /// Query the engine for the size if it is not yet known.
    ///
    /// Limits are checked before the size is posted, so a rejected image is
    /// never announced.
    pub(crate) fn observe<E, T>(
        &mut self,
        engine: &E,
        target: &mut T,
        limits: &ResourceLimits,
        metadata_only: bool,
    ) -> Result<GateOutcome, DecodeError>
    where
        E: DecodeEngine + ?Sized,
        T: DecodeTarget + ?Sized,
    {
        if let Some(size) = self.size {
            return Ok(GateOutcome::Known(size));
        }
        let Some(size) = engine.info() else {
            return Ok(GateOutcome::Pending);
        };
        limits.check_size(size)?;

        log::debug!("image size {size}");
        self.size = Some(size);
        target.post_size(size);

        if metadata_only {
            Ok(GateOutcome::MetadataDone(size))
        } else {
            Ok(GateOutcome::Known(size))
        }
    }
}
