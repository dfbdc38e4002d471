//! Frame extraction and row streaming.
//!
//! Runs once per session, when the size is known and the engine reports a
//! ready frame. The frame is always decoded at full resolution; any
//! downscaling happens inside the sink.

use alloc::vec::Vec;

use imgref::ImgVec;

use crate::status::frame_failure;
use crate::{
    ContractViolation, DecodeEngine, DecodeError, DecodeTarget, EngineStatus, ImageSize,
    PixelFormat, ResourceLimits, RowSink, SinkConfig,
};

/// Decode the ready frame and stream it into a sink built by `target`.
///
/// On success every row has been written and the target has seen the
/// invalidation (if any), the frame stop, and the decode-done notification.
/// On failure nothing partial is reported.
pub(crate) fn extract_frame<E, T>(
    engine: &mut E,
    target: &mut T,
    full: ImageSize,
    requested: Option<ImageSize>,
    limits: &ResourceLimits,
) -> Result<(), DecodeError>
where
    E: DecodeEngine + ?Sized,
    T: DecodeTarget + ?Sized,
{
    let output_size = output_size(full, requested);
    let format = PixelFormat::Bgrx8;
    let mut sink = target.create_sink(SinkConfig {
        input_size: full,
        output_size,
        format,
    })?;

    let mut pixels = allocate(full, format, limits)?;
    let expected = pixels.len();

    let (status, written) = engine.decode_frame(&mut pixels);
    if status != EngineStatus::Ok {
        return Err(frame_failure(status));
    }
    if written != expected {
        return Err(ContractViolation::PixelCountMismatch {
            expected,
            actual: written,
        }
        .into());
    }

    // A zero-area frame has no rows to stream.
    if !full.is_empty() {
        let frame = ImgVec::new(pixels, full.width as usize, full.height as usize);
        for (y, row) in frame.rows().enumerate() {
            sink.write_row(row).inspect_err(|err| {
                log::debug!("sink rejected row {y}: {err}");
            })?;
        }
    }
    log::debug!("frame {full} written to {output_size} sink");

    if let Some(rect) = sink.take_invalid_rect() {
        target.post_invalidation(rect);
    }
    target.post_frame_stop(sink);
    target.post_decode_done();
    Ok(())
}

/// Output size for a frame: the request, never larger than the frame.
fn output_size(full: ImageSize, requested: Option<ImageSize>) -> ImageSize {
    match requested {
        Some(size) if !size.fits_within(full) => {
            log::warn!("requested output {size} exceeds frame {full}; not upscaling");
            size.clamp_to(full)
        }
        Some(size) => size,
        None => full,
    }
}

fn allocate(
    size: ImageSize,
    format: PixelFormat,
    limits: &ResourceLimits,
) -> Result<Vec<u32>, DecodeError> {
    let count = size.pixel_count().ok_or(DecodeError::OutOfMemory {
        what: "pixel buffer",
        bytes: usize::MAX,
    })?;
    let bytes = count.saturating_mul(format.bytes_per_pixel());
    limits.check_memory(bytes as u64)?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| DecodeError::OutOfMemory {
            what: "pixel buffer",
            bytes,
        })?;
    pixels.resize(count, 0);
    Ok(pixels)
}
