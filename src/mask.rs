//! # Mask Raster Module
//!
//! Masks are fixed-size 8-bit grayscale rasters: one byte per pixel, zero
//! meaning the pixel stays dark during a pass. Every mask in a job shares the
//! projector canvas resolution, so all pixel-wise operations here assume (and
//! the loader enforces) identical dimensions.
//!
//! Masks are immutable once created: composition always allocates a new
//! raster, it never edits a source mask in place.

use crate::error::OptimizeError;

/// Re-export so downstream code can name the raster type without
/// depending on `image` directly.
pub use image::GrayImage;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};

/// Projector canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 2560;

/// Projector canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1600;

/// Reject masks that do not match the projector canvas.
pub fn validate_dimensions(name: &str, mask: &GrayImage) -> Result<(), OptimizeError> {
    let (width, height) = mask.dimensions();
    if (width, height) != (CANVAS_WIDTH, CANVAS_HEIGHT) {
        return Err(OptimizeError::Validation(format!(
            "mask {} is {}x{}, expected canvas {}x{}",
            name, width, height, CANVAS_WIDTH, CANVAS_HEIGHT
        )));
    }
    Ok(())
}

/// Fold `src` into `dst` as a pixel-wise maximum.
///
/// The maximum (not the sum) is the union semantics of projector masks: a
/// pixel lit by two source masks in the same pass is simply lit.
pub fn union_into(dst: &mut GrayImage, src: &GrayImage) {
    debug_assert_eq!(dst.dimensions(), src.dimensions());
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d = (*d).max(*s);
    }
}

/// True if any pixel is lit in both masks.
pub fn overlaps(a: &GrayImage, b: &GrayImage) -> bool {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    a.iter().zip(b.iter()).any(|(pa, pb)| *pa > 0 && *pb > 0)
}

/// Decode a mask from PNG bytes, converting to 8-bit grayscale if needed.
pub fn decode_png(bytes: &[u8]) -> Result<GrayImage, OptimizeError> {
    Ok(image::load_from_memory(bytes)?.into_luma8())
}

/// Encode a mask to PNG bytes in the canonical 8-bit grayscale format.
pub fn encode_png(mask: &GrayImage) -> Result<Vec<u8>, OptimizeError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        mask.as_raw(),
        mask.width(),
        mask.height(),
        ColorType::L8,
    )?;
    Ok(bytes)
}
