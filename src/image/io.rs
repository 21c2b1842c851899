//! Decoding helpers built on the `image` crate.
//!
//! Decoding failures map to `GlyphMatchError::DecodeFailure` with the
//! offending path attached, so callers can decide between skipping a
//! reference file and failing the whole call for a bad query.

use crate::image::GrayBuffer;
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::path::Path;

/// Creates a buffer from a grayscale image.
pub fn gray_from_image(img: &image::GrayImage) -> GlyphMatchResult<GrayBuffer> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    GrayBuffer::new(img.as_raw().clone(), width, height)
}

/// Converts a decoded dynamic image to a grayscale buffer.
pub fn gray_from_dynamic(img: &image::DynamicImage) -> GlyphMatchResult<GrayBuffer> {
    let gray = img.to_luma8();
    gray_from_image(&gray)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_gray<P: AsRef<Path>>(path: P) -> GlyphMatchResult<GrayBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| GlyphMatchError::DecodeFailure {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    gray_from_dynamic(&img)
}
