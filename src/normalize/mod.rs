//! Geometric normalization of glyph images.
//!
//! The normalizer turns an arbitrary input image into a canonical form that
//! makes cross-image comparison meaningful: a fixed-size square canvas,
//! strictly two-level (0/255), with the glyph dark on light, proportionally
//! scaled and centered. Inputs of any resolution, aspect ratio, or polarity
//! map to the same representation.
//!
//! Pipeline: grayscale decode, optional 5x5 Gaussian smoothing, Otsu
//! binarization, polarity fix, bounding-box crop, area-averaged rescale of
//! the longer side to `canvas_size - 2 * padding`, centered paste onto a
//! white canvas. The rescale output is re-binarized so the two-level
//! invariant survives interpolation.

use crate::image::{io, GrayBuffer};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::path::Path;

mod blur;
mod resize;
mod threshold;

pub use blur::gaussian_blur_5x5;
pub use resize::resize_area;
pub use threshold::{binarize, ensure_dark_on_light, otsu_threshold};

/// Normalization parameters.
#[derive(Clone, Copy, Debug)]
pub struct NormalizeConfig {
    /// Side length of the square output canvas.
    pub canvas_size: usize,
    /// Whether to smooth before thresholding. Disable only for clean
    /// synthetic inputs; scans need it to stabilize Otsu.
    pub blur: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            canvas_size: 200,
            blur: true,
        }
    }
}

impl NormalizeConfig {
    /// Margin kept around the glyph on each side (10% of the canvas).
    pub fn padding(&self) -> usize {
        self.canvas_size / 10
    }
}

/// Canonical two-level square glyph image.
///
/// Every pixel is 0 or 255 and the glyph bounding box is centered. Produced
/// only by normalization and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedImage {
    img: GrayBuffer,
}

impl NormalizedImage {
    pub(crate) fn from_buffer(img: GrayBuffer) -> Self {
        Self { img }
    }

    /// Returns the canvas side length.
    pub fn size(&self) -> usize {
        self.img.width()
    }

    /// Returns the pixels in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        self.img.as_slice()
    }

    /// Returns the pixel at `(x, y)` if within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.img.get(x, y)
    }

    /// Returns the underlying buffer.
    pub fn buffer(&self) -> &GrayBuffer {
        &self.img
    }
}

/// Normalizes an image file into the canonical glyph form.
///
/// Fails with `DecodeFailure` for unreadable or corrupt files and with
/// `EmptyForeground` when binarization leaves no glyph pixels. Both are
/// per-file conditions a dataset scan recovers from by skipping.
pub fn normalize_file<P: AsRef<Path>>(
    path: P,
    cfg: &NormalizeConfig,
) -> GlyphMatchResult<NormalizedImage> {
    let path = path.as_ref();
    let gray = io::load_gray(path)?;
    match normalize_gray(&gray, cfg)? {
        Some(normalized) => Ok(normalized),
        None => Err(GlyphMatchError::EmptyForeground {
            path: path.to_path_buf(),
        }),
    }
}

/// Normalizes an in-memory grayscale image.
///
/// Returns `Ok(None)` when the binarized image has no foreground pixels,
/// and an error only for an invalid `canvas_size`.
pub fn normalize_gray(
    gray: &GrayBuffer,
    cfg: &NormalizeConfig,
) -> GlyphMatchResult<Option<NormalizedImage>> {
    if cfg.canvas_size == 0 {
        return Err(GlyphMatchError::InvalidDimensions {
            width: cfg.canvas_size,
            height: cfg.canvas_size,
        });
    }

    let smoothed;
    let input = if cfg.blur {
        smoothed = gaussian_blur_5x5(gray);
        &smoothed
    } else {
        gray
    };

    let threshold = otsu_threshold(input);
    let binary = ensure_dark_on_light(binarize(input, threshold));

    let Some((bbox_x, bbox_y, bbox_w, bbox_h)) = foreground_bbox(&binary) else {
        return Ok(None);
    };
    let glyph = binary.crop(bbox_x, bbox_y, bbox_w, bbox_h)?;

    let max_side = cfg.canvas_size - 2 * cfg.padding();
    let (new_w, new_h) = scaled_dims(bbox_w, bbox_h, max_side);
    let rescaled = resize_area(&glyph, new_w, new_h)?;
    // Interpolation introduces gray edge pixels; restore the two-level form.
    let rescaled = binarize(&rescaled, 127);

    let mut canvas = GrayBuffer::filled(cfg.canvas_size, cfg.canvas_size, 255)?;
    let x0 = (cfg.canvas_size - new_w) / 2;
    let y0 = (cfg.canvas_size - new_h) / 2;
    for y in 0..new_h {
        let src_row = rescaled.row(y).expect("rescaled row within bounds");
        let dst_row = canvas.row_mut(y0 + y).expect("canvas row within bounds");
        dst_row[x0..x0 + new_w].copy_from_slice(src_row);
    }

    Ok(Some(NormalizedImage { img: canvas }))
}

/// Returns `(x, y, width, height)` of the dark-pixel bounding box, or `None`
/// for an all-background image.
fn foreground_bbox(binary: &GrayBuffer) -> Option<(usize, usize, usize, usize)> {
    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut found = false;

    for y in 0..binary.height() {
        let row = binary.row(y).expect("row within bounds");
        for (x, &pixel) in row.iter().enumerate() {
            if pixel != 0 {
                continue;
            }
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    found.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Scales `(width, height)` so the longer side equals `max_side`, preserving
/// aspect ratio; the shorter side rounds to the nearest pixel, never below 1.
fn scaled_dims(width: usize, height: usize, max_side: usize) -> (usize, usize) {
    let max_side = max_side.max(1);
    if width > height {
        let new_h = (height as f64 * max_side as f64 / width as f64).round() as usize;
        (max_side, new_h.max(1))
    } else {
        let new_w = (width as f64 * max_side as f64 / height as f64).round() as usize;
        (new_w.max(1), max_side)
    }
}

#[cfg(test)]
mod tests {
    use super::{foreground_bbox, normalize_gray, scaled_dims, NormalizeConfig};
    use crate::image::GrayBuffer;

    fn glyph_image() -> GrayBuffer {
        // 20x20 light field with a dark 6x3 bar offset from center.
        let mut data = vec![230u8; 20 * 20];
        for y in 4..7 {
            for x in 3..9 {
                data[y * 20 + x] = 20;
            }
        }
        GrayBuffer::new(data, 20, 20).unwrap()
    }

    #[test]
    fn scaled_dims_preserve_aspect() {
        assert_eq!(scaled_dims(100, 50, 160), (160, 80));
        assert_eq!(scaled_dims(50, 100, 160), (80, 160));
        assert_eq!(scaled_dims(64, 64, 160), (160, 160));
        // Extreme aspect ratios never collapse to zero.
        assert_eq!(scaled_dims(300, 1, 160), (160, 1));
    }

    #[test]
    fn bbox_finds_dark_extent() {
        let mut data = vec![255u8; 25];
        data[6] = 0; // (1, 1)
        data[18] = 0; // (3, 3)
        let img = GrayBuffer::new(data, 5, 5).unwrap();
        assert_eq!(foreground_bbox(&img), Some((1, 1, 3, 3)));
    }

    #[test]
    fn bbox_none_for_blank() {
        let img = GrayBuffer::filled(5, 5, 255).unwrap();
        assert_eq!(foreground_bbox(&img), None);
    }

    #[test]
    fn blank_image_normalizes_to_none() {
        let img = GrayBuffer::filled(32, 32, 180).unwrap();
        let cfg = NormalizeConfig::default();
        assert!(normalize_gray(&img, &cfg).unwrap().is_none());
    }

    #[test]
    fn output_is_square_binary_and_centered() {
        let cfg = NormalizeConfig {
            canvas_size: 100,
            blur: false,
        };
        let out = normalize_gray(&glyph_image(), &cfg).unwrap().unwrap();
        assert_eq!(out.size(), 100);
        assert!(out.as_slice().iter().all(|&p| p == 0 || p == 255));

        let bbox = foreground_bbox(out.buffer()).expect("glyph present");
        let (x, y, w, h) = bbox;
        // Longer side fills the canvas minus padding.
        assert_eq!(w.max(h), 100 - 2 * cfg.padding());
        // Centered within one pixel on both axes.
        let cx = x + w / 2;
        let cy = y + h / 2;
        assert!(cx.abs_diff(50) <= 1, "cx = {cx}");
        assert!(cy.abs_diff(50) <= 1, "cy = {cy}");
    }

    #[test]
    fn inverted_input_yields_same_canvas() {
        let img = glyph_image();
        let inverted = GrayBuffer::new(
            img.as_slice().iter().map(|&p| 255 - p).collect(),
            img.width(),
            img.height(),
        )
        .unwrap();

        let cfg = NormalizeConfig {
            canvas_size: 100,
            blur: false,
        };
        let a = normalize_gray(&img, &cfg).unwrap().unwrap();
        let b = normalize_gray(&inverted, &cfg).unwrap().unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let cfg = NormalizeConfig {
            canvas_size: 0,
            blur: false,
        };
        assert!(normalize_gray(&glyph_image(), &cfg).is_err());
    }
}
