//! Area-averaging rescale.
//!
//! Each destination pixel averages the source rectangle it covers, with
//! fractional coverage weights at the edges. This matches the behavior of
//! area interpolation when shrinking and degrades gracefully to a box pick
//! when enlarging. Deterministic for a given input.

use crate::image::GrayBuffer;
use crate::util::{GlyphMatchError, GlyphMatchResult};

/// Rescales `src` to `dst_width x dst_height` by area averaging.
pub fn resize_area(
    src: &GrayBuffer,
    dst_width: usize,
    dst_height: usize,
) -> GlyphMatchResult<GrayBuffer> {
    if dst_width == 0 || dst_height == 0 {
        return Err(GlyphMatchError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }

    let scale_x = src.width() as f64 / dst_width as f64;
    let scale_y = src.height() as f64 / dst_height as f64;

    let mut data = Vec::with_capacity(dst_width * dst_height);
    for dy in 0..dst_height {
        let y0 = dy as f64 * scale_y;
        let y1 = (dy + 1) as f64 * scale_y;
        let sy_start = y0.floor() as usize;
        let sy_end = (y1.ceil() as usize).min(src.height());

        for dx in 0..dst_width {
            let x0 = dx as f64 * scale_x;
            let x1 = (dx + 1) as f64 * scale_x;
            let sx_start = x0.floor() as usize;
            let sx_end = (x1.ceil() as usize).min(src.width());

            let mut acc = 0.0f64;
            let mut area = 0.0f64;
            for sy in sy_start..sy_end {
                let wy = overlap(sy as f64, sy as f64 + 1.0, y0, y1);
                if wy <= 0.0 {
                    continue;
                }
                let row = src.row(sy).expect("source row within bounds");
                for (sx, &pixel) in row.iter().enumerate().take(sx_end).skip(sx_start) {
                    let wx = overlap(sx as f64, sx as f64 + 1.0, x0, x1);
                    if wx <= 0.0 {
                        continue;
                    }
                    let weight = wx * wy;
                    acc += weight * f64::from(pixel);
                    area += weight;
                }
            }
            let value = if area > 0.0 { acc / area } else { 0.0 };
            data.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }
    GrayBuffer::new(data, dst_width, dst_height)
}

fn overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}
