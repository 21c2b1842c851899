//! Separable 5x5 Gaussian smoothing.
//!
//! Uses the fixed integer kernel `[1 4 6 4 1] / 16` (the standard ksize-5
//! Gaussian tap set) with replicated borders. Smoothing runs before Otsu
//! thresholding to keep speckle noise from flipping the threshold between
//! near-identical scans.

use crate::image::GrayBuffer;

const TAPS: [u32; 5] = [1, 4, 6, 4, 1];
const TAP_SUM: u32 = 16;

/// Applies a 5x5 Gaussian blur as two separable passes.
pub fn gaussian_blur_5x5(src: &GrayBuffer) -> GrayBuffer {
    let horizontal = convolve_rows(src);
    convolve_cols(&horizontal)
}

fn convolve_rows(src: &GrayBuffer) -> GrayBuffer {
    let width = src.width();
    let height = src.height();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = src.row(y).expect("row within bounds");
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &tap) in TAPS.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - 2, width);
                acc += tap * u32::from(row[sx]);
            }
            data.push(((acc + TAP_SUM / 2) / TAP_SUM) as u8);
        }
    }
    GrayBuffer::new(data, width, height).expect("dimensions preserved")
}

fn convolve_cols(src: &GrayBuffer) -> GrayBuffer {
    let width = src.width();
    let height = src.height();
    let mut data = vec![0u8; width * height];
    for x in 0..width {
        for y in 0..height {
            let mut acc = 0u32;
            for (k, &tap) in TAPS.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - 2, height);
                let pixel = src.get(x, sy).expect("pixel within bounds");
                acc += tap * u32::from(pixel);
            }
            data[y * width + x] = ((acc + TAP_SUM / 2) / TAP_SUM) as u8;
        }
    }
    GrayBuffer::new(data, width, height).expect("dimensions preserved")
}

fn clamp_index(idx: isize, len: usize) -> usize {
    idx.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::gaussian_blur_5x5;
    use crate::image::GrayBuffer;

    #[test]
    fn uniform_image_is_unchanged() {
        let img = GrayBuffer::filled(8, 8, 200).unwrap();
        let blurred = gaussian_blur_5x5(&img);
        assert_eq!(blurred.as_slice(), img.as_slice());
    }

    #[test]
    fn single_bright_pixel_spreads_symmetrically() {
        let mut data = vec![0u8; 9 * 9];
        data[4 * 9 + 4] = 255;
        let img = GrayBuffer::new(data, 9, 9).unwrap();
        let blurred = gaussian_blur_5x5(&img);

        // Center keeps the largest response: 255 * 6/16 * 6/16 rounded per pass.
        let center = blurred.get(4, 4).unwrap();
        assert!(center > 0);
        assert_eq!(blurred.get(3, 4), blurred.get(5, 4));
        assert_eq!(blurred.get(4, 3), blurred.get(4, 5));
        assert_eq!(blurred.get(2, 2), blurred.get(6, 6));
        // Energy must not reach beyond the 5x5 footprint.
        assert_eq!(blurred.get(4, 8), Some(0));
    }

    #[test]
    fn preserves_dimensions() {
        let img = GrayBuffer::filled(13, 7, 40).unwrap();
        let blurred = gaussian_blur_5x5(&img);
        assert_eq!(blurred.width(), 13);
        assert_eq!(blurred.height(), 7);
    }
}
