//! Global binarization via Otsu's method.
//!
//! The threshold maximizes between-class variance over the 256-bin
//! histogram, separating the two dominant intensity modes. Pixels strictly
//! above the threshold map to 255, everything else to 0.

use crate::image::GrayBuffer;

/// Computes the Otsu threshold for a grayscale image.
///
/// Returns the last intensity assigned to the background class. An image
/// with a single intensity level yields 0.
pub fn otsu_threshold(img: &GrayBuffer) -> u8 {
    let mut hist = [0u64; 256];
    for &p in img.as_slice() {
        hist[p as usize] += 1;
    }
    let total = img.as_slice().len() as f64;
    let weighted_sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_variance = -1.0f64;
    let mut background_weight = 0.0f64;
    let mut background_sum = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        background_weight += count as f64;
        if background_weight == 0.0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0.0 {
            break;
        }
        background_sum += t as f64 * count as f64;

        let mean_b = background_sum / background_weight;
        let mean_f = (weighted_sum - background_sum) / foreground_weight;
        let diff = mean_b - mean_f;
        let variance = background_weight * foreground_weight * diff * diff;
        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }
    best_threshold
}

/// Maps every pixel above `threshold` to 255 and the rest to 0.
pub fn binarize(img: &GrayBuffer, threshold: u8) -> GrayBuffer {
    let data = img
        .as_slice()
        .iter()
        .map(|&p| if p > threshold { 255 } else { 0 })
        .collect();
    GrayBuffer::new(data, img.width(), img.height()).expect("dimensions preserved")
}

/// Flips a two-level image so the glyph reads dark on a light background.
///
/// A mean below the midpoint means the thresholding landed glyph-light on
/// background-dark; inverting restores the canonical polarity.
pub fn ensure_dark_on_light(img: GrayBuffer) -> GrayBuffer {
    if img.mean() >= 127.0 {
        return img;
    }
    let data = img.as_slice().iter().map(|&p| 255 - p).collect();
    GrayBuffer::new(data, img.width(), img.height()).expect("dimensions preserved")
}
