//! Mean structural similarity over sliding uniform windows.
//!
//! Follows the standard formulation: per-window luminance, contrast, and
//! structure terms with stabilizers C1 = (0.01 * 255)^2 and
//! C2 = (0.03 * 255)^2, sample-normalized (co)variance, averaged over every
//! valid window position. The raw measure lies in roughly `[-1, 1]`;
//! negative structural dissimilarity carries no meaning downstream, so the
//! result is clamped to `[0, 1]`.

use crate::normalize::NormalizedImage;
use crate::score::{check_dimensions, Scorer};
use crate::util::GlyphMatchResult;

const C1: f64 = 6.5025; // (0.01 * 255)^2
const C2: f64 = 58.5225; // (0.03 * 255)^2

/// Windowed structural similarity scorer.
#[derive(Clone, Copy, Debug)]
pub struct SsimScorer {
    /// Side length of the sliding window; forced odd and clamped to the
    /// image side at evaluation time.
    pub win_size: usize,
}

impl Default for SsimScorer {
    fn default() -> Self {
        Self { win_size: 7 }
    }
}

impl Scorer for SsimScorer {
    fn score(&self, a: &NormalizedImage, b: &NormalizedImage) -> GlyphMatchResult<f32> {
        check_dimensions(a, b)?;
        let value = mean_ssim(a.as_slice(), b.as_slice(), a.size(), self.win_size);
        Ok(value.clamp(0.0, 1.0) as f32)
    }
}

fn mean_ssim(a: &[u8], b: &[u8], side: usize, win_size: usize) -> f64 {
    let win = effective_window(win_size, side);
    let n = (win * win) as f64;
    let var_denom = (n - 1.0).max(1.0);

    let sum_a = integral(a, side, |p, _| p);
    let sum_b = integral(b, side, |p, _| p);
    let sq_a = integral(a, side, |p, _| p * p);
    let sq_b = integral(b, side, |p, _| p * p);
    let cross = integral(a, side, |p, i| p * f64::from(b[i]));

    let span = side - win + 1;
    let mut total = 0.0f64;
    for y in 0..span {
        for x in 0..span {
            let s1a = rect_sum(&sum_a, side, x, y, win);
            let s1b = rect_sum(&sum_b, side, x, y, win);
            let s2a = rect_sum(&sq_a, side, x, y, win);
            let s2b = rect_sum(&sq_b, side, x, y, win);
            let sab = rect_sum(&cross, side, x, y, win);

            let ua = s1a / n;
            let ub = s1b / n;
            let va = (s2a - s1a * s1a / n) / var_denom;
            let vb = (s2b - s1b * s1b / n) / var_denom;
            let cov = (sab - s1a * s1b / n) / var_denom;

            let numerator = (2.0 * ua * ub + C1) * (2.0 * cov + C2);
            let denominator = (ua * ua + ub * ub + C1) * (va + vb + C2);
            total += numerator / denominator;
        }
    }
    total / (span * span) as f64
}

fn effective_window(win_size: usize, side: usize) -> usize {
    let mut win = win_size.min(side).max(1);
    if win % 2 == 0 {
        win -= 1;
    }
    win
}

/// Builds an `(side + 1)^2` summed-area table of `f(pixel, index)`.
fn integral(pixels: &[u8], side: usize, f: impl Fn(f64, usize) -> f64) -> Vec<f64> {
    let stride = side + 1;
    let mut table = vec![0.0f64; stride * stride];
    for y in 0..side {
        let mut row_sum = 0.0f64;
        for x in 0..side {
            let idx = y * side + x;
            row_sum += f(f64::from(pixels[idx]), idx);
            table[(y + 1) * stride + (x + 1)] = table[y * stride + (x + 1)] + row_sum;
        }
    }
    table
}

fn rect_sum(table: &[f64], side: usize, x: usize, y: usize, win: usize) -> f64 {
    let stride = side + 1;
    table[(y + win) * stride + (x + win)] + table[y * stride + x]
        - table[y * stride + (x + win)]
        - table[(y + win) * stride + x]
}
