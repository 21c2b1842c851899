//! Keypoint and descriptor based similarity.
//!
//! Alternate scoring strategy: FAST-9/16 corner detection with 3x3
//! non-maximum suppression, 256-bit binary intensity-comparison descriptors
//! sampled from a 31x31 patch, and brute-force Hamming matching with a
//! cross-check. Matches survive when their distance stays within
//! `max(30, 0.7 * mean distance)`; the score is the surviving count divided
//! by the larger keypoint count, capped at 1.
//!
//! The descriptor sampling pattern is generated from a fixed seed, so
//! scoring is fully deterministic.

use crate::normalize::NormalizedImage;
use crate::score::{check_dimensions, Scorer};
use crate::util::GlyphMatchResult;

/// Keypoints closer than this to the border cannot hold a full descriptor
/// patch (13 px offsets plus the 5x5 smoothing window).
const BORDER: usize = 16;
/// Bresenham circle of radius 3 used by the FAST segment test.
const CIRCLE: [(i32, i32); 16] = [
    (0, -3),
    (1, -3),
    (2, -2),
    (3, -1),
    (3, 0),
    (3, 1),
    (2, 2),
    (1, 3),
    (0, 3),
    (-1, 3),
    (-2, 2),
    (-3, 1),
    (-3, 0),
    (-3, -1),
    (-2, -2),
    (-1, -3),
];
const ARC_LENGTH: usize = 9;
const DESCRIPTOR_BITS: usize = 256;

/// Feature-matching similarity scorer.
#[derive(Clone, Debug)]
pub struct FeatureScorer {
    /// Keep at most this many keypoints per image, strongest first.
    pub max_features: usize,
    /// Minimum center-to-circle intensity difference for a corner.
    pub fast_threshold: u8,
    pairs: Vec<(i32, i32, i32, i32)>,
}

impl Default for FeatureScorer {
    fn default() -> Self {
        Self {
            max_features: 500,
            fast_threshold: 20,
            pairs: sampling_pattern(),
        }
    }
}

impl Scorer for FeatureScorer {
    fn score(&self, a: &NormalizedImage, b: &NormalizedImage) -> GlyphMatchResult<f32> {
        check_dimensions(a, b)?;

        let kp_a = self.detect(a);
        let kp_b = self.detect(b);
        if kp_a.is_empty() || kp_b.is_empty() {
            return Ok(0.0);
        }

        let desc_a: Vec<Descriptor> = kp_a.iter().map(|kp| self.describe(a, kp)).collect();
        let desc_b: Vec<Descriptor> = kp_b.iter().map(|kp| self.describe(b, kp)).collect();

        let distances = cross_checked_matches(&desc_a, &desc_b);
        if distances.is_empty() {
            return Ok(0.0);
        }

        let mean = distances.iter().map(|&d| d as f32).sum::<f32>() / distances.len() as f32;
        let cutoff = (mean * 0.7).max(30.0);
        let good = distances
            .iter()
            .filter(|&&d| (d as f32) <= cutoff)
            .count();

        let denom = kp_a.len().max(kp_b.len()).max(1) as f32;
        Ok((good as f32 / denom).min(1.0))
    }
}

#[derive(Clone, Copy)]
struct Keypoint {
    x: usize,
    y: usize,
    response: u32,
}

type Descriptor = [u64; 4];

impl FeatureScorer {
    /// FAST segment test over the interior, then 3x3 non-maximum
    /// suppression and a strongest-first cap.
    fn detect(&self, img: &NormalizedImage) -> Vec<Keypoint> {
        let side = img.size();
        if side < 2 * BORDER {
            return Vec::new();
        }

        let pixels = img.as_slice();
        let mut responses = vec![0u32; side * side];
        let threshold = i32::from(self.fast_threshold);

        for y in BORDER..side - BORDER {
            for x in BORDER..side - BORDER {
                let center = i32::from(pixels[y * side + x]);
                let ring: Vec<i32> = CIRCLE
                    .iter()
                    .map(|&(dx, dy)| {
                        let sx = (x as i32 + dx) as usize;
                        let sy = (y as i32 + dy) as usize;
                        i32::from(pixels[sy * side + sx])
                    })
                    .collect();

                if has_contiguous_arc(&ring, center, threshold) {
                    let response: i32 = ring.iter().map(|&v| (v - center).abs()).sum();
                    responses[y * side + x] = response as u32;
                }
            }
        }

        let mut keypoints = Vec::new();
        for y in BORDER..side - BORDER {
            for x in BORDER..side - BORDER {
                let response = responses[y * side + x];
                if response == 0 {
                    continue;
                }
                let is_peak = (-1i32..=1)
                    .flat_map(|dy| (-1i32..=1).map(move |dx| (dx, dy)))
                    .filter(|&(dx, dy)| (dx, dy) != (0, 0))
                    .all(|(dx, dy)| {
                        let nx = (x as i32 + dx) as usize;
                        let ny = (y as i32 + dy) as usize;
                        responses[ny * side + nx] <= response
                    });
                if is_peak {
                    keypoints.push(Keypoint { x, y, response });
                }
            }
        }

        keypoints.sort_by(|a, b| {
            b.response
                .cmp(&a.response)
                .then_with(|| a.y.cmp(&b.y))
                .then_with(|| a.x.cmp(&b.x))
        });
        keypoints.truncate(self.max_features);
        keypoints
    }

    /// Builds a 256-bit descriptor from box-smoothed point comparisons.
    fn describe(&self, img: &NormalizedImage, kp: &Keypoint) -> Descriptor {
        let mut desc = [0u64; 4];
        for (bit, &(x0, y0, x1, y1)) in self.pairs.iter().enumerate() {
            let first = smoothed(img, kp.x as i32 + x0, kp.y as i32 + y0);
            let second = smoothed(img, kp.x as i32 + x1, kp.y as i32 + y1);
            if first < second {
                desc[bit / 64] |= 1u64 << (bit % 64);
            }
        }
        desc
    }
}

/// 5x5 box mean around `(x, y)`; the caller guarantees the window fits.
fn smoothed(img: &NormalizedImage, x: i32, y: i32) -> u32 {
    let side = img.size();
    let pixels = img.as_slice();
    let mut sum = 0u32;
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let sx = (x + dx) as usize;
            let sy = (y + dy) as usize;
            sum += u32::from(pixels[sy * side + sx]);
        }
    }
    sum / 25
}

/// True when at least `ARC_LENGTH` contiguous ring pixels are all brighter
/// than `center + threshold` or all darker than `center - threshold`.
fn has_contiguous_arc(ring: &[i32], center: i32, threshold: i32) -> bool {
    let mut brighter = 0usize;
    let mut darker = 0usize;
    // Walk the ring twice to handle arcs that wrap around the seam.
    for i in 0..ring.len() * 2 {
        let value = ring[i % ring.len()];
        if value > center + threshold {
            brighter += 1;
            darker = 0;
        } else if value < center - threshold {
            darker += 1;
            brighter = 0;
        } else {
            brighter = 0;
            darker = 0;
        }
        if brighter >= ARC_LENGTH || darker >= ARC_LENGTH {
            return true;
        }
    }
    false
}

fn hamming(a: &Descriptor, b: &Descriptor) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

/// Nearest neighbor in `candidates` by Hamming distance, first index wins ties.
fn best_match(desc: &Descriptor, candidates: &[Descriptor]) -> (usize, u32) {
    let mut best_idx = 0usize;
    let mut best_dist = u32::MAX;
    for (idx, candidate) in candidates.iter().enumerate() {
        let dist = hamming(desc, candidate);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    (best_idx, best_dist)
}

/// Distances of mutual-best descriptor pairs.
fn cross_checked_matches(desc_a: &[Descriptor], desc_b: &[Descriptor]) -> Vec<u32> {
    let forward: Vec<(usize, u32)> = desc_a.iter().map(|d| best_match(d, desc_b)).collect();
    let backward: Vec<usize> = desc_b.iter().map(|d| best_match(d, desc_a).0).collect();

    forward
        .iter()
        .enumerate()
        .filter(|&(i, &(j, _))| backward[j] == i)
        .map(|(_, &(_, dist))| dist)
        .collect()
}

/// Deterministic point-pair pattern inside the 31x31 patch, from a fixed
/// linear congruential generator.
fn sampling_pattern() -> Vec<(i32, i32, i32, i32)> {
    let mut state = 0x853c_49e6_748f_ea9bu64;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // High bits have the longest period; map to [-13, 13].
        ((state >> 33) % 27) as i32 - 13
    };
    (0..DESCRIPTOR_BITS)
        .map(|_| (next(), next(), next(), next()))
        .collect()
}
