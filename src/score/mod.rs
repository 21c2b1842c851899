//! Similarity scoring strategies for normalized glyph images.
//!
//! Two interchangeable scorers are provided: windowed structural similarity
//! (the default search metric) and a keypoint/descriptor scorer. Both map a
//! pair of equally sized canvases to a bounded score in `[0, 1]`.

use crate::normalize::NormalizedImage;
use crate::util::{GlyphMatchError, GlyphMatchResult};

mod features;
mod ssim;

pub use features::FeatureScorer;
pub use ssim::SsimScorer;

/// Similarity scoring strategy.
///
/// Implementations must be symmetric, deterministic, and clamp the result
/// to `[0, 1]`.
pub trait Scorer {
    /// Scores the similarity of two equally sized normalized images.
    fn score(&self, a: &NormalizedImage, b: &NormalizedImage) -> GlyphMatchResult<f32>;
}

/// Selects which scorer a search uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Windowed structural similarity (default).
    #[default]
    Ssim,
    /// Keypoint detection with cross-checked descriptor matching.
    Features,
}

impl Metric {
    /// Instantiates the scorer for this metric with default parameters.
    pub fn scorer(&self) -> Box<dyn Scorer> {
        match self {
            Metric::Ssim => Box::new(SsimScorer::default()),
            Metric::Features => Box::new(FeatureScorer::default()),
        }
    }
}

/// Shared precondition check: both canvases must have the same side length.
fn check_dimensions(a: &NormalizedImage, b: &NormalizedImage) -> GlyphMatchResult<()> {
    if a.size() != b.size() {
        return Err(GlyphMatchError::DimensionMismatch {
            a_width: a.size(),
            a_height: a.size(),
            b_width: b.size(),
            b_height: b.size(),
        });
    }
    Ok(())
}
