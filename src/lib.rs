//! Glyphmatch classifies a digit image against a labeled reference dataset.
//!
//! The dataset is a directory tree with one folder per class label. A query
//! image is geometrically normalized into a canonical two-level canvas, every
//! reference image is normalized the same way, and a similarity scorer picks
//! the single best match by exhaustive scan. Structural similarity is the
//! default metric; a keypoint-based scorer is available as an alternative.

pub mod dataset;
pub mod image;
pub mod normalize;
pub mod score;
pub mod search;
mod trace;
pub mod util;

pub use dataset::{default_labels, is_image_file, store_sample, DatasetEntry, IMAGE_EXTENSIONS};
pub use crate::image::io::load_gray;
pub use crate::image::GrayBuffer;
pub use normalize::{normalize_file, normalize_gray, NormalizeConfig, NormalizedImage};
pub use score::{FeatureScorer, Metric, Scorer, SsimScorer};
pub use search::{find_best_match, MatchResult, Matcher, SearchConfig};
pub use util::{GlyphMatchError, GlyphMatchResult};
