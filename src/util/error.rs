//! Error types for glyphmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for glyphmatch operations.
pub type GlyphMatchResult<T> = std::result::Result<T, GlyphMatchError>;

/// Errors that can occur when normalizing images or searching a dataset.
///
/// Per-reference failures (`DecodeFailure`, `EmptyForeground`) are recovered
/// by skipping the file during a search; the same failures on the query image
/// are wrapped in `InvalidInput` and surfaced to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum GlyphMatchError {
    /// The image file could not be read or decoded.
    #[error("cannot decode image {path:?}: {reason}")]
    DecodeFailure {
        /// Path of the offending file.
        path: PathBuf,
        /// Decoder error message.
        reason: String,
    },
    /// Binarization left no foreground pixels, so there is no glyph to match.
    #[error("no foreground pixels after binarization in {path:?}")]
    EmptyForeground {
        /// Path of the offending file.
        path: PathBuf,
    },
    /// The query image itself could not be normalized.
    #[error("query image {path:?} could not be normalized")]
    InvalidInput {
        /// Path of the query image.
        path: PathBuf,
        /// The underlying normalization failure.
        #[source]
        source: Box<GlyphMatchError>,
    },
    /// No reference image in the entire dataset could be normalized.
    #[error("no usable reference images under {root:?}")]
    EmptyDataset {
        /// Dataset root that was scanned.
        root: PathBuf,
    },
    /// Two images handed to a scorer have different sizes.
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// Width of the first image.
        a_width: usize,
        /// Height of the first image.
        a_height: usize,
        /// Width of the second image.
        b_width: usize,
        /// Height of the second image.
        b_height: usize,
    },
    /// A zero or overflowing image dimension was supplied.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// A pixel buffer does not match its declared dimensions.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall {
        /// Required element count.
        needed: usize,
        /// Provided element count.
        got: usize,
    },
    /// A filesystem operation outside decoding failed.
    #[error("io error on {path:?}: {reason}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Operating system error message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn decode_failure_display_names_path_and_reason() {
        let err = GlyphMatchError::DecodeFailure {
            path: PathBuf::from("q.png"),
            reason: "bad header".to_string(),
        };
        assert_eq!(err.to_string(), "cannot decode image \"q.png\": bad header");
    }

    #[test]
    fn dimension_mismatch_display_shows_both_sizes() {
        let err = GlyphMatchError::DimensionMismatch {
            a_width: 200,
            a_height: 200,
            b_width: 100,
            b_height: 150,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: 200x200 vs 100x150"
        );
    }

    #[test]
    fn invalid_input_chains_to_its_source() {
        let err = GlyphMatchError::InvalidInput {
            path: PathBuf::from("q.png"),
            source: Box::new(GlyphMatchError::EmptyForeground {
                path: PathBuf::from("q.png"),
            }),
        };
        assert_eq!(
            err.to_string(),
            "query image \"q.png\" could not be normalized"
        );
        let source = err.source().expect("wrapped cause");
        assert_eq!(
            source.to_string(),
            "no foreground pixels after binarization in \"q.png\""
        );
    }

    #[test]
    fn empty_dataset_display_names_the_root() {
        let err = GlyphMatchError::EmptyDataset {
            root: PathBuf::from("/data/digits"),
        };
        assert_eq!(
            err.to_string(),
            "no usable reference images under \"/data/digits\""
        );
    }
}
