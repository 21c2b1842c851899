//! Exhaustive nearest-neighbor search over a labeled dataset.
//!
//! The search normalizes the query once, then normalizes and scores every
//! reference image under every configured label, keeping the single best.
//! Cost is O(D) normalize-and-score operations for D dataset images; there
//! is no index and no pruning, and every call rescans the tree.

use crate::dataset::{default_labels, label_entries};
use crate::normalize::{normalize_file, NormalizeConfig};
use crate::score::{Metric, Scorer};
use crate::trace::{trace_event, trace_span};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::path::{Path, PathBuf};

/// Search configuration.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Label set to scan, in order. Labels without a directory are skipped.
    pub labels: Vec<String>,
    /// Scoring strategy.
    pub metric: Metric,
    /// Normalization applied to the query and every reference.
    pub normalize: NormalizeConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            metric: Metric::default(),
            normalize: NormalizeConfig::default(),
        }
    }
}

/// Outcome of one search: the best label, its score, and the winning file.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Label of the best-matching class.
    pub label: String,
    /// Similarity of the best reference, in `[0, 1]`.
    pub score: f32,
    /// Path of the winning reference image.
    pub reference: PathBuf,
}

/// Dataset matcher with a fixed configuration and scorer.
pub struct Matcher {
    config: SearchConfig,
    scorer: Box<dyn Scorer>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    /// Creates a matcher with the default configuration (SSIM, labels 0-10,
    /// 200x200 canvas).
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    /// Creates a matcher with an explicit configuration.
    pub fn with_config(config: SearchConfig) -> Self {
        let scorer = config.metric.scorer();
        Self { config, scorer }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Finds the best-matching reference for a query image.
    ///
    /// Fails with `InvalidInput` when the query cannot be normalized and
    /// with `EmptyDataset` when no reference image anywhere in the tree can.
    /// Individual reference failures are skipped, so one corrupt file never
    /// aborts an otherwise successful search.
    ///
    /// A strictly greater score replaces the running best; on ties the
    /// first-found reference wins, i.e. earlier labels and files in
    /// enumeration order. The dataset is read in directory-listing order,
    /// which is deterministic for an unchanged tree but not otherwise
    /// specified.
    pub fn find_best_match(
        &self,
        query: &Path,
        dataset_root: &Path,
    ) -> GlyphMatchResult<MatchResult> {
        let _span = trace_span!("find_best_match", labels = self.config.labels.len()).entered();

        let query_img = normalize_file(query, &self.config.normalize).map_err(|source| {
            GlyphMatchError::InvalidInput {
                path: query.to_path_buf(),
                source: Box::new(source),
            }
        })?;

        let mut best: Option<MatchResult> = None;
        let mut scored = 0usize;
        let mut skipped = 0usize;

        for label in &self.config.labels {
            for entry in label_entries(dataset_root, label) {
                let reference = match normalize_file(&entry.path, &self.config.normalize) {
                    Ok(img) => img,
                    Err(err) => {
                        let reason = err.to_string();
                        trace_event!("reference_skipped", reason = reason.as_str());
                        skipped += 1;
                        continue;
                    }
                };
                let score = match self.scorer.score(&query_img, &reference) {
                    Ok(score) => score,
                    Err(err) => {
                        let reason = err.to_string();
                        trace_event!("reference_skipped", reason = reason.as_str());
                        skipped += 1;
                        continue;
                    }
                };
                scored += 1;

                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(MatchResult {
                        label: entry.label,
                        score,
                        reference: entry.path,
                    });
                }
            }
        }

        trace_event!("search_complete", scored = scored, skipped = skipped);
        best.ok_or_else(|| GlyphMatchError::EmptyDataset {
            root: dataset_root.to_path_buf(),
        })
    }
}

/// Runs a search with the default configuration.
pub fn find_best_match(query: &Path, dataset_root: &Path) -> GlyphMatchResult<MatchResult> {
    Matcher::new().find_best_match(query, dataset_root)
}
