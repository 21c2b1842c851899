//! Dataset layout and enumeration.
//!
//! A dataset is a directory tree `root/<label>/<file>` with one directory
//! per class label. The tree is rescanned on every query; nothing is cached,
//! so the dataset may grow between calls without invalidating anything.

use crate::util::{GlyphMatchError, GlyphMatchResult};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as reference images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

/// One labeled reference image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Class label, the name of the containing directory.
    pub label: String,
    /// Path to the image file.
    pub path: PathBuf,
}

/// The default label set: "0" through "10" inclusive.
pub fn default_labels() -> Vec<String> {
    (0..=10).map(|n| n.to_string()).collect()
}

/// Returns whether the path carries a recognized image extension.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Lists the reference images for one label, in directory order.
///
/// A missing or unreadable label directory yields an empty list rather than
/// an error; absent classes are simply not represented in the dataset.
pub fn label_entries(root: &Path, label: &str) -> Vec<DatasetEntry> {
    let dir = root.join(label);
    let Ok(read_dir) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .map(|path| DatasetEntry {
            label: label.to_string(),
            path,
        })
        .collect()
}

/// Copies an accepted or corrected query image into the dataset.
///
/// The file lands at `root/<label>/<stem>_<YYYYMMDD_HHMMSS><ext>`, creating
/// the label directory if absent. Returns the destination path. This is a
/// pure append; the search rescans on every call and will pick the new
/// sample up next time.
pub fn store_sample(query: &Path, root: &Path, label: &str) -> GlyphMatchResult<PathBuf> {
    let dir = root.join(label);
    fs::create_dir_all(&dir).map_err(|err| GlyphMatchError::Io {
        path: dir.clone(),
        reason: err.to_string(),
    })?;

    let stem = query
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sample");
    let ext = query
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_else(|| ".png".to_string());
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let destination = dir.join(format!("{stem}_{stamp}{ext}"));

    fs::copy(query, &destination).map_err(|err| GlyphMatchError::Io {
        path: destination.clone(),
        reason: err.to_string(),
    })?;
    Ok(destination)
}
