use glyphmatch::{
    normalize_file, FeatureScorer, Metric, NormalizeConfig, NormalizedImage, Scorer, SsimScorer,
};
use std::path::Path;
use tempfile::TempDir;

fn save_glyph(path: &Path, width: u32, height: u32, glyph: impl Fn(u32, u32) -> bool) {
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        if glyph(x, y) {
            image::Luma([20u8])
        } else {
            image::Luma([235u8])
        }
    });
    img.save(path).unwrap();
}

fn normalized(dir: &TempDir, name: &str, glyph: impl Fn(u32, u32) -> bool) -> NormalizedImage {
    let path = dir.path().join(name);
    save_glyph(&path, 80, 80, glyph);
    normalize_file(&path, &NormalizeConfig::default()).unwrap()
}

fn ring(x: u32, y: u32) -> bool {
    let dx = x as f64 - 40.0;
    let dy = y as f64 - 40.0;
    let r = (dx * dx + dy * dy).sqrt();
    r > 18.0 && r < 28.0
}

fn thick_ring(x: u32, y: u32) -> bool {
    let dx = x as f64 - 40.0;
    let dy = y as f64 - 40.0;
    let r = (dx * dx + dy * dy).sqrt();
    r > 14.0 && r < 30.0
}

fn bar(x: u32, y: u32) -> bool {
    (34..46).contains(&x) && (12..68).contains(&y)
}

#[test]
fn ssim_self_similarity_is_exactly_one() {
    let dir = TempDir::new().unwrap();
    let img = normalized(&dir, "ring.png", ring);
    let scorer = SsimScorer::default();
    assert_eq!(scorer.score(&img, &img).unwrap(), 1.0);
}

#[test]
fn ssim_is_symmetric_through_the_pipeline() {
    let dir = TempDir::new().unwrap();
    let a = normalized(&dir, "ring.png", ring);
    let b = normalized(&dir, "bar.png", bar);
    let scorer = SsimScorer::default();
    assert_eq!(
        scorer.score(&a, &b).unwrap(),
        scorer.score(&b, &a).unwrap()
    );
}

#[test]
fn ssim_stays_within_unit_interval() {
    let dir = TempDir::new().unwrap();
    let shapes: [(&str, fn(u32, u32) -> bool); 3] = [
        ("ring.png", ring),
        ("thick.png", thick_ring),
        ("bar.png", bar),
    ];
    let images: Vec<NormalizedImage> = shapes
        .iter()
        .map(|(name, glyph)| normalized(&dir, name, glyph))
        .collect();

    let scorer = SsimScorer::default();
    for a in &images {
        for b in &images {
            let score = scorer.score(a, b).unwrap();
            assert!((0.0..=1.0).contains(&score), "score = {score}");
        }
    }
}

#[test]
fn ssim_ranks_similar_shapes_above_dissimilar() {
    let dir = TempDir::new().unwrap();
    let target = normalized(&dir, "ring.png", ring);
    let close = normalized(&dir, "thick.png", thick_ring);
    let far = normalized(&dir, "bar.png", bar);

    let scorer = SsimScorer::default();
    let close_score = scorer.score(&target, &close).unwrap();
    let far_score = scorer.score(&target, &far).unwrap();
    assert!(
        close_score > far_score,
        "close = {close_score}, far = {far_score}"
    );
}

#[test]
fn feature_scorer_is_symmetric_and_bounded() {
    let dir = TempDir::new().unwrap();
    let blob = |x: u32, y: u32| (x / 9 + y / 7) % 2 == 0 && (x * 13 + y * 29) % 5 != 0;
    let a = normalized(&dir, "blob.png", blob);
    let b = normalized(&dir, "ring.png", thick_ring);

    let scorer = FeatureScorer::default();
    let forward = scorer.score(&a, &b).unwrap();
    let backward = scorer.score(&b, &a).unwrap();
    assert_eq!(forward, backward);
    assert!((0.0..=1.0).contains(&forward));
}

#[test]
fn metric_selector_builds_both_strategies() {
    let dir = TempDir::new().unwrap();
    let img = normalized(&dir, "ring.png", ring);

    for metric in [Metric::Ssim, Metric::Features] {
        let scorer = metric.scorer();
        let score = scorer.score(&img, &img).unwrap();
        assert!((0.0..=1.0).contains(&score), "{metric:?} gave {score}");
    }
}
