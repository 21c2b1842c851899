use criterion::{criterion_group, criterion_main, Criterion};
use glyphmatch::{normalize_gray, GrayBuffer, NormalizeConfig, Scorer, SsimScorer};
use std::hint::black_box;

fn make_glyph(width: usize, height: usize) -> GrayBuffer {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let r = (dx * dx + dy * dy).sqrt();
            let inside = r > width as f64 * 0.2 && r < width as f64 * 0.35;
            data.push(if inside { 20 } else { 235 });
        }
    }
    GrayBuffer::new(data, width, height).unwrap()
}

fn bench_normalize(c: &mut Criterion) {
    let gray = make_glyph(320, 240);
    let cfg = NormalizeConfig::default();

    c.bench_function("normalize_320x240", |b| {
        b.iter(|| normalize_gray(black_box(&gray), &cfg).unwrap().unwrap())
    });
}

fn bench_ssim_pair(c: &mut Criterion) {
    let cfg = NormalizeConfig::default();
    let a = normalize_gray(&make_glyph(320, 240), &cfg).unwrap().unwrap();
    let b_img = normalize_gray(&make_glyph(200, 260), &cfg).unwrap().unwrap();
    let scorer = SsimScorer::default();

    c.bench_function("ssim_200x200_pair", |b| {
        b.iter(|| scorer.score(black_box(&a), black_box(&b_img)).unwrap())
    });
}

criterion_group!(benches, bench_normalize, bench_ssim_pair);
criterion_main!(benches);
