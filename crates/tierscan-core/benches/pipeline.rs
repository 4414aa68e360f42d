//! Benchmarks for the tierscan classification pipeline.
//!
//! Run with: cargo bench -p tierscan-core

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tierscan_core::config::LimitsConfig;
use tierscan_core::pipeline::ImageDecoder;
use tierscan_core::{AggregateReport, ClassificationResult, ResolutionTier, WorkItem};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0x80]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn benchmark_classify(c: &mut Criterion) {
    c.bench_function("classify_tier", |b| {
        b.iter(|| ResolutionTier::classify(black_box(1920), black_box(1080)))
    });
}

fn benchmark_header_decode(c: &mut Criterion) {
    let bytes = png_bytes(1920, 1080);
    let decoder = ImageDecoder::new(LimitsConfig::default(), false);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let path = Path::new("bench.png");

    c.bench_function("decode_header_1080p", |b| {
        b.iter(|| {
            let _ = rt.block_on(decoder.decode_from_bytes(black_box(bytes.clone()), path));
        })
    });
}

fn benchmark_full_decode(c: &mut Criterion) {
    let bytes = png_bytes(1920, 1080);
    let decoder = ImageDecoder::new(LimitsConfig::default(), true);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let path = Path::new("bench.png");

    c.bench_function("decode_full_1080p", |b| {
        b.iter(|| {
            let _ = rt.block_on(decoder.decode_from_bytes(black_box(bytes.clone()), path));
        })
    });
}

fn benchmark_aggregate(c: &mut Criterion) {
    let results: Vec<ClassificationResult> = (0..10_000u32)
        .map(|i| {
            let item = WorkItem {
                id: format!("img_{i:05}.png"),
                source_path: PathBuf::from(format!("/in/img_{i:05}.png")),
                size_bytes: u64::from(i) * 1024,
            };
            if i % 50 == 0 {
                ClassificationResult::failed(&item, "File is empty", 0)
            } else {
                ClassificationResult::succeeded(&item, 320 + i % 4000, 240 + i % 3000, "png", 1)
            }
        })
        .collect();
    let at = Utc::now();

    c.bench_function("aggregate_10k", |b| {
        b.iter(|| AggregateReport::build(black_box(results.clone()), at))
    });
}

criterion_group!(
    benches,
    benchmark_classify,
    benchmark_header_decode,
    benchmark_full_decode,
    benchmark_aggregate,
);
criterion_main!(benches);
