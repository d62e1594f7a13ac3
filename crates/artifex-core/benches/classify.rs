//! Classification benchmarks for artifex.
//!
//! Measures the hot paths of a listing walk and a readme render:
//! - Signature classification of prefix samples
//! - Text encoding classification
//! - Control-code sanitizing of ANSI art

#![allow(clippy::unwrap_used, missing_docs)]

use std::hint::black_box;

use artifex_core::signature::classify;
use artifex_core::signature::classify_prefix;
use artifex_core::text::classify_text;
use artifex_core::text::decode_cp437;
use artifex_core::text::sanitize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;

fn ansi_art(lines: usize) -> Vec<u8> {
    let mut art = Vec::new();
    for i in 0..lines {
        art.extend_from_slice(format!("\x1b[{};1m", 30 + i % 8).as_bytes());
        art.extend_from_slice(&[0xDB, 0xDB, 0xB2, 0xB1, 0xB0]);
        art.extend_from_slice(b" the board \x1b[0m\r\n");
    }
    art.extend_from_slice(b"\x1aSAUCE00");
    art.resize(art.len() + 121, b' ');
    art
}

fn benchmark_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature");
    let samples: [(&str, Vec<u8>); 4] = [
        ("zip", b"PK\x03\x04\x14\x00\x00\x00".repeat(64)),
        ("gif", b"GIF89a".repeat(80)),
        ("text", b"Just some readme text\r\n".repeat(40)),
        ("ansi", ansi_art(40)),
    ];
    for (name, sample) in &samples {
        group.bench_with_input(BenchmarkId::new("classify_prefix", name), sample, |b, s| {
            b.iter(|| classify_prefix(black_box(s)));
        });
    }

    let whole = b"plain text, ".repeat(8_000);
    group.throughput(Throughput::Bytes(whole.len() as u64));
    group.bench_function("classify_whole_text", |b| b.iter(|| classify(black_box(&whole))));
    group.finish();
}

fn benchmark_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    let art = ansi_art(500);
    group.throughput(Throughput::Bytes(art.len() as u64));

    group.bench_function("sanitize_ansi", |b| b.iter(|| sanitize(black_box(&art))));

    let cleaned = sanitize(&art);
    group.bench_function("classify_text", |b| b.iter(|| classify_text(black_box(&cleaned))));
    group.bench_function("decode_cp437", |b| b.iter(|| decode_cp437(black_box(&cleaned))));
    group.finish();
}

criterion_group!(benches, benchmark_signatures, benchmark_text);
criterion_main!(benches);
