//! Async batch benchmarks for gbaview
//!
//! Compares sequential strict validation and image decoding against the
//! concurrent batch decoder.

#![cfg(feature = "async")]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gbaview::{
    decode_image, is_candidate, AsyncBatchDecoder, Bpp, ByteSource, ImageRequest, LinearCodec,
};
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const STREAMS: usize = 256;
const STREAM_SIZE: usize = 8192;

/// Buffer holding `STREAMS` literal streams back to back, plus a palette
fn generate_rom() -> (ByteSource, Vec<u32>) {
    let mut rom = vec![0u8; 0x100];
    let mut offsets = Vec::with_capacity(STREAMS);
    for n in 0..STREAMS {
        offsets.push(rom.len() as u32);
        rom.push(0x10);
        rom.extend_from_slice(&(STREAM_SIZE as u32).to_le_bytes()[..3]);
        for i in 0..STREAM_SIZE {
            if i % 8 == 0 {
                rom.push(0x00);
            }
            rom.push(((i * 31 + n) % 256) as u8);
        }
    }
    (ByteSource::from(rom), offsets)
}

fn validation_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("batch_validation");
    group.measurement_time(Duration::from_secs(10));
    let (source, offsets) = generate_rom();

    group.bench_function("sequential", |b| {
        b.iter(|| {
            offsets
                .iter()
                .filter(|&&offset| is_candidate(black_box(&source), offset, true))
                .count()
        });
    });

    for concurrency in [2, 4, 8].iter() {
        let decoder = AsyncBatchDecoder::new().with_concurrency(*concurrency);
        group.bench_with_input(
            BenchmarkId::new("async", concurrency),
            &offsets,
            |b, offsets| {
                b.iter(|| rt.block_on(decoder.validate_all(&source, offsets.clone())));
            },
        );
    }

    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("batch_decode");
    group.measurement_time(Duration::from_secs(10));
    let (source, offsets) = generate_rom();
    let codec = LinearCodec::new(Bpp::Four);
    let requests: Vec<ImageRequest> = offsets
        .iter()
        .map(|&image| ImageRequest {
            image,
            palette: 0,
            fallback_len: None,
            width: 16,
        })
        .collect();

    group.bench_function("sequential", |b| {
        b.iter(|| {
            requests
                .iter()
                .map(|r| decode_image(&source, &codec, r.image, r.palette, None, r.width))
                .filter(|result| result.is_ok())
                .count()
        });
    });

    let shared = Arc::new(codec);
    for concurrency in [2, 4, 8].iter() {
        let decoder = AsyncBatchDecoder::new().with_concurrency(*concurrency);
        group.bench_with_input(
            BenchmarkId::new("async", concurrency),
            &requests,
            |b, requests| {
                b.iter(|| {
                    rt.block_on(decoder.decode_images(
                        &source,
                        Arc::clone(&shared),
                        requests.clone(),
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, validation_benchmark, decode_benchmark);
criterion_main!(benches);
