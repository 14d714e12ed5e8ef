use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gbaview::lz77::{decompress, decompress_with_stats};
use gbaview::ByteSource;
use std::hint::black_box;
use std::time::Duration;

enum Token {
    Literal(u8),
    Copy { length: usize, distance: usize },
}

fn encode(size: usize, tokens: &[Token]) -> Vec<u8> {
    let mut stream = vec![0x10];
    stream.extend_from_slice(&(size as u32).to_le_bytes()[..3]);
    for group in tokens.chunks(8) {
        let flag_pos = stream.len();
        stream.push(0);
        for (i, token) in group.iter().enumerate() {
            match *token {
                Token::Literal(byte) => stream.push(byte),
                Token::Copy { length, distance } => {
                    stream[flag_pos] |= 0x80 >> i;
                    let d = distance - 1;
                    stream.push((((length - 3) << 4) | (d >> 8)) as u8);
                    stream.push(d as u8);
                }
            }
        }
    }
    stream
}

/// Stream that decodes to `size` bytes repeating with the given period
fn generate_stream(size: usize, period: usize) -> Vec<u8> {
    let mut tokens = Vec::new();
    let mut produced = 0;
    while produced < size {
        let left = size - produced;
        if produced < period || left < 3 {
            tokens.push(Token::Literal(((produced * 17 + 11) % 256) as u8));
            produced += 1;
        } else {
            let length = left.min(18);
            tokens.push(Token::Copy {
                length,
                distance: period,
            });
            produced += length;
        }
    }
    encode(size, &tokens)
}

fn decompression_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_throughput");
    group.measurement_time(Duration::from_secs(5));

    for size in [512, 4096, 32768].iter() {
        // A period longer than the stream yields only literals
        for (label, period) in [("literal", usize::MAX), ("period_1", 1), ("period_64", 64)] {
            let source = ByteSource::from(generate_stream(*size, period));
            let benchmark_id = BenchmarkId::from_parameter(format!("{}/{}", size, label));

            group.throughput(Throughput::Bytes(*size as u64));
            group.bench_with_input(benchmark_id, &source, |b, source| {
                b.iter(|| decompress(black_box(source), 0).expect("Decompression failed"));
            });
        }
    }

    group.finish();
}

fn decompression_with_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_with_stats");
    let source = ByteSource::from(generate_stream(32768, 256));

    group.throughput(Throughput::Bytes(32768));
    group.bench_function("32768/period_256", |b| {
        b.iter(|| decompress_with_stats(black_box(&source), 0).expect("Decompression failed"));
    });

    group.finish();
}

fn decompression_rejects(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompression_rejects");

    // Garbage that passes the header check but fails partway through
    let mut truncated = generate_stream(32768, 1);
    truncated.truncate(truncated.len() / 2);
    let truncated = ByteSource::from(truncated);
    group.bench_function("truncated", |b| {
        b.iter(|| decompress(black_box(&truncated), 0).is_err());
    });

    let wrong_tag = ByteSource::from(vec![0x11, 0x00, 0x10, 0x00, 0x00]);
    group.bench_function("wrong_tag", |b| {
        b.iter(|| decompress(black_box(&wrong_tag), 0).is_err());
    });

    group.finish();
}

criterion_group!(
    benches,
    decompression_throughput,
    decompression_with_stats,
    decompression_rejects
);
criterion_main!(benches);
