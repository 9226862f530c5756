//! Parsing throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use libsvm_datasets::{RecordBuilder, RecordReader, Value};
use std::io::Cursor;

/// Synthetic file with `rows` lines of `nnz` features each, spread over `n_features`
fn synthetic(rows: usize, nnz: usize, n_features: usize) -> String {
    let stride = (n_features / nnz).max(1);
    let mut text = String::new();
    for row in 0..rows {
        text.push_str(if row % 2 == 0 { "+1" } else { "-1" });
        for k in 0..nnz {
            let index = (k * stride + row % stride) % n_features + 1;
            text.push_str(&format!(" {index}:{:.3}", (row * k) as f64 / 100.0));
        }
        text.push('\n');
    }
    text
}

fn bench_record_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_reader");
    for &(nnz, n_features) in &[(10, 123), (50, 780), (200, 47_236)] {
        let data = synthetic(1_000, nnz, n_features);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{nnz}nnz_{n_features}dim")),
            &data,
            |b, data| {
                b.iter(|| {
                    let builder = RecordBuilder::new(n_features, Value::Int(0));
                    let count = RecordReader::new(Cursor::new(data.as_bytes()), builder)
                        .filter(|r| r.is_ok())
                        .count();
                    black_box(count)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_record_reader);
criterion_main!(benches);
