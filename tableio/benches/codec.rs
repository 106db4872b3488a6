//! Transposition and text table decoding benchmarks

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tableio::text_codec::decode_text_table;
use tableio::{transpose, CollectingReporter, TableConfig, Table};

fn random_values(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..len).map(|_| rng.gen_range(-1.0e6..1.0e6)).collect()
}

fn benchmark_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");

    // Square shapes have many short cycles, skinny ones a few long ones
    let shapes = [(64, 64), (512, 512), (1000, 3), (3, 1000), (997, 1009)];

    for (rows, cols) in shapes {
        group.throughput(Throughput::Elements((rows * cols) as u64));
        let data = random_values(rows * cols);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &data,
            |b, data| {
                let mut buf = data.clone();
                b.iter(|| {
                    transpose(black_box(&mut buf), rows, cols).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn text_file(rows: usize, cols: usize) -> String {
    let table = Table::new(rows, cols, random_values(rows * cols)).unwrap();
    let mut text = String::from("#1\n# filler block\ndouble other(1,1)\n0\n");
    text.push_str(&format!("double tab({rows},{cols})\n"));
    for row in table.iter_rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:?}")).collect();
        text.push_str(&line.join("\t"));
        text.push('\n');
    }
    text
}

fn benchmark_text_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_decode");
    let config = TableConfig::default();

    for (rows, cols) in [(100, 2), (1000, 10), (10_000, 4)] {
        let text = text_file(rows, cols);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &text,
            |b, text| {
                b.iter(|| {
                    let reporter = CollectingReporter::new();
                    let table = decode_text_table(
                        Cursor::new(text.as_bytes()),
                        "bench.txt",
                        "tab",
                        &config,
                        &reporter,
                    )
                    .unwrap();
                    black_box(table);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_transpose, benchmark_text_decode);
criterion_main!(benches);
