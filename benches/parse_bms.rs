//! Benchmark for chart parsing and chart-to-sequence lowering.

use bms_loader::{parse_bms, to_sequence};
use criterion::{Criterion, Throughput};
use std::collections::BTreeMap;

struct BmsFile {
    name: String,
    source: String,
}

fn scan_bms_files() -> Vec<BmsFile> {
    let dir = "tests/files";
    let extensions = [".bms", ".bme"];

    std::fs::read_dir(dir)
        .expect("failed to read fixture directory")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && extensions
                    .iter()
                    .any(|ext| path.to_string_lossy().ends_with(ext))
        })
        .filter_map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(String::from)?;

            let source = std::fs::read_to_string(&path).expect("failed to load fixture file");

            Some(BmsFile { name, source })
        })
        .collect()
}

fn bench_parse_bms(c: &mut Criterion) {
    let files = scan_bms_files();
    let mut group = c.benchmark_group("parse_bms");

    for file in &files {
        group.throughput(Throughput::Bytes(file.source.len() as u64));
        group.bench_function(&file.name, |b| {
            b.iter(|| parse_bms(std::hint::black_box(&file.source)));
        });
    }

    group.finish();
}

fn bench_to_sequence(c: &mut Criterion) {
    let files = scan_bms_files();
    let charts: BTreeMap<String, bms_loader::Bms> = files
        .into_iter()
        .map(|file| (file.name, parse_bms(&file.source).bms))
        .collect();

    let mut group = c.benchmark_group("to_sequence");
    for (name, bms) in &charts {
        group.bench_function(name, |b| {
            b.iter(|| to_sequence(std::hint::black_box(bms)));
        });
    }

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_parse_bms(&mut criterion);
    bench_to_sequence(&mut criterion);
}
