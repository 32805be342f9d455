// Benchmark tree-sitter parsing and structure extraction throughput.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use vitruv_graphs::SourceAnalyzer;

fn generate_python_source(functions: usize) -> String {
    use std::fmt::Write;
    let mut src = String::new();
    for i in 0..functions {
        let _ = write!(
            src,
            "def func_{i}(x):\n    helper_{i}(x + 1)\n    return shared(x)\n\n"
        );
    }
    src
}

fn bench_extract_single_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_single_file");

    for func_count in [10, 50, 200] {
        let source = generate_python_source(func_count);

        group.bench_with_input(
            BenchmarkId::new("python_functions", func_count),
            &source,
            |b, src| {
                let mut analyzer = SourceAnalyzer::new().unwrap();
                b.iter(|| analyzer.analyze(src).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_extract_single_file);
criterion_main!(benches);
