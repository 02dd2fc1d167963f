// Benchmarks for word segmentation and ranked query construction
//
// Run with: cargo bench --bench words_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use slugroute_core::RouterSettings;
use slugroute_router::words::group;
use slugroute_router::{word_combinations, PathSegment, WordQuery};

fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("word{i}")).collect()
}

fn fields(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("field{i}")).collect()
}

fn benchmark_combinations(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_combinations");

    for (w, f) in [(4, 2), (8, 3), (12, 4), (16, 5)] {
        let words = words(w);
        let fields = fields(f);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}w_{f}f")),
            &(words, fields),
            |b, (words, fields)| {
                b.iter(|| word_combinations(black_box(words), black_box(fields)));
            },
        );
    }

    group.finish();
}

fn benchmark_query(c: &mut Criterion) {
    let segment = PathSegment::parse("[el:name]-[el:surname]-age-[el:age]").unwrap();
    let settings = RouterSettings::default();

    c.bench_function("segment_to_ranked_query", |b| {
        b.iter(|| {
            let groups = group(black_box(&segment), black_box("diego-de-la-vega-y-sanchez-age-17"))
                .unwrap();
            let query = WordQuery::build(&groups).unwrap();
            black_box(query.order_by(&settings, "people"))
        });
    });
}

criterion_group!(benches, benchmark_combinations, benchmark_query);
criterion_main!(benches);
