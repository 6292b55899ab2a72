// Index build and query benchmarks over a synthetic catalog
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prodsim_core::{CatalogIndex, CatalogItem, EngineConfig, Normalizer};
use rand::prelude::*;
use std::sync::Arc;

const WORDS: &[&str] = &[
    "usb", "cable", "charger", "wireless", "bluetooth", "headphones", "speaker", "smart",
    "watch", "phone", "case", "screen", "protector", "laptop", "stand", "keyboard", "mouse",
    "braided", "nylon", "fast", "charging", "portable", "battery", "power", "bank", "led",
    "lamp", "kitchen", "steel", "bottle", "mixer", "grinder", "television", "remote", "hdmi",
];

const CATEGORIES: &[&str] = &[
    "Electronics|Mobiles&Accessories|Cables",
    "Computers&Accessories|Accessories&Peripherals",
    "Home&Kitchen|Kitchen&HomeAppliances",
    "Electronics|HomeTheater,TV&Video",
];

fn phrase(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_catalog(size: usize) -> Vec<CatalogItem> {
    let mut rng = rand::rng();
    (0..size)
        .map(|i| {
            CatalogItem::new(
                format!("P{:06}", i),
                phrase(&mut rng, 6),
                CATEGORIES[rng.random_range(0..CATEGORIES.len())],
                phrase(&mut rng, 30),
                rng.random_range(99.0..9999.0),
                rng.random_range(1.0f32..5.0),
                rng.random_range(0..50_000),
            )
        })
        .collect()
}

fn build_index(items: Vec<CatalogItem>) -> CatalogIndex {
    let config = EngineConfig::default();
    let normalizer = Arc::new(Normalizer::with_defaults(config.normalize_cache_capacity));
    CatalogIndex::build(items, normalizer, &config).unwrap()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for size in [100, 500, 2000].iter() {
        let items = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("catalog_index", size), size, |b, _| {
            b.iter(|| black_box(build_index(items.clone())));
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let index = build_index(generate_catalog(2000));

    group.bench_function("similar_to", |b| {
        b.iter(|| black_box(index.similar_to(black_box("P000042"), 5).unwrap()));
    });

    group.bench_function("search", |b| {
        b.iter(|| black_box(index.search(black_box("fast charging usb cable"), 10)));
    });

    group.bench_function("top_rated", |b| {
        b.iter(|| black_box(index.top_rated(6)));
    });

    group.finish();
}

fn benchmark_concurrent_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_search");
    let index = Arc::new(build_index(generate_catalog(1000)));

    group.bench_function("search_10_threads", |b| {
        b.iter(|| {
            use std::thread;
            let handles: Vec<_> = (0..10)
                .map(|_| {
                    let idx = index.clone();
                    thread::spawn(move || idx.search("wireless bluetooth speaker", 10).len())
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_queries, benchmark_concurrent_search);
criterion_main!(benches);
