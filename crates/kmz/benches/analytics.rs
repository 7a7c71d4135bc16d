//! Benchmarks for clustering and full-document analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fieldmap_kmz::analytics::cluster_points;
use fieldmap_kmz::{analyze, ArchiveDocument, Coordinate, Geometry, Placemark, Properties};

fn point(i: usize) -> Placemark {
    // Points in a grid around Berlin, ~1 km apart
    let lat = 52.0 + (i as f64 * 0.009) % 1.0;
    let lng = 13.0 + ((i / 100) as f64 * 0.015) % 1.5;
    Placemark {
        id: format!("p{i}"),
        name: format!("Point {i}"),
        description: None,
        style_url: None,
        geometry: Geometry::Point(Coordinate::new(lat, lng)),
        extra_properties: Properties::new(),
    }
}

fn document(count: usize) -> ArchiveDocument {
    ArchiveDocument {
        name: "bench".to_string(),
        placemarks: (0..count).map(point).collect(),
        ..ArchiveDocument::default()
    }
}

fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_points");

    for size in [10, 100, 1000].iter() {
        let points: Vec<Placemark> = (0..*size).map(point).collect();
        let refs: Vec<&Placemark> = points.iter().collect();

        group.bench_with_input(BenchmarkId::new("greedy", size), size, |b, _| {
            b.iter(|| cluster_points(black_box(&refs), black_box(1.0)))
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let doc = document(1000);
    c.bench_function("analyze_1000_points", |b| b.iter(|| analyze(black_box(&doc))));
}

criterion_group!(benches, bench_clustering, bench_analyze);
criterion_main!(benches);
