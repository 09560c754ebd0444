use benchmarks::{point_features, square_features};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netadvisor::{suggest_placements, NodePlacementAdvisor};

fn bench_centroids(c: &mut Criterion) {
    let points = point_features(10_000);
    let squares = square_features(10_000);

    c.bench_function("centroids_points_10k", |b| {
        b.iter(|| suggest_placements(black_box(&points)).expect("centroid failed"));
    });
    c.bench_function("centroids_polygons_10k", |b| {
        b.iter(|| suggest_placements(black_box(&squares)).expect("centroid failed"));
    });
}

fn bench_render(c: &mut Criterion) {
    let advisor = NodePlacementAdvisor::new();
    let candidates = suggest_placements(&point_features(1_000)).expect("centroid failed");

    c.bench_function("render_html_1k", |b| {
        b.iter(|| advisor.render_markers(black_box(&candidates)).to_html());
    });
}

criterion_group!(benches, bench_centroids, bench_render);
criterion_main!(benches);
