use std::hint::black_box;

use bpa_rs::geometry::{DEFAULT_EPSILON, candidate_ball_center};
use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec3;

pub fn isosceles(criterion: &mut Criterion) {
    let p0 = Vec3::new(0.0, 0.0, 0.0);
    let p1 = Vec3::new(10.0, 0.0, 0.0);
    let p2 = Vec3::new(0.0, 10.0, 0.0);
    let n = Vec3::new(0.0, 0.0, 1.0);

    criterion.bench_function("isosceles", |b| {
        b.iter(|| {
            let ball = candidate_ball_center(
                black_box(p0),
                n,
                black_box(p1),
                n,
                black_box(p2),
                n,
                black_box(10.0),
                DEFAULT_EPSILON,
            );
            assert!(ball.is_some());
        })
    });
}

criterion_group!(benches, isosceles);
criterion_main!(benches);
