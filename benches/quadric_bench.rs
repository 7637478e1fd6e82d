//! Quadric Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use halfmesh::{generate_icosahedron, Quadric, Vec3};

fn bench_from_face(c: &mut Criterion) {
    c.bench_function("quadric_from_face", |b| {
        b.iter(|| Quadric::from_face(black_box(Vec3::Z), black_box(Vec3::new(0.0, 0.0, 1.0))))
    });
}

fn bench_value(c: &mut Criterion) {
    let q = Quadric::from_plane(0.0, 0.0, 1.0, 0.0);
    let v = DVec3::new(1.0, 2.0, 3.0);

    c.bench_function("quadric_value", |b| {
        b.iter(|| q.value(black_box(v)))
    });
}

fn bench_optimize(c: &mut Criterion) {
    let q = Quadric::from_plane(1.0, 0.0, 0.0, -1.0)
        + Quadric::from_plane(0.0, 1.0, 0.0, -2.0)
        + Quadric::from_plane(0.0, 0.0, 1.0, -3.0);

    c.bench_function("quadric_optimize", |b| {
        b.iter(|| black_box(q).optimize(1e-6))
    });
}

fn bench_vertex_quadrics(c: &mut Criterion) {
    let mesh = generate_icosahedron();

    c.bench_function("quadric_icosahedron_vertices", |b| {
        b.iter(|| {
            mesh.vertices()
                .map(|vh| {
                    mesh.vertex_faces(vh)
                        .map(|fh| Quadric::from_face(mesh.face_normal(fh), mesh.face_center(fh)))
                        .sum::<Quadric>()
                })
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_from_face, bench_value, bench_optimize, bench_vertex_quadrics);
criterion_main!(benches);
