// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use trle_export::geometry::{classify, Mesh, UvLayer, UvPoint, DEFAULT_IMAGE_SIZE};
use trle_export::io::{self, MqoOptions, RecOptions};

/// `n` x `n` grid of quads, each mapped to its own 8x8 pixel cell
fn grid_mesh(n: usize) -> Mesh {
    let mut mesh = Mesh::new("grid");
    for y in 0..=n {
        for x in 0..=n {
            mesh.add_vertex(Point3::new(x as f64, y as f64, 0.0));
        }
    }

    let cell = 8.0 / 256.0;
    let mut uvs = Vec::with_capacity(n * n * 4);
    for y in 0..n {
        for x in 0..n {
            let i = y * (n + 1) + x;
            mesh.add_polygon(vec![i, i + 1, i + n + 2, i + n + 1], 0);
            let (u, v) = (((x % 32) as f64) * cell, ((y % 32) as f64) * cell);
            uvs.push(UvPoint::new(u, v));
            uvs.push(UvPoint::new(u + cell, v));
            uvs.push(UvPoint::new(u + cell, v + cell));
            uvs.push(UvPoint::new(u, v + cell));
        }
    }
    mesh.add_uv_layer(UvLayer::new("UVMap", uvs));
    mesh
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    let quad = [
        UvPoint::new(0.0, 0.0),
        UvPoint::new(0.5, 0.0),
        UvPoint::new(0.5, 0.5),
        UvPoint::new(0.0, 0.5),
    ];
    group.bench_function("quad", |b| {
        b.iter(|| classify(black_box(&quad), DEFAULT_IMAGE_SIZE).unwrap());
    });

    let triangle = [UvPoint::new(0.0, 0.0), UvPoint::new(0.5, 0.0), UvPoint::new(0.0, 0.5)];
    group.bench_function("triangle", |b| {
        b.iter(|| classify(black_box(&triangle), DEFAULT_IMAGE_SIZE).unwrap());
    });

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for size in [16usize, 64] {
        let mesh = grid_mesh(size);

        group.bench_with_input(BenchmarkId::new("rec", size * size), &mesh, |b, mesh| {
            b.iter(|| {
                io::rec::export(black_box(mesh), &RecOptions::default())
                    .unwrap()
                    .serialize()
            });
        });

        group.bench_with_input(BenchmarkId::new("mqo", size * size), &mesh, |b, mesh| {
            b.iter(|| {
                io::mqo::export(black_box(mesh), &MqoOptions::default())
                    .unwrap()
                    .serialize()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_export);
criterion_main!(benches);
