use criterion::{black_box, criterion_group, criterion_main, Criterion};

use beamclip::{
    generators::{checkerboard, slanted_checkerboard, slanties},
    BinaryOp, Polygon,
};

fn to_float_arrays(poly: &Polygon) -> Vec<Vec<[f64; 2]>> {
    poly.contours
        .iter()
        .map(|c| c.points.iter().map(|p| [p.x, p.y]).collect())
        .collect()
}

fn checkerboards(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    c.bench_function("checkerboard xor", |b| {
        b.iter(|| black_box(beamclip::clip_to_polygon(BinaryOp::Xor, &even, &odd)))
    });
    c.bench_function("checkerboard xor mesh", |b| {
        b.iter(|| black_box(beamclip::clip_to_mesh(BinaryOp::Xor, &even, &odd)))
    });

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("slanted checkerboard union", |b| {
        b.iter(|| black_box(beamclip::clip_to_polygon(BinaryOp::Union, &even, &odd)))
    });
}

fn crossings(c: &mut Criterion) {
    let (right, left) = slanties(20);
    c.bench_function("slanties intersection", |b| {
        b.iter(|| {
            black_box(beamclip::clip_to_polygon(
                BinaryOp::Intersection,
                &right,
                &left,
            ))
        })
    });
}

fn xor_i_overlay(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    let even = to_float_arrays(&even);
    let odd = to_float_arrays(&odd);

    c.bench_function("checkerboard xor i_overlay", |b| {
        b.iter(|| {
            use i_overlay::float::single::SingleFloatOverlay;
            black_box(even.overlay(
                &odd,
                i_overlay::core::overlay_rule::OverlayRule::Xor,
                i_overlay::core::fill_rule::FillRule::EvenOdd,
            ));
        });
    });
}

criterion_group!(benches, checkerboards, crossings, xor_i_overlay);
criterion_main!(benches);
