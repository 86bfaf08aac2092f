use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use tui_globe::data::builtin_world;
use tui_globe::geo::GeoCoordinate;
use tui_globe::map::{clip::clip, GeoChain, LayerCompositor, LayerKind, Rotation, VectorLayer, Viewport};

fn viewport(zoom: i32) -> Viewport {
    let mut vp = Viewport::new(800, 600);
    vp.set_zoom(zoom).unwrap();
    vp
}

/// A dense ring around a center point, roughly circular in geographic space.
fn dense_ring(center_lon: f64, center_lat: f64, radius_deg: f64, points: usize) -> GeoChain {
    GeoChain::ring(
        (0..points)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / points as f64;
                GeoCoordinate::from_degrees(
                    center_lon + radius_deg * theta.cos(),
                    center_lat + radius_deg * theta.sin() * 0.5,
                )
            })
            .collect(),
    )
}

fn bench_clip_ring(c: &mut Criterion) {
    let vp = viewport(2000);
    let layer = VectorLayer::new(LayerKind::Land, vec![dense_ring(0.0, 0.0, 40.0, 2048)]);
    c.bench_function("clip_dense_ring", |b| {
        b.iter(|| clip(black_box(&vp), black_box(&layer)))
    });
}

fn bench_composite_world(c: &mut Criterion) {
    let vp = viewport(1000);
    let layers = builtin_world();
    let compositor = LayerCompositor::new();
    c.bench_function("composite_builtin_world", |b| {
        b.iter(|| compositor.composite(black_box(&vp), black_box(&layers)))
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    let mut vp = viewport(1500);
    let nudge = Rotation::from_axis_angle(DVec3::Z, 0.001);
    c.bench_function("bounding_box_recompute", |b| {
        b.iter(|| {
            vp.rotate(nudge);
            black_box(vp.bounding_box())
        })
    });
}

criterion_group!(benches, bench_clip_ring, bench_composite_world, bench_bounding_box);
criterion_main!(benches);
