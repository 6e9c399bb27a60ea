use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec3};
use spaceport::camera::Camera;
use spaceport::config::Config;
use spaceport::frame::Orchestrator;
use spaceport::math::transform::{
    invert, normal_matrix, perspective_projection, rotation_x, rotation_y, translation,
};
use spaceport::mesh::{Material, MeshData};
use spaceport::shapes::sphere;
use spaceport::vehicle::Vehicle;
use std::f32::consts::FRAC_PI_3;

fn sample_model() -> Mat4 {
    translation(Vec3::new(1.0, -2.0, 3.0)) * rotation_y(0.7) * rotation_x(-0.3)
}

/// Benchmark: 4x4 multiply
fn bench_matrix_multiply(c: &mut Criterion) {
    let a = sample_model();
    let b = perspective_projection(FRAC_PI_3, 16.0 / 9.0, 0.1, 100.0);

    c.bench_function("matrix_multiply", |bench| {
        bench.iter(|| black_box(black_box(b) * black_box(a)))
    });
}

/// Benchmark: general inverse and the derived normal matrix
fn bench_inverse(c: &mut Criterion) {
    let model = sample_model();

    c.bench_function("matrix_invert", |b| b.iter(|| black_box(invert(black_box(&model)))));
    c.bench_function("normal_matrix", |b| {
        b.iter(|| black_box(normal_matrix(black_box(&model))))
    });
}

/// Benchmark: per-frame camera work
fn bench_camera(c: &mut Criterion) {
    let mut camera = Camera::new(Vec3::new(-3.0, 0.2, 5.0));
    let target = Vec3::new(-5.0, 1.5, 3.5);

    c.bench_function("camera_point_at_projection", |b| {
        b.iter(|| {
            camera.point_at(black_box(target));
            black_box(camera.projection(black_box(16.0 / 9.0)))
        })
    });
}

/// Benchmark: one full orchestrator update + plan
fn bench_frame(c: &mut Criterion) {
    let mut orchestrator = Orchestrator::from_config(&Config::default());

    c.bench_function("frame_update_plan", |b| {
        b.iter(|| {
            orchestrator.update(black_box(1.0 / 60.0));
            black_box(orchestrator.plan(1280, 720))
        })
    });
}

/// Benchmark: baking a transform into meshes of increasing size
fn bench_pre_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_pre_transform");
    let model = sample_model();

    for loops in [1, 2, 3, 4] {
        let mesh: MeshData = sphere(loops, &Mat4::IDENTITY, Material::default());
        group.bench_with_input(BenchmarkId::from_parameter(mesh.len()), &mesh, |b, mesh| {
            b.iter(|| black_box(mesh.clone().pre_transform(black_box(&model))))
        });
    }
    group.finish();
}

/// Benchmark: building the vehicle hull
fn bench_vehicle_mesh(c: &mut Criterion) {
    c.bench_function("vehicle_build_mesh", |b| b.iter(|| black_box(Vehicle::build_mesh())));
}

criterion_group!(
    benches,
    bench_matrix_multiply,
    bench_inverse,
    bench_camera,
    bench_frame,
    bench_pre_transform,
    bench_vehicle_mesh,
);

criterion_main!(benches);
