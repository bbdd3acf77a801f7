use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use walkman_scene::camera::PerspectiveCamera;
use walkman_scene::config::CameraConfig;
use walkman_scene::input::Viewport;
use walkman_scene::interaction::{Action, ActionTable, InteractionResolver};
use walkman_scene::math::{aspect_fit, Ray};
use walkman_scene::scene::{Material, Mesh, NodeId, SceneGraph, SceneNode, Transform};

/// Grid of tessellated panels, roughly the triangle count of a detailed prop model.
fn panel_grid(side: usize, subdivisions: u32) -> (SceneGraph, NodeId, NodeId) {
    let mut graph = SceneGraph::new();
    let root = graph.add_root(SceneNode::new("Root"));
    let mut first = None;
    for i in 0..side {
        for j in 0..side {
            let x = i as f32 - side as f32 / 2.0;
            let y = j as f32 - side as f32 / 2.0;
            let node = SceneNode::new(format!("Panel_{i}_{j}"))
                .with_transform(Transform::from_translation(Vec3::new(x, y, 0.0)))
                .with_mesh(tessellated_plane(0.9, subdivisions), Material::default());
            let id = graph.add_child(root, node);
            first.get_or_insert(id);
        }
    }
    (graph, root, first.unwrap())
}

fn tessellated_plane(size: f32, n: u32) -> Mesh {
    let step = size / n as f32;
    let mut positions = Vec::new();
    for row in 0..=n {
        for col in 0..=n {
            positions.push(Vec3::new(
                col as f32 * step - size / 2.0,
                row as f32 * step - size / 2.0,
                0.0,
            ));
        }
    }
    let mut indices = Vec::new();
    for row in 0..n {
        for col in 0..n {
            let a = row * (n + 1) + col;
            let b = a + 1;
            let c = a + n + 1;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    Mesh::new(positions, indices)
}

fn bench_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast");
    for side in [4usize, 16, 32] {
        let (graph, root, _) = panel_grid(side, 8);
        let ray = Ray::new(Vec3::new(0.1, 0.1, 50.0), Vec3::NEG_Z);
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &graph, |b, graph| {
            b.iter(|| black_box(graph.raycast(root, black_box(&ray))))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let (graph, root, first) = panel_grid(16, 8);
    let mut table = ActionTable::new();
    table.bind(first, Action::Play);
    let resolver = InteractionResolver::new(root, table);
    let camera = PerspectiveCamera::new(
        &CameraConfig {
            position: [0.0, 0.0, 30.0],
            ..CameraConfig::default()
        },
        16.0 / 9.0,
    );
    let viewport = Viewport::new(1280.0, 720.0);

    c.bench_function("resolve_pointer_down", |b| {
        b.iter(|| {
            black_box(resolver.resolve(&graph, &camera, viewport, black_box(Vec2::new(640.0, 360.0))))
        })
    });
}

fn bench_aspect_fit(c: &mut Criterion) {
    c.bench_function("aspect_fit", |b| {
        b.iter(|| black_box(aspect_fit(black_box(16.0 / 9.0), black_box(4.0 / 3.0))))
    });
}

criterion_group!(benches, bench_raycast, bench_resolve, bench_aspect_fit);
criterion_main!(benches);
