use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use softrend::material::{Material, ShadeMode};
use softrend::math::{Color3, Vec2, Vec3};
use softrend::mesh::Vertex;
use softrend::render::{
    FlatRasterizer, FrameBuffer, GouraudRasterizer, Rasterizer, TexturedRasterizer,
};
use softrend::renderlist::Triangle;
use softrend::texture::Texture;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn create_buffer() -> FrameBuffer {
    FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, Color3::BLACK).expect("framebuffer")
}

fn materials() -> [(&'static str, Rc<Material>); 3] {
    let texture = Rc::new(Texture::solid(64, 64, Color3::new(200, 180, 160)).expect("texture"));
    [
        ("flat", Rc::new(Material::new(ShadeMode::Flat, Color3::RED))),
        ("gouraud", Rc::new(Material::new(ShadeMode::Smooth, Color3::WHITE))),
        ("textured", Rc::new(Material::textured(texture))),
    ]
}

/// Screen-space triangle with varying depth, colors and UVs.
fn triangle(points: [(f32, f32); 3], material: &Rc<Material>) -> Triangle {
    const COLORS: [Color3; 3] = [Color3::RED, Color3::GREEN, Color3::BLUE];
    const UVS: [(f32, f32); 3] = [(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)];
    let vertices = std::array::from_fn(|i| {
        let (x, y) = points[i];
        Vertex::new(Vec3::new(x, y, 0.1 + 0.2 * i as f32))
            .with_color(COLORS[i])
            .with_uv(Vec2::new(UVS[i].0, UVS[i].1))
    });
    Triangle::new(vertices, Some(Rc::clone(material)))
}

fn rasterizer_for(name: &str) -> Box<dyn Rasterizer> {
    match name {
        "flat" => Box::new(FlatRasterizer::new()),
        "gouraud" => Box::new(GouraudRasterizer::new()),
        _ => Box::new(TexturedRasterizer::new()),
    }
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let sizes = [
        ("small", [(100.0, 100.0), (120.0, 100.0), (110.0, 120.0)]),
        ("medium", [(100.0, 100.0), (300.0, 100.0), (200.0, 300.0)]),
        ("large", [(50.0, 50.0), (750.0, 100.0), (400.0, 550.0)]),
    ];

    for (variant, material) in materials() {
        let rasterizer = rasterizer_for(variant);
        for (size, points) in sizes {
            let tri = triangle(points, &material);
            group.bench_with_input(BenchmarkId::new(variant, size), &tri, |b, tri| {
                let mut fb = create_buffer();
                b.iter(|| {
                    fb.clear();
                    rasterizer.draw_triangle(black_box(tri), &mut fb);
                });
            });
        }
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    for (variant, material) in materials() {
        let rasterizer = rasterizer_for(variant);

        // 20x20 grid of small triangles
        let triangles: Vec<Triangle> = (0..20)
            .flat_map(|row| {
                (0..20).map(move |col| {
                    let x = col as f32 * 40.0;
                    let y = row as f32 * 30.0;
                    [(x, y), (x + 35.0, y), (x + 17.5, y + 25.0)]
                })
            })
            .map(|points| triangle(points, &material))
            .collect();

        group.bench_function(format!("{variant}_400_triangles"), |b| {
            let mut fb = create_buffer();
            b.iter(|| {
                fb.clear();
                for tri in &triangles {
                    rasterizer.draw_triangle(black_box(tri), &mut fb);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
