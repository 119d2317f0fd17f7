use std::sync::atomic::AtomicU64;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trirast::colors;
use trirast::light::PointLight;
use trirast::math::mat4::Mat4;
use trirast::math::vec2::Vec2;
use trirast::math::vec3::Vec3;
use trirast::mesh::TriangleRef;
use trirast::render::{DrawJob, FrameBuffer, RasterTarget, TriangleRasterizer};
use trirast::texture::{Texture, TextureTable};
use trirast::{BufferSurface, Engine, Mesh, RenderConfig};

const BUFFER_WIDTH: u32 = 400;
const BUFFER_HEIGHT: u32 = 300;

/// A front-facing triangle of half-size `extent`, 4 units in front of a
/// camera at the origin.
fn triangle_job(extent: f32) -> DrawJob {
    let triangle = TriangleRef {
        positions: [
            Vec3::new(-extent, -extent, 0.0),
            Vec3::new(-extent, extent, 0.0),
            Vec3::new(extent, extent, 0.0),
        ],
        tex_coords: [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)],
    };
    DrawJob::new(
        triangle,
        0,
        Mat4::translation(0.0, 0.0, 4.0),
        Mat4::identity(),
        Mat4::perspective_lh(
            45f32.to_radians(),
            BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32,
            0.01,
            1000.0,
        ),
        1,
    )
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let rasterizer = TriangleRasterizer::default();
    let framebuffer = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, colors::BACKGROUND);
    let mut textures = TextureTable::new();
    textures
        .insert(0, Texture::checkerboard(64, 8, colors::WHITE, 0xFF3050C0))
        .expect("slot 0 exists");
    let generation = AtomicU64::new(1);
    let target = RasterTarget {
        framebuffer: &framebuffer,
        textures: &textures,
        light: PointLight::new(Vec3::ZERO, colors::WHITE, 8.0),
        generation: &generation,
    };

    for (name, extent) in [("small", 0.1), ("medium", 0.5), ("large", 1.5)] {
        let job = triangle_job(extent);
        group.bench_with_input(BenchmarkId::new("fill", name), &job, |b, job| {
            b.iter(|| {
                framebuffer.clear(colors::BACKGROUND);
                rasterizer.fill(black_box(job), &target)
            });
        });
    }

    group.finish();
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(20);

    for workers in [1, 4] {
        let config = RenderConfig {
            workers: Some(workers),
            ..RenderConfig::default()
        };
        let mut engine =
            Engine::with_config(BUFFER_WIDTH * 2, BUFFER_HEIGHT * 2, config).expect("engine");
        engine
            .set_texture(0, Texture::checkerboard(64, 8, colors::WHITE, 0xFF3050C0))
            .expect("slot 0 exists");
        engine.set_light(PointLight::new(Vec3::ZERO, colors::WHITE, 8.0));

        // A 4x4 wall of cubes.
        for row in 0..4 {
            for col in 0..4 {
                let mut cube = Mesh::cube(0);
                cube.set_transform(
                    Mat4::translation(col as f32 * 2.5 - 3.75, row as f32 * 2.5 - 3.75, 12.0)
                        * Mat4::rotation_y(0.4)
                        * Mat4::rotation_x(0.3),
                );
                engine.add_mesh(cube).expect("mesh table has room");
            }
        }

        let mut surface = BufferSurface::new();
        group.bench_function(BenchmarkId::new("cube_wall", workers), |b| {
            b.iter(|| engine.render_frame(&mut surface).expect("present"));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_frame);
criterion_main!(benches);
