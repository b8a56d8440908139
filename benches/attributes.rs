//! Benchmarks for attribute generation and per-frame CPU updates.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tinsel::attributes::{generate, OrnamentClass, Role};
use tinsel::spawn::SpawnContext;
use tinsel::systems::{FrameContext, OrnamentSystem, ParticleSystem};
use tinsel::{SceneComposer, SceneConfig};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for role in [
        Role::Foliage,
        Role::Spiral,
        Role::Ornament(OrnamentClass::Star),
        Role::Snow,
    ] {
        let count = role.default_count();
        group.bench_with_input(BenchmarkId::new(format!("{:?}", role), count), &count, |b, &count| {
            b.iter(|| {
                let mut ctx = SpawnContext::seeded(1);
                black_box(generate(role, count, &mut ctx))
            })
        });
    }

    group.finish();
}

fn bench_ornament_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("ornament_update");

    for class in OrnamentClass::ALL {
        let role = Role::Ornament(class);
        let mut ctx = SpawnContext::seeded(2);
        let mut system = OrnamentSystem::new(class, generate(role, role.default_count(), &mut ctx), 1.0);
        let mut elapsed = 0.0;
        group.bench_function(format!("{:?}", class), |b| {
            b.iter(|| {
                elapsed += 1.0 / 60.0;
                system.update(&FrameContext::new(elapsed, 1.0 / 60.0, 0.6, true));
                black_box(system.instances().len())
            })
        });
    }

    group.finish();
}

fn bench_scene_frame(c: &mut Criterion) {
    let mut scene = SceneComposer::new(&SceneConfig::default(), SpawnContext::seeded(3));
    c.bench_function("scene_step", |b| b.iter(|| black_box(scene.step(1.0 / 60.0))));
}

criterion_group!(benches, bench_generate, bench_ornament_update, bench_scene_frame);
criterion_main!(benches);
