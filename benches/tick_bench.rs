use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use swarm_ecs::prelude::*;

fn populated_app(bursts: usize) -> (App, RecordingSurface) {
    let surface = RecordingSurface::new();
    let mut app = App::new(SimulationConfig::wrapping());
    app.add_plugin(SwarmPlugin::new(Box::new(surface.clone())))
        .expect("plugin");
    for _ in 0..bursts {
        app.pointer_down(640.0, 360.0);
    }
    app.tick(0.0, 0.0).expect("initial tick");
    surface.take();
    (app, surface)
}

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_burst_x25", |b| {
        b.iter_batched(
            || {
                let mut app = App::new(SimulationConfig::wrapping());
                for _ in 0..25 {
                    app.pointer_down(640.0, 360.0);
                }
                app
            },
            |mut app| {
                app.tick(0.0, 0.0).expect("tick");
                app
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("tick_1000_entities", |b| {
        let (mut app, surface) = populated_app(25);
        // Wall time stays put so nothing expires mid-measurement
        b.iter(|| {
            black_box(app.tick(16.0, 0.0).expect("tick"));
            surface.take();
        })
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark, tick_benchmark);
criterion_main!(benches);
