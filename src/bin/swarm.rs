//! Headless swarm run.
//!
//! Usage: `swarm [config.json]`. `RUST_LOG` sets verbosity, `SWARM_LOG_JSON=1`
//! switches to JSON lines.

use std::time::Duration;

use swarm_ecs::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const RUN_FOR_MS: f64 = 6_000.0;
const BURST_EVERY_MS: f64 = 2_000.0;
const FRAME: Duration = Duration::from_millis(16);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("SWARM_LOG_JSON").is_ok_and(|v| v == "1");
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path)?,
        None => SimulationConfig::default(),
    };
    info!(
        width = config.viewport.width,
        height = config.viewport.height,
        boundary = ?config.boundary,
        seed = config.seed,
        "starting swarm"
    );

    let (cx, cy) = config.viewport.center();
    let surface = RecordingSurface::new();
    let mut app = App::new(config);
    app.add_plugin(SwarmPlugin::new(Box::new(surface.clone())))?;

    let mut driver = FrameDriver::new(MonotonicClock::new());
    let failures = driver.subscribe();
    let mut next_burst_ms = 0.0;

    loop {
        let now = driver.clock().now_ms();
        if now >= RUN_FOR_MS {
            driver.stop();
        }
        if now >= next_burst_ms {
            app.pointer_down(cx, cy);
            next_burst_ms += BURST_EVERY_MS;
        }
        if !driver.frame(&mut app) {
            break;
        }

        let drawn = surface.take().len();
        if driver.frame_count() % 60 == 0 {
            info!(
                frame = driver.frame_count(),
                entities = app.world.entity_count(),
                draw_commands = drawn,
                fps = driver.diagnostics().fps(),
                "frame"
            );
        }
        for report in failures.try_iter() {
            for failure in &report.failures {
                tracing::error!(frame = report.frame, %failure, "system failure");
            }
        }
        std::thread::sleep(FRAME);
    }

    info!(
        frames = driver.frame_count(),
        entities = app.world.entity_count(),
        removed = app.world.removed_entity_count(),
        "finished"
    );
    WorldInspector::log_summary(&app.world);
    Ok(())
}
