//! Walks an observer through a headless world and logs what gets streamed in and out.

use glam::Vec3;

use sprawl::backend::{HeadlessPhysics, HeadlessRenderer};
use sprawl::config::WorldConfig;
use sprawl::{standard_registry, ChunkManager};

mod panic;

/// The configuration used when no path is given on the command line.
const DEFAULT_CONFIG: &str = "config/world.ron";

/// The number of steps the observer takes.
const STEPS: u32 = 64;

fn main() {
    panic::install_custom_panic_hook();
    sprawl_log::init_from_env();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());

    let config = match WorldConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            sprawl_log::error!("{path}: {err}");
            std::process::exit(1);
        }
    };

    let renderer = HeadlessRenderer::new();
    let physics = HeadlessPhysics::new();
    let mut manager = ChunkManager::new(
        standard_registry(),
        Box::new(renderer.clone()),
        Box::new(physics.clone()),
    );

    if let Err(err) = manager.initialize(config) {
        sprawl_log::error!("{err}");
        std::process::exit(1);
    }

    let stride = manager.config().map_or(100.0, |c| c.chunk_size) * 0.5;
    let clock = quanta::Clock::new();
    let start = clock.now();

    // A square spiral around the origin.
    let mut observer = Vec3::ZERO;
    let mut direction = Vec3::X;
    for step in 0..STEPS {
        if step > 0 && step % 8 == 0 {
            direction = Vec3::new(-direction.z, 0.0, direction.x);
        }
        observer += direction * stride * (1.0 + (step / 16) as f32);

        match manager.update(observer) {
            Ok(report) if !report.is_empty() => {
                for (pos, err) in &report.failed {
                    sprawl_log::warning!("chunk {pos} failed: {err}");
                }
                sprawl_log::trace!(
                    "step {step}: +{} -{} chunks, {} render handles alive",
                    report.loaded.len(),
                    report.unloaded.len(),
                    renderer.live_count(),
                );
            }
            Ok(_) => (),
            Err(err) => {
                sprawl_log::error!("step {step}: {err}");
                std::process::exit(1);
            }
        }
    }

    let elapsed = clock.now().duration_since(start);
    sprawl_log::info!(
        "walked {STEPS} steps in {elapsed:?}, {} chunks loaded, {} render handles created",
        manager.loaded_chunk_count(),
        renderer.created_count(),
    );

    manager.dispose();
    if renderer.live_count() != 0 || physics.live_count() != 0 {
        sprawl_log::warning!(
            "{} render and {} physics handles leaked",
            renderer.live_count(),
            physics.live_count(),
        );
    }
}
