//! Canvas ECS entry point
//!
//! Runs a demo headless at the reference frame rate and logs what happens:
//!
//! ```text
//! canvas-ecs [bounce|breakout|asteroids] [ticks] [settings.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see collisions and queue activity.

use std::collections::BTreeMap;
use std::error::Error;

use canvas_ecs::Settings;
use canvas_ecs::controls::Key;
use canvas_ecs::demos::Demo;
use canvas_ecs::driver::{FixedRateFrames, GameLoop};
use canvas_ecs::sim::{World, inspect};

const DEFAULT_TICKS: u64 = 600;
/// Ticks between progress reports
const REPORT_EVERY: u64 = 60;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let demo: Demo = match args.next() {
        Some(name) => name.parse()?,
        None => Demo::Bounce,
    };
    let ticks: u64 = match args.next() {
        Some(ticks) => ticks.parse()?,
        None => DEFAULT_TICKS,
    };
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    log::info!("Canvas ECS (native) starting {} for {} ticks", demo, ticks);

    let pipeline = demo.pipeline(&settings).with(inspect("report", |world: &World| {
        if world.tick > 0 && world.tick % REPORT_EVERY == 0 {
            log::info!("Tick {}: {}", world.tick, summary(world));
        }
    }));

    let mut game = GameLoop::new(FixedRateFrames::new(settings.reference_fps), pipeline);
    game.mount(demo.world(&settings))?;

    // Press and release pause to get things moving
    let mut controls = demo.controls(&settings);
    if settings.start_paused {
        if let Some(command) = controls.key_down(Key::Pause) {
            game.enqueue(command)?;
        }
        controls.key_up(Key::Pause);
    }

    game.start()?;
    while let Some(token) = game.frames_mut().wait() {
        game.on_frame(token)?;

        let Some(world) = game.world() else { break };
        if let Some(outcome) = demo.outcome(world, &settings) {
            log::info!("{} ended at tick {}: {:?}", demo, world.tick, outcome);
            break;
        }
        if world.tick >= ticks {
            break;
        }
    }

    if let Some(world) = game.stop() {
        log::info!("Final tick {}: {}", world.tick, summary(&world));
    }
    Ok(())
}

/// Particle count per family, e.g. "ball=1 brick=111"
fn summary(world: &World) -> String {
    let mut families: BTreeMap<&str, usize> = BTreeMap::new();
    for particle in &world.particles {
        *families
            .entry(particle.family.as_deref().unwrap_or("-"))
            .or_default() += 1;
    }
    families
        .iter()
        .map(|(family, count)| format!("{}={}", family, count))
        .collect::<Vec<_>>()
        .join(" ")
}
