//! Update pipeline
//!
//! A system is a `World -> World` transform. The [`Updater`] folds the world
//! through its systems in order once per tick.

use super::queue::QueueDrainSystem;
use super::world::World;
use crate::error::EngineError;

/// A world transform applied once per tick.
///
/// An error aborts the remaining systems of the tick and is surfaced to
/// whoever drives the pipeline.
pub trait System {
    fn run(&mut self, world: World) -> Result<World, EngineError>;

    /// Name for logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S: System + ?Sized> System for Box<S> {
    fn run(&mut self, world: World) -> Result<World, EngineError> {
        (**self).run(world)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A system built from a closure
pub struct FnSystem<F> {
    name: &'static str,
    f: F,
}

/// Wrap a closure as a named system
pub fn from_fn<F>(name: &'static str, f: F) -> FnSystem<F>
where
    F: FnMut(World) -> Result<World, EngineError>,
{
    FnSystem { name, f }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(World) -> Result<World, EngineError>,
{
    fn run(&mut self, world: World) -> Result<World, EngineError> {
        (self.f)(world)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Read-only pass-through system. This is the hook for display drivers:
/// they see the world after the queue has drained and cannot change it.
pub struct Inspect<F> {
    name: &'static str,
    f: F,
}

pub fn inspect<F>(name: &'static str, f: F) -> Inspect<F>
where
    F: FnMut(&World),
{
    Inspect { name, f }
}

impl<F> System for Inspect<F>
where
    F: FnMut(&World),
{
    fn run(&mut self, world: World) -> Result<World, EngineError> {
        (self.f)(&world);
        Ok(world)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Ordered system pipeline with pause gating
#[derive(Default)]
pub struct Updater {
    systems: Vec<Box<dyn System>>,
}

impl Updater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system to the end of the pipeline
    pub fn with<S: System + 'static>(mut self, system: S) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Advance the world by one tick.
    ///
    /// Pause is sampled on entry. A paused world skips every system; its
    /// queue is drained against a scratch copy and only the resulting pause
    /// flag is kept, so a queued toggle can resume the session while the
    /// particles stay exactly as they were.
    pub fn update(&mut self, world: World) -> Result<World, EngineError> {
        if world.paused {
            return Self::update_paused(world);
        }

        let mut world = world;
        for system in &mut self.systems {
            world = system.run(world).inspect_err(|e| {
                log::error!("Tick aborted in '{}': {}", system.name(), e);
            })?;
        }
        world.tick += 1;
        Ok(world)
    }

    fn update_paused(mut world: World) -> Result<World, EngineError> {
        if world.queue.is_empty() {
            return Ok(world);
        }

        let mut scratch = world.clone();
        world.queue = Default::default();
        let applied = QueueDrainSystem::drain(&mut scratch)?;
        log::debug!("Paused: consumed {} queued commands", applied);

        world.paused = scratch.paused;
        Ok(world)
    }
}

impl System for Updater {
    fn run(&mut self, world: World) -> Result<World, EngineError> {
        self.update(world)
    }

    fn name(&self) -> &str {
        "updater"
    }
}
