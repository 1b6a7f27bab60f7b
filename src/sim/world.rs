//! World state
//!
//! Everything a session needs lives here: the particle list, the pause
//! flag, the deferred command queue and the id counter.

use serde::{Deserialize, Serialize};

use super::particle::{Blueprint, IdAllocator, Particle, ParticleId};
use super::queue::CommandQueue;
use crate::error::EngineError;

/// Full simulation state, threaded through every system each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Pause flag, sampled at the start of each update
    pub paused: bool,
    /// Particles (order has no meaning but is kept stable for rendering)
    pub particles: Vec<Particle>,
    /// Deferred commands, drained once per tick
    pub queue: CommandQueue,
    /// Number of non-paused updates applied so far
    pub tick: u64,
    ids: IdAllocator,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world. Sessions start paused.
    pub fn new() -> Self {
        Self {
            paused: true,
            particles: Vec::new(),
            queue: CommandQueue::new(),
            tick: 0,
            ids: IdAllocator::new(),
        }
    }

    /// Create a world and spawn every blueprint in order
    pub fn from_blueprints(blueprints: impl IntoIterator<Item = Blueprint>) -> Self {
        let mut world = Self::new();
        for blueprint in blueprints {
            // A fresh allocator cannot run out before memory does
            if let Err(e) = world.spawn(blueprint) {
                log::error!("{}", e);
                break;
            }
        }
        world
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Assign a fresh id to a blueprint and append it
    pub fn spawn(&mut self, blueprint: Blueprint) -> Result<ParticleId, EngineError> {
        let id = self.ids.allocate()?;
        self.particles.push(blueprint.build(id));
        Ok(id)
    }

    /// Append a particle that already carries an id
    pub fn insert(&mut self, particle: Particle) -> Result<(), EngineError> {
        if self.contains(particle.id) {
            return Err(EngineError::DuplicateId(particle.id));
        }
        self.ids.reserve(particle.id)?;
        self.particles.push(particle);
        Ok(())
    }

    /// Remove a particle by id, returning it if present
    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let idx = self.particles.iter().position(|p| p.id == id)?;
        Some(self.particles.remove(idx))
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.particles.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }

    /// First particle tagged with `family`
    pub fn find_family(&self, family: &str) -> Option<&Particle> {
        self.particles.iter().find(|p| p.is_family(family))
    }

    pub fn count_family(&self, family: &str) -> usize {
        self.particles.iter().filter(|p| p.is_family(family)).count()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
