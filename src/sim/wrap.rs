//! Screen-edge handling for open arenas
//!
//! Particles that drift past an edge reappear on the opposite one. Families
//! in the cull list (missiles) are dropped instead once they leave the
//! arena.

use glam::Vec2;

use super::component::Component;
use super::particle::Particle;
use super::tick::System;
use super::world::World;
use crate::error::EngineError;

pub struct WrapSystem {
    width: f32,
    height: f32,
    cull_families: Vec<String>,
}

impl WrapSystem {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            cull_families: Vec::new(),
        }
    }

    /// Remove particles of this family when they leave the arena
    pub fn cull(mut self, family: impl Into<String>) -> Self {
        self.cull_families.push(family.into());
        self
    }

    fn is_culled(&self, particle: &Particle) -> bool {
        particle
            .family
            .as_deref()
            .is_some_and(|family| self.cull_families.iter().any(|f| f == family))
    }

    /// Strictly inside the arena
    fn inside(&self, pos: Vec2) -> bool {
        pos.x > 0.0 && pos.x < self.width && pos.y > 0.0 && pos.y < self.height
    }

    fn wrap(&self, pos: Vec2) -> Vec2 {
        let wrap_axis = |v: f32, max: f32| {
            if v < 0.0 {
                max
            } else if v > max {
                0.0
            } else {
                v
            }
        };
        Vec2::new(wrap_axis(pos.x, self.width), wrap_axis(pos.y, self.height))
    }
}

impl System for WrapSystem {
    fn run(&mut self, mut world: World) -> Result<World, EngineError> {
        let before = world.len();

        world.particles.retain(|p| match p.position() {
            Some(pos) if self.is_culled(p) => self.inside(pos),
            _ => true,
        });
        for particle in &mut world.particles {
            if let Some(pos) = particle.position() {
                let wrapped = self.wrap(pos);
                if wrapped != pos {
                    particle.replace(Component::Position(wrapped));
                }
            }
        }

        let culled = before - world.len();
        if culled > 0 {
            log::debug!("Culled {} particles off screen", culled);
        }
        Ok(world)
    }

    fn name(&self) -> &str {
        "wrap"
    }
}
