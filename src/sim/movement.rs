//! Movement: thrust, friction, velocity and rotation integration
//!
//! Frame-step based. Thrust and friction are divided by a fixed reference
//! rate, so the simulation speed follows the host's real frame rate.

use super::component::Component;
use super::particle::Particle;
use super::tick::System;
use super::world::World;
use crate::consts::FPS;
use crate::error::EngineError;
use crate::heading;

/// Per-particle integration. Never touches the queue.
#[derive(Debug, Clone, Copy)]
pub struct MovementSystem {
    reference_fps: f32,
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self { reference_fps: FPS }
    }
}

impl MovementSystem {
    pub fn with_reference_fps(reference_fps: f32) -> Self {
        Self { reference_fps }
    }

    /// Advance a single particle by one tick
    pub fn step(&self, mut particle: Particle) -> Particle {
        if let Some(mut velocity) = particle.velocity() {
            if let Some(thrust) = particle.thrust() {
                match particle.angle() {
                    Some(angle) if thrust.thrust != 0.0 => {
                        velocity += heading(angle.angle) * thrust.thrust / self.reference_fps;
                    }
                    // Coasting
                    _ => {
                        velocity -= thrust.friction * velocity / self.reference_fps;
                    }
                }
                particle.replace(Component::Movement(velocity));
            }

            if let Some(pos) = particle.position() {
                particle.replace(Component::Position(pos + velocity));
            }
        }

        if let Some(mut angle) = particle.angle() {
            if angle.rotation != 0.0 {
                angle.angle += angle.rotation;
                particle.replace(Component::Angle(angle));
            }
        }

        particle
    }
}

impl System for MovementSystem {
    fn run(&mut self, mut world: World) -> Result<World, EngineError> {
        world.particles = world
            .particles
            .into_iter()
            .map(|particle| self.step(particle))
            .collect();
        Ok(world)
    }

    fn name(&self) -> &str {
        "movement"
    }
}
