//! Deferred command queue
//!
//! Input handlers and collision handlers never touch particles directly.
//! They enqueue a [`Command`], and [`QueueDrainSystem`] applies every queued
//! command at a fixed point in the pipeline, so detection always finishes
//! before resolution starts.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::component::Component;
use super::particle::{Blueprint, Particle, ParticleId};
use super::tick::System;
use super::world::World;
use crate::error::EngineError;
use crate::heading;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }
}

/// Which particles a command applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    Id(ParticleId),
    /// Every particle tagged with this family
    Family(String),
}

impl Selector {
    pub fn id(id: ParticleId) -> Self {
        Selector::Id(id)
    }

    pub fn family(family: impl Into<String>) -> Self {
        Selector::Family(family.into())
    }

    pub fn matches(&self, particle: &Particle) -> bool {
        match self {
            Selector::Id(id) => particle.id == *id,
            Selector::Family(family) => particle.is_family(family),
        }
    }
}

/// A deferred world transform. Commands aimed at particles that no longer
/// exist (or lack the component being written) do nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Noop,
    TogglePause,
    /// Drop a particle
    Remove(ParticleId),
    /// Overwrite the Movement component
    SetVelocity { target: Selector, velocity: Vec2 },
    /// Overwrite the thrust amount, keeping friction
    SetThrust { target: Selector, thrust: f32 },
    /// Overwrite the rotation rate, keeping the current angle
    SetRotation { target: Selector, rotation: f32 },
    /// Set one axis of a particle's position and velocity, leaving the
    /// other axis alone (collision resolution against a single face)
    Deflect {
        id: ParticleId,
        axis: Axis,
        position: f32,
        velocity: f32,
    },
    /// Add new particles
    Spawn(Vec<Blueprint>),
    /// Remove a particle and add derived ones in its place. Nothing is
    /// spawned if the particle is already gone.
    Replace {
        id: ParticleId,
        with: Vec<Blueprint>,
    },
    /// Spawn a projectile at the source's position, moving along its heading
    Emit {
        source: Selector,
        blueprint: Blueprint,
        speed: f32,
    },
    /// Apply several commands in order
    Batch(Vec<Command>),
}

impl Command {
    /// Chain two commands so `self` applies first
    pub fn and_then(self, next: Command) -> Command {
        match (self, next) {
            (Command::Noop, next) => next,
            (first, Command::Noop) => first,
            (Command::Batch(mut first), Command::Batch(rest)) => {
                first.extend(rest);
                Command::Batch(first)
            }
            (Command::Batch(mut first), next) => {
                first.push(next);
                Command::Batch(first)
            }
            (first, next) => Command::Batch(vec![first, next]),
        }
    }

    /// Apply the command to the world. Only spawning can fail, once the
    /// world runs out of particle ids.
    pub fn apply(self, world: &mut World) -> Result<(), EngineError> {
        match self {
            Command::Noop => {}
            Command::TogglePause => {
                world.paused = !world.paused;
                log::info!("{}", if world.paused { "Paused" } else { "Resumed" });
            }
            Command::Remove(id) => {
                world.remove(id);
            }
            Command::SetVelocity { target, velocity } => {
                for particle in world.particles.iter_mut().filter(|p| target.matches(p)) {
                    particle.replace(Component::Movement(velocity));
                }
            }
            Command::SetThrust { target, thrust } => {
                for particle in world.particles.iter_mut().filter(|p| target.matches(p)) {
                    if let Some(mut current) = particle.thrust() {
                        current.thrust = thrust;
                        particle.replace(Component::Thrust(current));
                    }
                }
            }
            Command::SetRotation { target, rotation } => {
                for particle in world.particles.iter_mut().filter(|p| target.matches(p)) {
                    if let Some(mut current) = particle.angle() {
                        current.rotation = rotation;
                        particle.replace(Component::Angle(current));
                    }
                }
            }
            Command::Deflect {
                id,
                axis,
                position,
                velocity,
            } => {
                let Some(particle) = world.get_mut(id) else {
                    return Ok(());
                };
                if let (Some(mut pos), Some(mut vel)) = (particle.position(), particle.velocity()) {
                    axis.set(&mut pos, position);
                    axis.set(&mut vel, velocity);
                    particle.replace(Component::Position(pos));
                    particle.replace(Component::Movement(vel));
                }
            }
            Command::Spawn(blueprints) => {
                for blueprint in blueprints {
                    world.spawn(blueprint)?;
                }
            }
            Command::Replace { id, with } => {
                if world.remove(id).is_some() {
                    for blueprint in with {
                        world.spawn(blueprint)?;
                    }
                }
            }
            Command::Emit {
                source,
                blueprint,
                speed,
            } => {
                let origin = world
                    .particles
                    .iter()
                    .filter(|p| source.matches(p))
                    .find_map(|p| p.position().map(|pos| (pos, p.angle())));
                if let Some((pos, angle)) = origin {
                    let angle = angle.map(|a| a.angle).unwrap_or(0.0);
                    world.spawn(
                        blueprint
                            .with(Component::Position(pos))
                            .with(Component::Movement(heading(angle) * speed)),
                    )?;
                }
            }
            Command::Batch(commands) => {
                for command in commands {
                    command.apply(world)?;
                }
            }
        }
        Ok(())
    }
}

/// Unbounded FIFO of deferred commands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Oldest command, or None when empty
    pub fn dequeue(&mut self) -> Option<Command> {
        self.commands.pop_front()
    }

    pub fn peek(&self) -> Option<&Command> {
        self.commands.front()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

/// Applies queued commands until the queue is empty. Commands queued while
/// draining are applied in the same pass. This is the only system that
/// dequeues.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueDrainSystem;

impl QueueDrainSystem {
    /// Drain without going through the `System` trait
    pub fn drain(world: &mut World) -> Result<usize, EngineError> {
        let mut applied = 0;
        while let Some(command) = world.queue.dequeue() {
            command.apply(world)?;
            applied += 1;
        }
        Ok(applied)
    }
}

impl System for QueueDrainSystem {
    fn run(&mut self, mut world: World) -> Result<World, EngineError> {
        let applied = Self::drain(&mut world)?;
        if applied > 0 {
            log::debug!("Applied {} queued commands", applied);
        }
        Ok(world)
    }

    fn name(&self) -> &str {
        "queue_drain"
    }
}
