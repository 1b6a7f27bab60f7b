//! Collision handlers
//!
//! A handler turns a [`CollisionEvent`] into a [`Command`]. It never touches
//! the world directly; the command is queued by the collision system and
//! applied when the queue drains.

use glam::Vec2;

use super::collision::CollisionEvent;
use super::particle::{Blueprint, Particle};
use super::queue::{Axis, Command};

/// Strategy invoked once per detected collision
pub trait CollisionHandler {
    fn handle(&mut self, event: &CollisionEvent) -> Command;

    /// Run `next` after this handler on the same event
    fn then<H: CollisionHandler>(self, next: H) -> Chain<Self, H>
    where
        Self: Sized,
    {
        compose(self, next)
    }
}

impl<F> CollisionHandler for F
where
    F: FnMut(&CollisionEvent) -> Command,
{
    fn handle(&mut self, event: &CollisionEvent) -> Command {
        self(event)
    }
}

/// Two handlers applied to the same event, first one first
pub struct Chain<A, B> {
    first: A,
    second: B,
}

pub fn compose<A: CollisionHandler, B: CollisionHandler>(first: A, second: B) -> Chain<A, B> {
    Chain { first, second }
}

impl<A: CollisionHandler, B: CollisionHandler> CollisionHandler for Chain<A, B> {
    fn handle(&mut self, event: &CollisionEvent) -> Command {
        let first = self.first.handle(event);
        first.and_then(self.second.handle(event))
    }
}

/// Reflects the collider off the face of the obstacle it crossed.
///
/// Faces are tested against the collider's position one step back, in the
/// order bottom, top, left, right. The collider is placed flush against the
/// face and the matching velocity axis is negated; the other axis is left
/// alone, so a corner hit resolves as two deflections. Obstacles with
/// neither a Size nor a Radius are ignored; a Radius-only obstacle is
/// treated as a point.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bounce;

impl Bounce {
    /// Axis, flush coordinate and reflected speed, if the event is bounceable
    pub fn resolve(event: &CollisionEvent) -> Option<(Axis, f32, f32)> {
        let collider = &event.collider;
        let (pos, velocity, radius) = (
            collider.position()?,
            collider.velocity()?,
            collider.radius()?,
        );

        let obstacle = &event.particle;
        let extent = match (obstacle.size(), obstacle.radius()) {
            (Some(size), _) => Vec2::new(size.width, size.height),
            (None, Some(_)) => Vec2::ZERO,
            (None, None) => return None,
        };
        let corner = obstacle.position().unwrap_or(Vec2::ZERO);

        let side = radius * 2.0;
        let previous = pos - Vec2::splat(radius) - velocity;

        let resolved = if previous.y + side <= corner.y {
            (Axis::Y, corner.y - radius, -velocity.y)
        } else if previous.y >= corner.y + extent.y {
            (Axis::Y, corner.y + extent.y + radius, -velocity.y)
        } else if previous.x + side <= corner.x {
            (Axis::X, corner.x - radius, -velocity.x)
        } else {
            (Axis::X, corner.x + extent.x + radius, -velocity.x)
        };

        Some(resolved)
    }
}

impl CollisionHandler for Bounce {
    fn handle(&mut self, event: &CollisionEvent) -> Command {
        match Self::resolve(event) {
            Some((axis, position, velocity)) => Command::Deflect {
                id: event.collider.id,
                axis,
                position,
                velocity,
            },
            None => Command::Noop,
        }
    }
}

/// Builds replacement particles from the one being destroyed
pub type Fragments = Box<dyn FnMut(&Particle) -> Vec<Blueprint>>;

enum Fate {
    Keep,
    Remove,
    Split(Fragments),
}

impl Fate {
    fn command(&mut self, particle: &Particle) -> Command {
        match self {
            Fate::Keep => Command::Noop,
            Fate::Remove => Command::Remove(particle.id),
            Fate::Split(fragments) => Command::Replace {
                id: particle.id,
                with: fragments(particle),
            },
        }
    }
}

/// Removes the hit particle when it belongs to a family (bricks, ships,
/// missiles), optionally only when hit by a given collider family. Either
/// side can be replaced by derived particles instead of simply vanishing.
pub struct Destroy {
    family: String,
    hit_by: Option<String>,
    target: Fate,
    collider: Fate,
}

impl Destroy {
    /// Destroy hit particles of `family`
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            hit_by: None,
            target: Fate::Remove,
            collider: Fate::Keep,
        }
    }

    /// Only react to colliders of this family
    pub fn hit_by(mut self, family: impl Into<String>) -> Self {
        self.hit_by = Some(family.into());
        self
    }

    /// Replace the hit particle with derived ones
    pub fn split(mut self, fragments: impl FnMut(&Particle) -> Vec<Blueprint> + 'static) -> Self {
        self.target = Fate::Split(Box::new(fragments));
        self
    }

    /// Destroy the collider as well
    pub fn remove_collider(mut self) -> Self {
        self.collider = Fate::Remove;
        self
    }

    /// Destroy the collider and replace it with derived particles
    pub fn split_collider(
        mut self,
        fragments: impl FnMut(&Particle) -> Vec<Blueprint> + 'static,
    ) -> Self {
        self.collider = Fate::Split(Box::new(fragments));
        self
    }

    fn applies(&self, event: &CollisionEvent) -> bool {
        event.particle.is_family(&self.family)
            && self
                .hit_by
                .as_deref()
                .is_none_or(|family| event.collider.is_family(family))
    }
}

impl CollisionHandler for Destroy {
    fn handle(&mut self, event: &CollisionEvent) -> Command {
        if !self.applies(event) {
            return Command::Noop;
        }
        log::debug!(
            "Destroying {} ({}) hit by {}",
            event.particle.id,
            self.family,
            event.collider.id
        );
        let target = self.target.command(&event.particle);
        target.and_then(self.collider.command(&event.collider))
    }
}
