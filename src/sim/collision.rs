//! Collision detection
//!
//! Broad phase only: circular movers are tested against rectangles and other
//! circles. A hit is handed to a [`CollisionHandler`], and the command it
//! returns is queued. Nothing is resolved here.

use glam::Vec2;

use super::handlers::CollisionHandler;
use super::particle::Particle;
use super::tick::System;
use super::world::World;
use crate::error::EngineError;

/// A detected overlap, passed to handlers and then dropped
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    /// The particle that was hit (wall, brick, ship, other circle)
    pub particle: Particle,
    /// The moving circle that hit it
    pub collider: Particle,
}

/// Axis-aligned box, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bounding square of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            size: Vec2::splat(radius * 2.0),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes that only touch along an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Circle-vs-circle overlap (distance strictly below the sum of radii)
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Test one mover against one other particle
fn hits(mover: &Particle, other: &Particle) -> bool {
    let (Some(pos), Some(radius)) = (mover.position(), mover.radius()) else {
        return false;
    };

    match (other.position(), other.size(), other.radius()) {
        (Some(other_pos), Some(size), _) => Aabb::around_circle(pos, radius)
            .overlaps(&Aabb::new(other_pos, Vec2::new(size.width, size.height))),
        (Some(other_pos), None, Some(other_radius)) if other.id != mover.id => {
            circles_overlap(pos, radius, other_pos, other_radius)
        }
        _ => false,
    }
}

/// Find every (mover, other) overlap in detection order.
///
/// Movers are particles with Position + Radius + Movement. A particle is
/// never paired with itself.
pub fn detect(particles: &[Particle]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for (i, mover) in particles.iter().enumerate() {
        if !mover.is_mover() {
            continue;
        }
        for (j, other) in particles.iter().enumerate() {
            if i == j {
                continue;
            }
            if hits(mover, other) {
                events.push(CollisionEvent {
                    particle: other.clone(),
                    collider: mover.clone(),
                });
            }
        }
    }

    events
}

/// Detects overlaps and queues the handler's response to each one
pub struct CollisionSystem<H> {
    handler: H,
}

impl<H: CollisionHandler> CollisionSystem<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H: CollisionHandler> System for CollisionSystem<H> {
    fn run(&mut self, mut world: World) -> Result<World, EngineError> {
        let events = detect(&world.particles);
        if !events.is_empty() {
            log::debug!("Tick {}: {} collisions", world.tick, events.len());
        }

        for event in &events {
            log::trace!(
                "Collision: {} ({:?}) hit {} ({:?})",
                event.collider.id,
                event.collider.family,
                event.particle.id,
                event.particle.family
            );
            world.queue.enqueue(self.handler.handle(event));
        }

        Ok(world)
    }

    fn name(&self) -> &str {
        "collision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Blueprint, Command, Component};

    fn ball(x: f32, y: f32) -> Blueprint {
        Blueprint::new()
            .family("ball")
            .with(Component::position(x, y))
            .with(Component::Radius(20.0))
            .with(Component::movement(5.0, 5.0))
    }

    fn wall(x: f32, y: f32, width: f32, height: f32) -> Blueprint {
        Blueprint::new()
            .family("wall")
            .with(Component::position(x, y))
            .with(Component::size(width, height))
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.overlaps(&Aabb::new(Vec2::splat(5.0), Vec2::splat(10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(20.0, 0.0), Vec2::splat(10.0))));
        // Touching edges do not overlap
        assert!(!a.overlaps(&Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0))));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(8.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_ball_hits_wall() {
        let world = World::from_blueprints([ball(100.0, 85.0), wall(50.0, 100.0, 100.0, 10.0)]);

        let events = detect(&world.particles);
        assert_eq!(events.len(), 1);
        assert!(events[0].particle.is_family("wall"));
        assert!(events[0].collider.is_family("ball"));
    }

    #[test]
    fn test_ball_clear_of_wall() {
        let world = World::from_blueprints([ball(100.0, 50.0), wall(50.0, 100.0, 100.0, 10.0)]);
        assert!(detect(&world.particles).is_empty());
    }

    #[test]
    fn test_no_self_collision() {
        let world = World::from_blueprints([ball(100.0, 85.0)]);
        assert!(detect(&world.particles).is_empty());

        // A mover that also carries a Size must not hit its own rectangle
        let world = World::from_blueprints([ball(0.0, 0.0).with(Component::size(10.0, 10.0))]);
        assert!(detect(&world.particles).is_empty());
    }

    #[test]
    fn test_two_balls_report_each_other() {
        let world = World::from_blueprints([ball(100.0, 100.0), ball(110.0, 100.0)]);
        let ids: Vec<_> = world.particles.iter().map(|p| p.id).collect();

        let events = detect(&world.particles);
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].collider.id, events[0].particle.id), (ids[0], ids[1]));
        assert_eq!((events[1].collider.id, events[1].particle.id), (ids[1], ids[0]));
    }

    #[test]
    fn test_static_particles_never_collide() {
        // Walls overlap each other but neither moves
        let world = World::from_blueprints([
            wall(0.0, 0.0, 50.0, 50.0),
            wall(10.0, 10.0, 50.0, 50.0),
        ]);
        assert!(detect(&world.particles).is_empty());
    }

    #[test]
    fn test_shapeless_particle_is_skipped() {
        let world = World::from_blueprints([
            ball(0.0, 0.0),
            Blueprint::new().family("marker").with(Component::position(0.0, 0.0)),
        ]);
        assert!(detect(&world.particles).is_empty());
    }

    #[test]
    fn test_system_enqueues_without_resolving() {
        let world = World::from_blueprints([ball(100.0, 85.0), wall(50.0, 100.0, 100.0, 10.0)]);
        let before = world.particles.clone();
        let wall_id = world.particles[1].id;

        let mut system = CollisionSystem::new(|event: &CollisionEvent| Command::Remove(event.particle.id));
        let mut world = system.run(world).unwrap();

        assert_eq!(world.particles, before);
        assert_eq!(world.queue.len(), 1);
        assert_eq!(world.queue.dequeue(), Some(Command::Remove(wall_id)));
    }
}
