//! Asteroids: a ship in an open, wrapping arena
//!
//! Missiles split asteroids into the next (smaller) stage; an asteroid that
//! reaches the ship destroys it. The belt layout and fragment velocities
//! come from seeded RNGs, so a seed always replays the same session.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Outcome;
use crate::controls::ShipControls;
use crate::settings::Settings;
use crate::sim::{
    Blueprint, CollisionHandler, CollisionSystem, Component, Destroy, MovementSystem, Particle,
    Points, QueueDrainSystem, Updater, World, WrapSystem,
};
use glam::Vec2;

/// Collision radius per stage
pub const ASTEROID_SIZES: [f32; 3] = [40.0, 20.0, 10.0];
/// Polygon scale per stage
pub const ASTEROID_SCALES: [f32; 3] = [10.0, 5.0, 2.0];
/// Max starting speed along each axis, pixels per tick
pub const ASTEROID_SPEED: f32 = 3.0;

pub const SHIP_SIZE: f32 = 10.0;
pub const SHIP_SCALE: f32 = 3.0;
const SHIP_HULL: [(f32, f32); 5] = [(0.0, -6.0), (-3.0, 3.0), (0.0, 1.0), (3.0, 3.0), (0.0, -6.0)];

const ASTEROID_SHAPES: [&[(f32, f32)]; 5] = [
    &[
        (-4.0, -2.0),
        (-2.0, -4.0),
        (0.0, -2.0),
        (2.0, -4.0),
        (4.0, -2.0),
        (3.0, 0.0),
        (4.0, 2.0),
        (1.0, 4.0),
        (-2.0, 4.0),
        (-4.0, 2.0),
        (-4.0, -2.0),
    ],
    &[
        (-3.0, 0.0),
        (-4.0, -2.0),
        (-2.0, -4.0),
        (0.0, -3.0),
        (2.0, -4.0),
        (4.0, -2.0),
        (2.0, -1.0),
        (4.0, 1.0),
        (2.0, 4.0),
        (-1.0, 3.0),
        (-2.0, 4.0),
        (-4.0, 2.0),
        (-3.0, 0.0),
    ],
    &[
        (-2.0, 0.0),
        (-4.0, -1.0),
        (-1.0, -4.0),
        (2.0, -4.0),
        (4.0, -1.0),
        (4.0, 1.0),
        (2.0, 4.0),
        (0.0, 4.0),
        (0.0, 1.0),
        (-2.0, 4.0),
        (-4.0, 1.0),
        (-2.0, 0.0),
    ],
    &[
        (-1.0, -2.0),
        (-2.0, -4.0),
        (1.0, -4.0),
        (4.0, -2.0),
        (4.0, -1.0),
        (1.0, 0.0),
        (4.0, 2.0),
        (2.0, 4.0),
        (1.0, 3.0),
        (-2.0, 4.0),
        (-4.0, 1.0),
        (-4.0, -2.0),
        (-1.0, -2.0),
    ],
    &[
        (-4.0, -2.0),
        (-2.0, -4.0),
        (2.0, -4.0),
        (4.0, -2.0),
        (4.0, 2.0),
        (2.0, 4.0),
        (-2.0, 4.0),
        (-4.0, 2.0),
        (-4.0, -2.0),
    ],
];

/// An asteroid of `stage` (1 = largest) drifting in a random direction.
/// Stages past the smallest are clamped to it.
pub fn asteroid(stage: usize, pos: Vec2, rng: &mut Pcg32) -> Blueprint {
    let idx = stage.clamp(1, ASTEROID_SIZES.len()) - 1;
    let shape = ASTEROID_SHAPES[rng.random_range(0..ASTEROID_SHAPES.len())];
    let vx = rng.random_range(-ASTEROID_SPEED..=ASTEROID_SPEED);
    let vy = rng.random_range(-ASTEROID_SPEED..=ASTEROID_SPEED);

    Blueprint::new()
        .family("asteroid")
        .with(Component::Position(pos))
        .with(Component::Radius(ASTEROID_SIZES[idx]))
        .with(Component::Points(Points::new(ASTEROID_SCALES[idx], shape)))
        .with(Component::movement(vx, vy))
        .with(Component::angle(0.0, 0.0))
}

/// Stage of an asteroid, read back from its radius
pub fn stage_of(particle: &Particle) -> Option<usize> {
    let radius = particle.radius()?;
    ASTEROID_SIZES
        .iter()
        .position(|&size| size == radius)
        .map(|idx| idx + 1)
}

/// One stage-1 asteroid per outline, scattered over the arena
pub fn belt(settings: &Settings, rng: &mut Pcg32) -> Vec<Blueprint> {
    let (width, height) = (settings.arena.width, settings.arena.height);
    (0..ASTEROID_SHAPES.len())
        .map(|_| {
            let pos = Vec2::new(
                rng.random_range(0.0..width).floor(),
                rng.random_range(0.0..height).floor(),
            );
            asteroid(1, pos, rng)
        })
        .collect()
}

pub fn ship(settings: &Settings) -> Blueprint {
    Blueprint::new()
        .family("ship")
        .with(Component::position(
            settings.arena.width / 2.0,
            settings.arena.height / 2.0,
        ))
        .with(Component::Radius(SHIP_SIZE))
        .with(Component::movement(0.0, 0.0))
        .with(Component::thrust(settings.friction, 0.0))
        .with(Component::Points(Points::new(SHIP_SCALE, &SHIP_HULL)))
        .with(Component::angle(0.0, 0.0))
}

pub fn world(settings: &Settings) -> World {
    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let mut blueprints = vec![ship(settings)];
    blueprints.extend(belt(settings, &mut rng));

    World::from_blueprints(blueprints).with_paused(settings.start_paused)
}

/// Next-stage fragment at the hit asteroid's position; the smallest stage
/// leaves nothing behind
pub fn explode(asteroid_hit: &Particle, rng: &mut Pcg32) -> Vec<Blueprint> {
    match (stage_of(asteroid_hit), asteroid_hit.position()) {
        (Some(stage), Some(pos)) if stage < ASTEROID_SIZES.len() => {
            vec![asteroid(stage + 1, pos, rng)]
        }
        _ => Vec::new(),
    }
}

/// Ship destruction first, then missile hits
pub fn collision_handler(settings: &Settings) -> impl CollisionHandler + 'static {
    let mut rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));

    let ship_hit = Destroy::family("ship").hit_by("asteroid");
    let missile_hit = Destroy::family("missile")
        .hit_by("asteroid")
        .split_collider(move |hit: &Particle| explode(hit, &mut rng));

    ship_hit.then(missile_hit)
}

pub fn pipeline(settings: &Settings) -> Updater {
    Updater::new()
        .with(MovementSystem::with_reference_fps(settings.reference_fps))
        .with(CollisionSystem::new(collision_handler(settings)))
        .with(QueueDrainSystem)
        .with(WrapSystem::new(settings.arena.width, settings.arena.height).cull("missile"))
}

pub fn controls(settings: &Settings) -> ShipControls {
    ShipControls::from_settings(settings)
}

/// Won once the belt is cleared, lost once the ship is gone
pub fn outcome(world: &World) -> Option<Outcome> {
    if world.find_family("ship").is_none() {
        Some(Outcome::Lost)
    } else if world.count_family("asteroid") == 0 {
        Some(Outcome::Won)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::System;

    fn still_asteroid(stage: usize, x: f32, y: f32) -> Blueprint {
        let mut rng = Pcg32::seed_from_u64(0);
        asteroid(stage, Vec2::new(x, y), &mut rng).with(Component::movement(0.0, 0.0))
    }

    fn missile(x: f32, y: f32) -> Blueprint {
        Blueprint::new()
            .family("missile")
            .with(Component::position(x, y))
            .with(Component::Radius(2.0))
            .with(Component::movement(0.0, 0.0))
    }

    fn tick(world: World) -> World {
        pipeline(&Settings::default())
            .run(world.with_paused(false))
            .unwrap()
    }

    #[test]
    fn test_layout() {
        let settings = Settings::default();
        let world = world(&settings);
        assert_eq!(world.count_family("ship"), 1);
        assert_eq!(world.count_family("asteroid"), 5);

        for asteroid in world.particles.iter().filter(|p| p.is_family("asteroid")) {
            assert_eq!(stage_of(asteroid), Some(1));
            let pos = asteroid.position().unwrap();
            assert!(pos.x >= 0.0 && pos.x < 400.0);
            assert!(pos.y >= 0.0 && pos.y < 400.0);
            let v = asteroid.velocity().unwrap();
            assert!(v.x.abs() <= ASTEROID_SPEED && v.y.abs() <= ASTEROID_SPEED);
        }

        let ship = world.find_family("ship").unwrap();
        assert_eq!(ship.position(), Some(Vec2::new(200.0, 200.0)));
        assert_eq!(ship.thrust().unwrap().friction, 0.7);
        assert_eq!(ship.points().unwrap().points.len(), 5);
    }

    #[test]
    fn test_seed_replays_the_belt() {
        let a = Settings {
            seed: 3,
            ..Settings::default()
        };
        let b = Settings {
            seed: 4,
            ..Settings::default()
        };
        assert_eq!(world(&a).particles, world(&a).particles);
        assert_ne!(world(&a).particles, world(&b).particles);
    }

    #[test]
    fn test_missile_splits_asteroid() {
        let world = World::from_blueprints([still_asteroid(1, 100.0, 100.0), missile(110.0, 100.0)]);
        let original = world.find_family("asteroid").unwrap().id;

        let world = tick(world);
        assert_eq!(world.count_family("missile"), 0);
        assert!(world.get(original).is_none());

        let fragment = world.find_family("asteroid").unwrap();
        assert_eq!(stage_of(fragment), Some(2));
        assert_eq!(fragment.radius(), Some(20.0));
        assert!(fragment.id > original);
    }

    #[test]
    fn test_smallest_asteroid_is_destroyed() {
        let world = World::from_blueprints([still_asteroid(3, 100.0, 100.0), missile(105.0, 100.0)]);
        let world = tick(world);
        assert!(world.is_empty());
    }

    #[test]
    fn test_two_missiles_split_once() {
        let world = World::from_blueprints([
            still_asteroid(1, 100.0, 100.0),
            missile(110.0, 100.0),
            missile(90.0, 100.0),
        ]);
        let world = tick(world);
        // Both missiles are spent, but the asteroid only splits once
        assert_eq!(world.count_family("asteroid"), 1);
        assert_eq!(world.count_family("missile"), 0);
        assert_eq!(stage_of(world.find_family("asteroid").unwrap()), Some(2));
    }

    #[test]
    fn test_asteroid_destroys_ship() {
        let settings = Settings::default();
        let world = World::from_blueprints([ship(&settings), still_asteroid(2, 210.0, 200.0)]);
        assert_eq!(outcome(&world), None);

        let world = tick(world);
        assert!(world.find_family("ship").is_none());
        assert_eq!(world.count_family("asteroid"), 1);
        assert_eq!(outcome(&world), Some(Outcome::Lost));
    }

    #[test]
    fn test_missiles_leave_and_asteroids_wrap() {
        let world = World::from_blueprints([
            ship(&Settings::default()),
            missile(399.0, 10.0).with(Component::movement(6.0, 0.0)),
            still_asteroid(3, 399.0, 300.0).with(Component::movement(3.0, 0.0)),
        ]);
        let world = tick(world);

        assert_eq!(world.count_family("missile"), 0);
        let asteroid = world.find_family("asteroid").unwrap();
        assert_eq!(asteroid.position(), Some(Vec2::new(0.0, 300.0)));
    }

    #[test]
    fn test_explode_needs_a_stage() {
        let mut rng = Pcg32::seed_from_u64(1);
        let rock = Blueprint::new()
            .family("asteroid")
            .with(Component::position(0.0, 0.0))
            .with(Component::Radius(7.0))
            .build(1);
        assert!(explode(&rock, &mut rng).is_empty());
    }
}
