//! A ball bouncing around a walled box

use super::{Sides, walls};
use crate::settings::Settings;
use crate::sim::{
    Blueprint, Bounce, CollisionSystem, Component, MovementSystem, QueueDrainSystem, Updater,
    World,
};

pub const BALL_RADIUS: f32 = 20.0;
pub const BALL_SPEED: f32 = 3.0;

pub fn ball(x: f32, y: f32, vx: f32, vy: f32) -> Blueprint {
    Blueprint::new()
        .family("ball")
        .with(Component::position(x, y))
        .with(Component::Radius(BALL_RADIUS))
        .with(Component::movement(vx, vy))
        .with(Component::color("grey"))
}

pub fn world(settings: &Settings) -> World {
    let mut blueprints = vec![ball(30.0, 30.0, BALL_SPEED, BALL_SPEED)];
    blueprints.extend(walls(settings, Sides::ALL));

    World::from_blueprints(blueprints).with_paused(settings.start_paused)
}

pub fn pipeline(settings: &Settings) -> Updater {
    Updater::new()
        .with(MovementSystem::with_reference_fps(settings.reference_fps))
        .with(CollisionSystem::new(Bounce))
        .with(QueueDrainSystem)
}
