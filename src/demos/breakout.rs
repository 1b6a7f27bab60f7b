//! Breakout: a ball, a paddle and eight rows of bricks
//!
//! The brick grid is centred horizontally: 14 bricks of 25px with 13 gaps
//! of 2px span 376px, which leaves a 12px margin either side of a 400px
//! arena.

use super::{Outcome, Sides, walls};
use crate::controls::{ExclusiveKeys, PaddleControls};
use crate::settings::Settings;
use crate::sim::{
    Blueprint, Bounce, CollisionHandler, CollisionSystem, Component, Destroy, MovementSystem,
    QueueDrainSystem, Updater, World,
};

pub const WALL_SIZE: f32 = 12.0;
pub const BRICK_WIDTH: f32 = 25.0;
pub const BRICK_HEIGHT: f32 = 12.0;
pub const BRICK_GAP: f32 = 2.0;
pub const BRICKS_PER_ROW: usize = 14;
pub const BLANK_ROWS: usize = 6;

pub const BALL_RADIUS: f32 = 5.0;
pub const PADDLE_WIDTH: f32 = 60.0;
pub const PADDLE_HEIGHT: f32 = 10.0;

/// Two rows each, top to bottom
const ROW_COLORS: [&str; 4] = ["red", "orange", "green", "yellow"];

/// Total width of one brick row
pub const ROW_WIDTH: f32 =
    BRICK_WIDTH * BRICKS_PER_ROW as f32 + BRICK_GAP * (BRICKS_PER_ROW - 1) as f32;

pub fn bricks(settings: &Settings) -> Vec<Blueprint> {
    let margin = ((settings.arena.width - ROW_WIDTH) / 2.0).max(0.0);
    let rows = ROW_COLORS.iter().flat_map(|color| [*color, *color]);

    rows.enumerate()
        .flat_map(|(i, color)| {
            let row = (BLANK_ROWS + i) as f32;
            (0..BRICKS_PER_ROW).map(move |col| {
                Blueprint::new()
                    .family("brick")
                    .with(Component::position(
                        margin + (BRICK_WIDTH + BRICK_GAP) * col as f32,
                        WALL_SIZE + (BRICK_HEIGHT + BRICK_GAP) * row,
                    ))
                    .with(Component::size(BRICK_WIDTH, BRICK_HEIGHT))
                    .with(Component::color(color))
            })
        })
        .collect()
}

pub fn world(settings: &Settings) -> World {
    let (width, height) = (settings.arena.width, settings.arena.height);

    let mut blueprints = vec![
        Blueprint::new()
            .family("ball")
            .with(Component::position(width / 2.0, height - 150.0))
            .with(Component::Radius(BALL_RADIUS))
            .with(Component::movement(3.0, -3.0))
            .with(Component::color("grey")),
        Blueprint::new()
            .family("paddle")
            .with(Component::position((width - PADDLE_WIDTH) / 2.0, height - 100.0))
            .with(Component::size(PADDLE_WIDTH, PADDLE_HEIGHT))
            .with(Component::movement(0.0, 0.0))
            .with(Component::color("cyan")),
    ];
    // Open at the bottom: a missed ball is lost
    blueprints.extend(walls(
        settings,
        Sides {
            bottom: false,
            ..Sides::ALL
        },
    ));
    blueprints.extend(bricks(settings));

    World::from_blueprints(blueprints).with_paused(settings.start_paused)
}

pub fn pipeline(settings: &Settings) -> Updater {
    Updater::new()
        .with(MovementSystem::with_reference_fps(settings.reference_fps))
        .with(CollisionSystem::new(Bounce.then(Destroy::family("brick"))))
        .with(QueueDrainSystem)
}

pub fn controls(settings: &Settings) -> ExclusiveKeys<PaddleControls> {
    ExclusiveKeys::new(PaddleControls::from_settings(settings))
}

/// Won once every brick is gone, lost once the ball drops out of the arena
pub fn outcome(world: &World, settings: &Settings) -> Option<Outcome> {
    if world.count_family("brick") == 0 {
        return Some(Outcome::Won);
    }
    let in_play = world.particles.iter().filter(|p| p.is_family("ball")).any(|ball| {
        match (ball.position(), ball.radius()) {
            (Some(pos), Some(radius)) => pos.y - radius <= settings.arena.height,
            _ => false,
        }
    });
    if in_play { None } else { Some(Outcome::Lost) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Arena;
    use crate::sim::System;
    use glam::Vec2;

    #[test]
    fn test_brick_grid() {
        let bricks = World::from_blueprints(bricks(&Settings::default()));
        assert_eq!(bricks.len(), 8 * BRICKS_PER_ROW);

        for color in ROW_COLORS {
            let count = bricks.particles.iter().filter(|p| p.color() == Some(color)).count();
            assert_eq!(count, 2 * BRICKS_PER_ROW, "{} bricks", color);
        }

        // Last brick of the last row ends flush with the right margin
        let last = bricks.particles.last().unwrap();
        let pos = last.position().unwrap();
        assert_eq!(pos.x + BRICK_WIDTH, 400.0 - WALL_SIZE);
        assert_eq!(pos.y, WALL_SIZE + 13.0 * (BRICK_HEIGHT + BRICK_GAP));
    }

    #[test]
    fn test_brick_grid_follows_arena_width() {
        let settings = Settings {
            arena: Arena {
                width: 600.0,
                height: 400.0,
            },
            ..Settings::default()
        };
        let bricks = World::from_blueprints(bricks(&settings));

        let first = bricks.particles.first().unwrap().position().unwrap();
        let last = bricks.particles.last().unwrap().position().unwrap();
        assert_eq!(first.x, 112.0);
        assert_eq!(last.x + BRICK_WIDTH, 600.0 - 112.0);
        // Rows stay anchored to the top
        assert_eq!(first.y, WALL_SIZE + BLANK_ROWS as f32 * (BRICK_HEIGHT + BRICK_GAP));
    }

    #[test]
    fn test_layout() {
        let world = world(&Settings::default());
        assert_eq!(world.count_family("brick"), 112);
        assert_eq!(world.count_family("ball"), 1);
        assert!(world.find_family("paddle").is_some());
        assert!(world.find_family("floor").is_none());
    }

    #[test]
    fn test_ball_breaks_first_brick() {
        let settings = Settings::default();
        let mut world = world(&settings).with_paused(false);
        let mut updater = pipeline(&settings);

        for _ in 0..13 {
            world = updater.run(world).unwrap();
        }
        assert_eq!(world.count_family("brick"), 112);

        world = updater.run(world).unwrap();
        assert_eq!(world.count_family("brick"), 111);
        let ball = world.find_family("ball").unwrap();
        // Bounced off the underside of the brick
        assert_eq!(ball.position(), Some(Vec2::new(242.0, 211.0)));
        assert_eq!(ball.velocity(), Some(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_unattended_ball_is_lost() {
        let settings = Settings::default();
        let mut world = world(&settings).with_paused(false);
        let mut updater = pipeline(&settings);

        let mut ticks = 0;
        while outcome(&world, &settings).is_none() && ticks < 500 {
            world = updater.run(world).unwrap();
            ticks += 1;
        }
        assert_eq!(outcome(&world, &settings), Some(Outcome::Lost));
        assert!(world.count_family("brick") < 112);
    }

    #[test]
    fn test_cleared_grid_wins() {
        let settings = Settings::default();
        let mut world = world(&settings);
        let bricks: Vec<_> = world
            .particles
            .iter()
            .filter(|p| p.is_family("brick"))
            .map(|p| p.id)
            .collect();
        for id in bricks {
            world.remove(id);
        }
        assert_eq!(outcome(&world, &settings), Some(Outcome::Won));
    }
}
