//! Canvas ECS - a tiny entity-component-system engine for arcade demos
//!
//! Core modules:
//! - `sim`: World model, systems, collision handlers and the command queue
//! - `driver`: Frame-driven game loop bound to a host frame source
//! - `controls`: Keyboard actions mapped to queued commands
//! - `demos`: Headless bounce / breakout / asteroids scenarios
//! - `settings`: Data-driven tuning loaded from JSON

pub mod controls;
pub mod demos;
pub mod driver;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, EngineError};
pub use settings::Settings;

use glam::Vec2;

/// Engine constants
pub mod consts {
    /// Reference tick rate used to normalize thrust and friction.
    /// Physics is frame-step based, so this is not the real frame rate.
    pub const FPS: f32 = 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Paddle speed in pixels per tick
    pub const PADDLE_SPEED: f32 = 7.0;

    /// Ship defaults
    pub const SHIP_THRUST: f32 = 5.0;
    /// Degrees per second
    pub const TURN_SPEED: f32 = 180.0;
    /// Friction coefficient of space (0 = none, 1 = full)
    pub const FRICTION: f32 = 0.7;
    /// Missile speed in pixels per tick
    pub const MISSILE_SPEED: f32 = 6.0;
    pub const MISSILE_RADIUS: f32 = 2.0;
}

/// Unit vector for a heading angle in screen space (y grows downward,
/// so a positive angle points up).
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

/// Rotate a polygon offset by `angle` (ship hulls point along -y at angle 0)
#[inline]
pub fn rotate_offset(offset: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        offset.x * sin - offset.y * cos,
        offset.x * cos + offset.y * sin,
    )
}
