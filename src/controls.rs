//! Keyboard controls
//!
//! Input never mutates the world. A key press becomes a [`Command`] that
//! the host forwards to the session's queue, and the drain step applies it
//! on the next tick.

use serde::{Deserialize, Serialize};

use crate::consts::MISSILE_RADIUS;
use crate::settings::Settings;
use crate::sim::{Blueprint, Command, Component, Selector};
use glam::Vec2;

/// Keys the demos react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Left,
    Up,
    Right,
    Down,
    Pause,
}

impl Key {
    /// Map a DOM-style key code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            32 => Some(Key::Space),
            37 => Some(Key::Left),
            38 => Some(Key::Up),
            39 => Some(Key::Right),
            40 => Some(Key::Down),
            80 => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Maps key transitions to commands
pub trait Controls {
    fn key_down(&mut self, key: Key) -> Option<Command>;
    fn key_up(&mut self, key: Key) -> Option<Command>;
}

/// Single-key mode: while a key is held, further key-downs are ignored.
/// Any key-up releases the gate.
pub struct ExclusiveKeys<C> {
    inner: C,
    held: Option<Key>,
}

impl<C: Controls> ExclusiveKeys<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, held: None }
    }

    pub fn held(&self) -> Option<Key> {
        self.held
    }
}

impl<C: Controls> Controls for ExclusiveKeys<C> {
    fn key_down(&mut self, key: Key) -> Option<Command> {
        if self.held.is_some() {
            return None;
        }
        self.held = Some(key);
        self.inner.key_down(key)
    }

    fn key_up(&mut self, key: Key) -> Option<Command> {
        self.held = None;
        self.inner.key_up(key)
    }
}

/// Left/right move the paddle at a fixed speed; releasing stops it
#[derive(Debug, Clone)]
pub struct PaddleControls {
    pub speed: f32,
    pub family: String,
}

impl PaddleControls {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            family: "paddle".to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.paddle_speed)
    }

    fn set_velocity(&self, x: f32) -> Command {
        Command::SetVelocity {
            target: Selector::family(self.family.clone()),
            velocity: Vec2::new(x, 0.0),
        }
    }
}

impl Controls for PaddleControls {
    fn key_down(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Left => Some(self.set_velocity(-self.speed)),
            Key::Right => Some(self.set_velocity(self.speed)),
            Key::Pause => Some(Command::TogglePause),
            _ => None,
        }
    }

    fn key_up(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Left | Key::Right => Some(self.set_velocity(0.0)),
            _ => None,
        }
    }
}

/// Rotate, thrust and fire
#[derive(Debug, Clone)]
pub struct ShipControls {
    /// Acceleration while the thrust key is held
    pub thrust: f32,
    /// Radians per tick while a turn key is held
    pub turn_rate: f32,
    pub missile_speed: f32,
    pub family: String,
}

impl ShipControls {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            thrust: settings.ship_thrust,
            turn_rate: settings.turn_rate(),
            missile_speed: settings.missile_speed,
            family: "ship".to_string(),
        }
    }

    fn target(&self) -> Selector {
        Selector::family(self.family.clone())
    }

    fn rotate(&self, rotation: f32) -> Command {
        Command::SetRotation {
            target: self.target(),
            rotation,
        }
    }

    fn set_thrust(&self, thrust: f32) -> Command {
        Command::SetThrust {
            target: self.target(),
            thrust,
        }
    }

    fn fire(&self) -> Command {
        Command::Emit {
            source: self.target(),
            blueprint: Blueprint::new()
                .family("missile")
                .with(Component::Radius(MISSILE_RADIUS)),
            speed: self.missile_speed,
        }
    }
}

impl Controls for ShipControls {
    fn key_down(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Left => Some(self.rotate(self.turn_rate)),
            Key::Right => Some(self.rotate(-self.turn_rate)),
            Key::Up => Some(self.set_thrust(self.thrust)),
            Key::Space => Some(self.fire()),
            Key::Pause => Some(Command::TogglePause),
            Key::Down => None,
        }
    }

    fn key_up(&mut self, key: Key) -> Option<Command> {
        match key {
            Key::Left | Key::Right => Some(self.rotate(0.0)),
            Key::Up => Some(self.set_thrust(0.0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{QueueDrainSystem, System, World};

    fn paddle_world() -> World {
        World::from_blueprints([Blueprint::new()
            .family("paddle")
            .with(Component::position(150.0, 380.0))
            .with(Component::size(100.0, 12.0))
            .with(Component::movement(0.0, 0.0))])
    }

    fn apply(mut world: World, command: Option<Command>) -> World {
        if let Some(command) = command {
            world.queue.enqueue(command);
        }
        QueueDrainSystem.run(world).unwrap()
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code(37), Some(Key::Left));
        assert_eq!(Key::from_code(32), Some(Key::Space));
        assert_eq!(Key::from_code(13), None);
    }

    #[test]
    fn test_paddle_moves_and_stops() {
        let mut controls = PaddleControls::new(7.0);

        let world = apply(paddle_world(), controls.key_down(Key::Left));
        assert_eq!(world.particles[0].velocity(), Some(Vec2::new(-7.0, 0.0)));

        let world = apply(world, controls.key_down(Key::Right));
        assert_eq!(world.particles[0].velocity(), Some(Vec2::new(7.0, 0.0)));

        let world = apply(world, controls.key_up(Key::Right));
        assert_eq!(world.particles[0].velocity(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_pause_key_toggles() {
        let mut controls = PaddleControls::new(7.0);
        let world = apply(paddle_world(), controls.key_down(Key::Pause));
        assert!(!world.paused);
    }

    #[test]
    fn test_exclusive_keys_ignore_second_press() {
        let mut controls = ExclusiveKeys::new(PaddleControls::new(7.0));

        assert!(controls.key_down(Key::Left).is_some());
        assert_eq!(controls.held(), Some(Key::Left));
        assert!(controls.key_down(Key::Right).is_none());

        assert!(controls.key_up(Key::Left).is_some());
        assert_eq!(controls.held(), None);
        assert!(controls.key_down(Key::Right).is_some());
    }

    #[test]
    fn test_ship_rotation_and_thrust() {
        let settings = Settings::default();
        let mut controls = ShipControls::from_settings(&settings);
        let world = World::from_blueprints([Blueprint::new()
            .family("ship")
            .with(Component::position(200.0, 200.0))
            .with(Component::movement(0.0, 0.0))
            .with(Component::thrust(0.7, 0.0))
            .with(Component::angle(0.0, 0.0))]);

        let world = apply(world, controls.key_down(Key::Left));
        let world = apply(world, controls.key_down(Key::Up));
        let ship = &world.particles[0];
        assert!((ship.angle().unwrap().rotation - settings.turn_rate()).abs() < 1e-6);
        assert_eq!(ship.thrust().unwrap().thrust, 5.0);

        // Releasing the turn key only stops the rotation
        let world = apply(world, controls.key_up(Key::Left));
        let ship = &world.particles[0];
        assert_eq!(ship.angle().unwrap().rotation, 0.0);
        assert_eq!(ship.thrust().unwrap().thrust, 5.0);

        let world = apply(world, controls.key_up(Key::Up));
        assert_eq!(world.particles[0].thrust().unwrap().thrust, 0.0);
    }

    #[test]
    fn test_ship_fires_missile() {
        let mut controls = ShipControls::from_settings(&Settings::default());
        let world = World::from_blueprints([Blueprint::new()
            .family("ship")
            .with(Component::position(200.0, 200.0))
            .with(Component::angle(std::f32::consts::FRAC_PI_2, 0.0))]);

        let world = apply(world, controls.key_down(Key::Space));
        let missile = world.find_family("missile").unwrap();
        assert_eq!(missile.radius(), Some(2.0));
        let velocity = missile.velocity().unwrap();
        assert!(velocity.x.abs() < 1e-5);
        assert!((velocity.y + 6.0).abs() < 1e-5);
    }
}
