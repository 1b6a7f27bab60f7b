//! Engine and demo settings
//!
//! Loaded from a JSON file on native builds. Missing fields fall back to
//! the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::ConfigError;

/// Accepted range for `reference_fps`
pub const FPS_RANGE: std::ops::RangeInclusive<f32> = 1.0..=1000.0;

/// Arena dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: consts::ARENA_WIDTH,
            height: consts::ARENA_HEIGHT,
        }
    }
}

/// Tuning knobs shared by the engine and the demo scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Engine ===
    /// Tick-rate normalizer for thrust and friction
    pub reference_fps: f32,
    /// Playfield size
    pub arena: Arena,
    /// Seed for the demo RNG
    pub seed: u64,
    /// Sessions start paused until the pause key is pressed
    pub start_paused: bool,

    // === Controls ===
    /// Paddle speed in pixels per tick
    pub paddle_speed: f32,
    /// Ship acceleration
    pub ship_thrust: f32,
    /// Ship turn rate in degrees per second
    pub turn_speed: f32,
    /// Friction coefficient of space (0 = none, 1 = full)
    pub friction: f32,
    /// Missile speed in pixels per tick
    pub missile_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_fps: consts::FPS,
            arena: Arena::default(),
            seed: 0,
            start_paused: true,

            paddle_speed: consts::PADDLE_SPEED,
            ship_thrust: consts::SHIP_THRUST,
            turn_speed: consts::TURN_SPEED,
            friction: consts::FRICTION,
            missile_speed: consts::MISSILE_SPEED,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FPS_RANGE.contains(&self.reference_fps) {
            return Err(ConfigError::Validation(format!(
                "reference_fps must be within [{}, {}], got {}",
                FPS_RANGE.start(),
                FPS_RANGE.end(),
                self.reference_fps
            )));
        }
        let arena_ok = |side: f32| side > 0.0 && side.is_finite();
        if !(arena_ok(self.arena.width) && arena_ok(self.arena.height)) {
            return Err(ConfigError::Validation(format!(
                "arena must be non-empty, got {}x{}",
                self.arena.width, self.arena.height
            )));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::Validation(format!(
                "friction must be within [0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }

    /// Per-tick ship rotation in radians
    pub fn turn_rate(&self) -> f32 {
        self.turn_speed.to_radians() / self.reference_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.reference_fps, 60.0);
        assert_eq!(settings.paddle_speed, 7.0);
        assert!(settings.start_paused);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.seed = 42;
        settings.arena.width = 640.0;

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "friction": 0.5 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.friction, 0.5);
        assert_eq!(settings.arena, Arena::default());
        assert_eq!(settings.missile_speed, 6.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for json in [
            r#"{ "reference_fps": 0 }"#,
            r#"{ "reference_fps": 1e-30 }"#,
            r#"{ "reference_fps": 1e30 }"#,
            r#"{ "arena": { "width": -1, "height": 400 } }"#,
            r#"{ "friction": 1.5 }"#,
        ] {
            assert!(
                matches!(Settings::from_json(json), Err(ConfigError::Validation(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        for fps in [f32::INFINITY, f32::NAN, f32::MIN_POSITIVE / 2.0] {
            let settings = Settings {
                reference_fps: fps,
                ..Settings::default()
            };
            assert!(settings.validate().is_err(), "accepted fps {}", fps);
        }

        let settings = Settings {
            arena: Arena {
                width: f32::INFINITY,
                height: 400.0,
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Settings::load("/nonexistent/canvas-ecs/settings.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
        assert_eq!(
            Settings::load_or_default("/nonexistent/canvas-ecs/settings.json"),
            Settings::default()
        );
    }

    #[test]
    fn test_turn_rate() {
        // 180 deg/s at 60 fps is pi/60 per tick
        let rate = Settings::default().turn_rate();
        assert!((rate - std::f32::consts::PI / 60.0).abs() < 1e-6);
    }
}
