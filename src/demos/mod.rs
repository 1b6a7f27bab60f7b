//! Demo scenarios
//!
//! Each demo supplies a starting world and the system pipeline that drives
//! it. They run headless; a display driver can be appended to the pipeline
//! as an [`inspect`](crate::sim::inspect) system.

pub mod asteroids;
pub mod bounce;
pub mod breakout;

use std::fmt;
use std::str::FromStr;

use crate::controls::{Controls, Key};
use crate::settings::Settings;
use crate::sim::{Blueprint, Command, Component, Updater, World};

/// Thickness of the off-screen boundary walls
pub const WALL_THICKNESS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Bounce,
    Breakout,
    Asteroids,
}

impl Demo {
    pub const ALL: [Demo; 3] = [Demo::Bounce, Demo::Breakout, Demo::Asteroids];

    pub fn as_str(&self) -> &'static str {
        match self {
            Demo::Bounce => "bounce",
            Demo::Breakout => "breakout",
            Demo::Asteroids => "asteroids",
        }
    }

    pub fn world(&self, settings: &Settings) -> World {
        match self {
            Demo::Bounce => bounce::world(settings),
            Demo::Breakout => breakout::world(settings),
            Demo::Asteroids => asteroids::world(settings),
        }
    }

    pub fn pipeline(&self, settings: &Settings) -> Updater {
        match self {
            Demo::Bounce => bounce::pipeline(settings),
            Demo::Breakout => breakout::pipeline(settings),
            Demo::Asteroids => asteroids::pipeline(settings),
        }
    }

    /// Keyboard mapping. The bounce demo only knows the pause key.
    pub fn controls(&self, settings: &Settings) -> Box<dyn Controls> {
        match self {
            Demo::Bounce => Box::new(PauseOnly),
            Demo::Breakout => Box::new(breakout::controls(settings)),
            Demo::Asteroids => Box::new(asteroids::controls(settings)),
        }
    }

    /// Game-specific end condition, if the session has reached one
    pub fn outcome(&self, world: &World, settings: &Settings) -> Option<Outcome> {
        match self {
            Demo::Bounce => None,
            Demo::Breakout => breakout::outcome(world, settings),
            Demo::Asteroids => asteroids::outcome(world),
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

struct PauseOnly;

impl Controls for PauseOnly {
    fn key_down(&mut self, key: Key) -> Option<Command> {
        (key == Key::Pause).then_some(Command::TogglePause)
    }

    fn key_up(&mut self, _key: Key) -> Option<Command> {
        None
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::ALL
            .into_iter()
            .find(|demo| demo.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown demo '{}'", s))
    }
}

/// Which sides of the arena get a wall
#[derive(Debug, Clone, Copy)]
pub struct Sides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Sides {
    pub const ALL: Sides = Sides {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };
}

/// Static walls just outside the arena edges
pub fn walls(settings: &Settings, sides: Sides) -> Vec<Blueprint> {
    let (width, height) = (settings.arena.width, settings.arena.height);
    let wall = |family: &str, x: f32, y: f32, w: f32, h: f32| {
        Blueprint::new()
            .family(family)
            .with(Component::position(x, y))
            .with(Component::size(w, h))
    };

    let mut walls = Vec::with_capacity(4);
    if sides.bottom {
        walls.push(wall("floor", 0.0, height, width, WALL_THICKNESS));
    }
    if sides.right {
        walls.push(wall("rightWall", width, 0.0, WALL_THICKNESS, height));
    }
    if sides.top {
        walls.push(wall("top", 0.0, -WALL_THICKNESS, width, WALL_THICKNESS));
    }
    if sides.left {
        walls.push(wall("leftWall", -WALL_THICKNESS, 0.0, WALL_THICKNESS, height));
    }
    walls
}
