//! Component model
//!
//! A particle carries any subset of these. Systems test for presence
//! instead of assuming a fixed shape: Position+Movement moves, a
//! Position+Size particle without Movement is a static obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rotate_offset;

/// Discriminant of a [`Component`], unique per particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Position,
    Radius,
    Size,
    Movement,
    Thrust,
    Angle,
    Points,
    Color,
}

/// Width/height of an axis-aligned rectangle (top-left anchored at Position)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Engine thrust along the heading plus velocity decay when coasting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thrust {
    pub friction: f32,
    pub thrust: f32,
}

/// Heading in radians and its per-tick change
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle {
    pub angle: f32,
    pub rotation: f32,
}

/// Polygon offsets around Position (ship hulls, asteroid outlines)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Points {
    pub scale: f32,
    pub points: Vec<Vec2>,
}

impl Points {
    pub fn new(scale: f32, points: &[(f32, f32)]) -> Self {
        Self {
            scale,
            points: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        }
    }

    /// World-space vertices: offsets rotated by `angle`, scaled, then
    /// translated to `pos`. Display drivers draw these as a closed path.
    pub fn outline(&self, pos: Vec2, angle: f32) -> Vec<Vec2> {
        self.points
            .iter()
            .map(|&offset| pos + rotate_offset(offset, angle) * self.scale)
            .collect()
    }
}

/// A typed slice of particle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Position(Vec2),
    Radius(f32),
    Size(Rect),
    Movement(Vec2),
    Thrust(Thrust),
    Angle(Angle),
    Points(Points),
    Color(String),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Position(_) => ComponentKind::Position,
            Component::Radius(_) => ComponentKind::Radius,
            Component::Size(_) => ComponentKind::Size,
            Component::Movement(_) => ComponentKind::Movement,
            Component::Thrust(_) => ComponentKind::Thrust,
            Component::Angle(_) => ComponentKind::Angle,
            Component::Points(_) => ComponentKind::Points,
            Component::Color(_) => ComponentKind::Color,
        }
    }

    pub fn position(x: f32, y: f32) -> Self {
        Component::Position(Vec2::new(x, y))
    }

    pub fn movement(x: f32, y: f32) -> Self {
        Component::Movement(Vec2::new(x, y))
    }

    pub fn size(width: f32, height: f32) -> Self {
        Component::Size(Rect::new(width, height))
    }

    pub fn thrust(friction: f32, thrust: f32) -> Self {
        Component::Thrust(Thrust { friction, thrust })
    }

    pub fn angle(angle: f32, rotation: f32) -> Self {
        Component::Angle(Angle { angle, rotation })
    }

    pub fn color(color: impl Into<String>) -> Self {
        Component::Color(color.into())
    }
}
