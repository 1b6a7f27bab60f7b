//! Particles, blueprints and id allocation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::component::{Angle, Component, ComponentKind, Points, Rect, Thrust};
use crate::error::EngineError;

/// Unique particle identifier, assigned by the world's [`IdAllocator`]
pub type ParticleId = u32;

/// Monotonic id counter. Ids are never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: ParticleId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new particle id. Fails once the id space is used up
    /// rather than wrapping onto live ids.
    pub fn allocate(&mut self) -> Result<ParticleId, EngineError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(EngineError::IdsExhausted(id))?;
        Ok(id)
    }

    /// Make sure future ids are greater than an externally chosen one
    pub fn reserve(&mut self, id: ParticleId) -> Result<(), EngineError> {
        if id >= self.next_id {
            self.next_id = id.checked_add(1).ok_or(EngineError::IdsExhausted(id))?;
        }
        Ok(())
    }
}

/// Insert or replace the component of the same kind
fn upsert(components: &mut Vec<Component>, component: Component) {
    let kind = component.kind();
    match components.iter_mut().find(|c| c.kind() == kind) {
        Some(slot) => *slot = component,
        None => components.push(component),
    }
}

/// An id-less particle description. Factories build these; the world
/// assigns ids when spawning them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Blueprint {
    pub family: Option<String>,
    components: Vec<Component>,
}

impl Blueprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Add a component, replacing any existing one of the same kind
    pub fn with(mut self, component: Component) -> Self {
        upsert(&mut self.components, component);
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn build(self, id: ParticleId) -> Particle {
        Particle {
            id,
            family: self.family,
            components: self.components,
        }
    }
}

/// An entity in the world: id, optional family tag and at most one
/// component per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub family: Option<String>,
    components: Vec<Component>,
}

impl Particle {
    pub fn new(id: ParticleId) -> Self {
        Self {
            id,
            family: None,
            components: Vec::new(),
        }
    }

    /// Build a particle from a raw component list, rejecting duplicate kinds
    pub fn try_new(
        id: ParticleId,
        family: Option<String>,
        components: Vec<Component>,
    ) -> Result<Self, EngineError> {
        let mut seen: Vec<ComponentKind> = Vec::with_capacity(components.len());
        for component in &components {
            let kind = component.kind();
            if seen.contains(&kind) {
                return Err(EngineError::DuplicateComponent { id, kind });
            }
            seen.push(kind);
        }
        Ok(Self {
            id,
            family,
            components,
        })
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Add a component, replacing any existing one of the same kind
    pub fn with(mut self, component: Component) -> Self {
        self.insert(component);
        self
    }

    pub fn insert(&mut self, component: Component) {
        upsert(&mut self.components, component);
    }

    /// Replace a component only if the particle already has that kind.
    /// Returns false (and leaves the particle alone) otherwise.
    pub fn replace(&mut self, component: Component) -> bool {
        let kind = component.kind();
        match self.components.iter_mut().find(|c| c.kind() == kind) {
            Some(slot) => {
                *slot = component;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        let idx = self.components.iter().position(|c| c.kind() == kind)?;
        Some(self.components.remove(idx))
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_family(&self, family: &str) -> bool {
        self.family.as_deref() == Some(family)
    }

    pub fn position(&self) -> Option<Vec2> {
        match self.get(ComponentKind::Position)? {
            Component::Position(pos) => Some(*pos),
            _ => None,
        }
    }

    pub fn radius(&self) -> Option<f32> {
        match self.get(ComponentKind::Radius)? {
            Component::Radius(radius) => Some(*radius),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<Rect> {
        match self.get(ComponentKind::Size)? {
            Component::Size(size) => Some(*size),
            _ => None,
        }
    }

    pub fn velocity(&self) -> Option<Vec2> {
        match self.get(ComponentKind::Movement)? {
            Component::Movement(velocity) => Some(*velocity),
            _ => None,
        }
    }

    pub fn thrust(&self) -> Option<Thrust> {
        match self.get(ComponentKind::Thrust)? {
            Component::Thrust(thrust) => Some(*thrust),
            _ => None,
        }
    }

    pub fn angle(&self) -> Option<Angle> {
        match self.get(ComponentKind::Angle)? {
            Component::Angle(angle) => Some(*angle),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<&Points> {
        match self.get(ComponentKind::Points)? {
            Component::Points(points) => Some(points),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self.get(ComponentKind::Color)? {
            Component::Color(color) => Some(color.as_str()),
            _ => None,
        }
    }

    /// Circular dynamic body: Position + Radius + Movement
    pub fn is_mover(&self) -> bool {
        self.has(ComponentKind::Position)
            && self.has(ComponentKind::Radius)
            && self.has(ComponentKind::Movement)
    }
}
