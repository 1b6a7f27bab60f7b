//! Simulation module
//!
//! The engine proper. Everything here is synchronous and host-agnostic:
//! - Worlds are threaded through systems by value
//! - Mutation from events goes through the command queue
//! - Randomness is seeded by callers, never drawn from the OS

pub mod collision;
pub mod component;
pub mod handlers;
pub mod movement;
pub mod particle;
pub mod queue;
pub mod tick;
pub mod world;
pub mod wrap;

pub use collision::{Aabb, CollisionEvent, CollisionSystem, circles_overlap, detect};
pub use component::{Angle, Component, ComponentKind, Points, Rect, Thrust};
pub use handlers::{Bounce, Chain, CollisionHandler, Destroy, Fragments, compose};
pub use movement::MovementSystem;
pub use particle::{Blueprint, IdAllocator, Particle, ParticleId};
pub use queue::{Axis, Command, CommandQueue, QueueDrainSystem, Selector};
pub use tick::{FnSystem, Inspect, System, Updater, from_fn, inspect};
pub use world::World;
pub use wrap::WrapSystem;
