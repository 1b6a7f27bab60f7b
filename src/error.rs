//! Error types
//!
//! Missing components are never errors: systems and handlers treat them as
//! no-ops. These cover the failures that remain.

use thiserror::Error;

use crate::sim::{ComponentKind, ParticleId};

/// Failures raised while building or updating a world
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("particle id {0} already exists in the world")]
    DuplicateId(ParticleId),

    #[error("particle {id} has more than one {kind:?} component")]
    DuplicateComponent { id: ParticleId, kind: ComponentKind },

    #[error("system '{name}' failed: {message}")]
    System { name: String, message: String },

    #[error("particle ids exhausted past {0}")]
    IdsExhausted(ParticleId),

    #[error("no world is mounted")]
    NotMounted,

    #[error("game loop has been unmounted")]
    Unmounted,
}

impl EngineError {
    /// Wrap a host system failure (e.g. a renderer error)
    pub fn system(name: impl Into<String>, message: impl ToString) -> Self {
        EngineError::System {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

/// Failures loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Validation(String),
}
