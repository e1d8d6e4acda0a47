//! Errors raised while building or evaluating source terms.

use thiserror::Error;

use crate::config::ConfigError;
use crate::field::FieldState;
use crate::types::{BlockIndex, LevelIndex};

/// Error type for source term construction and evaluation.
///
/// Everything except [`ForcingError::Config`] is a broken contract between
/// the caller and the source term (a field that was never declared, a block
/// that does not exist). The integrator is expected to abort on any of them.
#[derive(Debug, Error)]
pub enum ForcingError {
    /// Invalid input configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No field with this name in the repository
    #[error("Field '{0}' not found")]
    FieldNotFound(String),

    /// Field declared twice with incompatible layouts
    #[error("Field '{name}' already declared with {existing} components (requested {requested})")]
    FieldRedeclared {
        name: String,
        existing: usize,
        requested: usize,
    },

    /// Field exists but the requested time state was never allocated
    #[error("Field '{field}' has no state {state}")]
    FieldStateUnavailable { field: String, state: FieldState },

    /// Level index beyond the finest level
    #[error("Level {level} out of range ({num_levels} levels)")]
    LevelOutOfRange { level: LevelIndex, num_levels: usize },

    /// Block index beyond the level's box array
    #[error("Block {block} out of range on level {level} ({num_blocks} blocks)")]
    BlockOutOfRange {
        level: LevelIndex,
        block: BlockIndex,
        num_blocks: usize,
    },

    /// Array has fewer components than the operation needs
    #[error("'{name}' has {actual} components, {expected} required")]
    ComponentMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Number of accumulation buffers does not match the level's blocks
    #[error("Expected {expected} source term buffers on level {level}, got {actual}")]
    BufferCountMismatch {
        level: LevelIndex,
        expected: usize,
        actual: usize,
    },

    /// Wall source term built without a similarity-theory state
    #[error("Source term '{0}' requires a surface-layer (Monin-Obukhov) state")]
    MissingSimilarityState(String),

    /// A writer panicked while holding a field lock
    #[error("Field '{0}' lock poisoned")]
    LockPoisoned(String),
}

impl ForcingError {
    /// Create a component mismatch error.
    pub fn component_mismatch(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ComponentMismatch {
            name: name.into(),
            expected,
            actual,
        }
    }
}
