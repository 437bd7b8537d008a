//! Error types for the lifecycle manager.

use crate::agent::AgentId;
use thiserror::Error;
use wanderer_env::{EnvError, PhysicalHandle};

/// Errors surfaced by [`AgentLifecycleManager`](crate::AgentLifecycleManager).
///
/// Ticking never produces these; only world setup, external spawns and
/// explicit audits do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    /// World bounds cannot host edge placement
    #[error("Invalid world bounds: {0}")]
    InvalidBounds(#[from] EnvError),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Handle index does not mirror the agents' physical handles
    #[error("Handle index mismatch for {handle}: {reason}")]
    IndexMismatch {
        handle: PhysicalHandle,
        reason: String,
    },

    /// Agent carries a handle the index does not know
    #[error("Agent {0} is physical but unindexed")]
    UnindexedAgent(AgentId),
}

impl LifecycleError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
