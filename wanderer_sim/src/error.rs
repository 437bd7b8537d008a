//! Error types for the simulation harness.

use thiserror::Error;
use wanderer_core::LifecycleError;

use crate::command::CommandError;

/// Errors that can stop a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Lifecycle manager rejected setup
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Operator command was malformed
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// A lifecycle invariant did not hold after a tick
    #[error("Invariant violated at tick {tick}: {reason}")]
    Invariant { tick: u64, reason: String },

    /// Export could not be written
    #[error("Export error: {0}")]
    Export(#[from] std::io::Error),

    /// Export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Creates an invariant violation.
    pub fn invariant(tick: u64, reason: impl Into<String>) -> Self {
        Self::Invariant {
            tick,
            reason: reason.into(),
        }
    }
}
