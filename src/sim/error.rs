//! Errors raised at the tick boundary when the host breaks a precondition.

use thiserror::Error;

use super::state::AgentId;

/// Host-side contract violations rejected before any state is mutated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("delta time must be finite and positive, got {dt}")]
    InvalidDeltaTime { dt: f32 },

    #[error("agent {id}: {field} must be finite and positive, got {value}")]
    InvalidAgent {
        id: AgentId,
        field: &'static str,
        value: f32,
    },

    #[error("agent {id} targets unknown agent {target}")]
    UnknownTarget { id: AgentId, target: AgentId },

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("duplicate agent id {0}")]
    DuplicateAgent(AgentId),

    #[error("agent id space exhausted")]
    IdSpaceExhausted,
}

pub type Result<T> = std::result::Result<T, SimError>;
