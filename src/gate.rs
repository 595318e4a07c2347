//! Readiness gate
//!
//! Turns a computed [`TopicLockStatus`] into what the caller should do with it.
//! In `observe` mode a lock is only reported; in `enforce` mode it restricts
//! access unless a session override is consumed.

use serde::{Deserialize, Serialize};

use crate::overrides::OverrideStore;
use crate::readiness::TopicLockStatus;
use crate::types::LockMode;

/// Telemetry event names
pub mod events {
    pub const LOCK_WOULD_BLOCK: &str = "lock_would_block";
    pub const LOCK_BLOCKED: &str = "lock_blocked";
    pub const LOCK_OVERRIDE_USED: &str = "lock_override_used";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    WouldBlock,
    Blocked,
    OverrideUsed,
}

impl GateDecision {
    pub fn restricts_access(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// Event emitted for this decision, if any
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::WouldBlock => Some(events::LOCK_WOULD_BLOCK),
            Self::Blocked => Some(events::LOCK_BLOCKED),
            Self::OverrideUsed => Some(events::LOCK_OVERRIDE_USED),
        }
    }
}

pub fn evaluate_gate(status: &TopicLockStatus, overrides: &OverrideStore) -> GateDecision {
    if !status.locked {
        return GateDecision::Allow;
    }

    let decision = match status.mode {
        LockMode::Observe => GateDecision::WouldBlock,
        LockMode::Enforce if overrides.consume_override(&status.topic_key) => {
            GateDecision::OverrideUsed
        }
        LockMode::Enforce => GateDecision::Blocked,
    };

    if let Some(event) = decision.event_name() {
        tracing::info!(
            event,
            topic = %status.topic_key,
            mode = %status.mode,
            readiness_score = status.readiness_score,
            accuracy = status.accuracy,
            "readiness lock evaluated"
        );
    }
    decision
}
