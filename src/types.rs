//! Common Types
//!
//! Value types shared across the scheduling and readiness modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock instant used for all due-time arithmetic
pub type Timestamp = DateTime<Utc>;

/// Seconds in one scheduling day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Review item as read from the learner's history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMeta {
    pub id: String,
    pub due_at: Timestamp,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ItemMeta {
    pub fn new(id: impl Into<String>, due_at: Timestamp, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            due_at,
            tags,
        }
    }

    /// True when the two items have at least one tag in common
    pub fn shares_tag_with(&self, other: &ItemMeta) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }
}

/// How the caller acts on a computed lock
///
/// Lock status is computed identically in both modes; only the gating layer
/// differs (log only vs. restrict access).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    #[default]
    Observe,
    Enforce,
}

impl LockMode {
    /// Any value other than `enforce` resolves to `observe`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "enforce" => Self::Enforce,
            _ => Self::Observe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observe => "observe",
            Self::Enforce => "enforce",
        }
    }
}

impl std::fmt::Display for LockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
