//! Learner State Updater
//!
//! Per-item learner model updated after every attempt, and the next-due
//! schedule derived from it.
//!
//! - Stability is a proxy for "days until material decays". It is seeded from
//!   difficulty on the first review and then evolves multiplicatively.
//! - Difficulty drifts toward the value that produces the target signal.
//! - Interval grows as `k * stability^p` days, truncated to whole seconds.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::sanitize::{clamp, clamp01, finite_or, normalize_confidence};
use crate::types::{ItemMeta, Timestamp, SECONDS_PER_DAY};

const ALPHA: f64 = 0.35;
const BETA: f64 = 0.25;
const GAMMA: f64 = 0.10;
const TARGET_DIFFICULTY: f64 = 0.60;
const INTERVAL_K: f64 = 0.8;
const INTERVAL_P: f64 = 1.1;

pub const MIN_STABILITY: f64 = 0.3;
pub const MAX_STABILITY: f64 = 365.0;
pub const MIN_DIFFICULTY: f64 = 0.1;
pub const MAX_DIFFICULTY: f64 = 0.95;

const DEFAULT_DIFFICULTY: f64 = 0.5;

/// Rationale length that counts as full engagement
const RATIONALE_FULL_CHARS: f64 = 140.0;
/// Responses slower than this are discounted once
const SLOW_RESPONSE_MS: i64 = 15_000;
const SLOW_RESPONSE_FACTOR: f64 = 0.8;

const BIAS_DECAY: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerState {
    pub stability: f64,
    pub difficulty: f64,
    pub reps: u32,
    pub lapses: u32,
    pub avg_response_ms: f64,
    /// Positive means habitual overconfidence
    pub conf_bias: f64,
}

impl Default for LearnerState {
    fn default() -> Self {
        Self {
            stability: 0.0,
            difficulty: DEFAULT_DIFFICULTY,
            reps: 0,
            lapses: 0,
            avg_response_ms: 0.0,
            conf_bias: 0.0,
        }
    }
}

impl LearnerState {
    pub fn is_new(&self) -> bool {
        self.reps == 0
    }

    /// Replace values that cannot have come from a previous update
    fn sanitized(&self) -> Self {
        Self {
            stability: finite_or(self.stability, 0.0).max(0.0),
            difficulty: clamp(
                finite_or(self.difficulty, DEFAULT_DIFFICULTY),
                MIN_DIFFICULTY,
                MAX_DIFFICULTY,
            ),
            reps: self.reps,
            lapses: self.lapses,
            avg_response_ms: finite_or(self.avg_response_ms, 0.0).max(0.0),
            conf_bias: finite_or(self.conf_bias, 0.0),
        }
    }
}

/// Outcome of a single attempt, as reported by the answering UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSignal {
    pub correct: bool,
    /// Self-rating, nominally 1..=5
    pub confidence: i32,
    pub latency_ms: i64,
    pub rationale_chars: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub state: LearnerState,
    pub next_due: Timestamp,
    pub interval_days: f64,
    pub signal_strength: f64,
}

/// Combined signal strength of an attempt in `[0, 1]`
pub fn signal_strength(signal: &ReviewSignal) -> f64 {
    let q = if signal.correct { 1.0 } else { 0.0 };
    let c = normalize_confidence(signal.confidence as f64);
    let r = clamp01(signal.rationale_chars.max(0) as f64 / RATIONALE_FULL_CHARS);

    let sig = 0.55 * q + 0.25 * c + 0.20 * r;
    if signal.latency_ms > SLOW_RESPONSE_MS {
        sig * SLOW_RESPONSE_FACTOR
    } else {
        sig
    }
}

pub fn interval_days(stability: f64) -> f64 {
    INTERVAL_K * stability.max(0.0).powf(INTERVAL_P)
}

/// Due time after `interval_days`, truncated to whole seconds
pub fn due_after(now: Timestamp, interval_days: f64) -> Timestamp {
    let secs = (interval_days * SECONDS_PER_DAY).floor() as i64;
    now + Duration::seconds(secs)
}

/// Fold one review into the learner state and schedule the next review.
pub fn apply(signal: &ReviewSignal, state: &LearnerState, now: Timestamp) -> ReviewOutcome {
    let prev = state.sanitized();
    let sig = signal_strength(signal);
    let c = normalize_confidence(signal.confidence as f64);
    let q = if signal.correct { 1.0 } else { 0.0 };

    let stability = if prev.is_new() {
        clamp(1.5 + 2.0 * prev.difficulty, MIN_STABILITY, MAX_STABILITY)
    } else {
        clamp(
            prev.stability * (1.0 + ALPHA * sig - BETA * (1.0 - sig)),
            MIN_STABILITY,
            MAX_STABILITY,
        )
    };

    let difficulty = clamp(
        prev.difficulty + GAMMA * (TARGET_DIFFICULTY - sig),
        MIN_DIFFICULTY,
        MAX_DIFFICULTY,
    );

    let reps = prev.reps.saturating_add(1);
    let lapses = if signal.correct {
        prev.lapses
    } else {
        prev.lapses.saturating_add(1)
    };

    let n = reps.max(1) as f64;
    let latency = signal.latency_ms.max(0) as f64;
    let avg_response_ms = (prev.avg_response_ms * (n - 1.0) + latency) / n;

    let conf_bias = BIAS_DECAY * prev.conf_bias + (1.0 - BIAS_DECAY) * (c - q);

    let interval = interval_days(stability);
    let next_due = due_after(now, interval);

    ReviewOutcome {
        state: LearnerState {
            stability,
            difficulty,
            reps,
            lapses,
            avg_response_ms,
            conf_bias,
        },
        next_due,
        interval_days: interval,
        signal_strength: sig,
    }
}

/// Apply a review and return the item with its recomputed due time
pub fn reschedule(
    item: &ItemMeta,
    signal: &ReviewSignal,
    state: &LearnerState,
    now: Timestamp,
) -> (ItemMeta, LearnerState) {
    let outcome = apply(signal, state, now);
    tracing::debug!(
        item_id = %item.id,
        reps = outcome.state.reps,
        stability = outcome.state.stability,
        interval_days = outcome.interval_days,
        "item rescheduled"
    );
    let updated = ItemMeta {
        due_at: outcome.next_due,
        ..item.clone()
    };
    (updated, outcome.state)
}
