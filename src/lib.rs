//! # readiness-engine
//!
//! Adaptive review scheduling and exam readiness for question-bank practice.
//!
//! - **Learner state** - per-item stability/difficulty model and next-due schedule
//! - **Session composer** - bounded, tag-diverse session from due and near-due items
//! - **Topic readiness** - per-topic aggregation, readiness score, and lock decision
//! - **Overrides / gate** - session-scoped lock bypass and observe/enforce gating
//!
//! Every computation is pure and total: out-of-domain numbers are clamped and
//! unknown topics are excluded, never reported as errors.
//!
//! ## Modules
//!
//! - [`learner`] - learner state update and scheduling
//! - [`session`] - session pool composition
//! - [`topics`] - topic name canonicalization
//! - [`readiness`] - aggregation, scoring, lock status
//! - [`overrides`] - single-use override store
//! - [`gate`] - observe/enforce gating and telemetry events
//! - [`report`] - JSON readiness report
//! - [`sanitize`] - numeric domain normalization
//! - [`types`] - shared value types
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use readiness_engine::{apply, LearnerState, ReviewSignal};
//!
//! let signal = ReviewSignal {
//!     correct: true,
//!     confidence: 4,
//!     latency_ms: 3200,
//!     rationale_chars: 90,
//! };
//! let outcome = apply(&signal, &LearnerState::default(), Utc::now());
//! assert_eq!(outcome.state.reps, 1);
//! assert!((outcome.state.stability - 2.5).abs() < 1e-9);
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod learner;
pub mod logging;
pub mod overrides;
pub mod readiness;
pub mod report;
pub mod sanitize;
pub mod session;
pub mod topics;
pub mod types;

pub use types::*;

pub use error::{CatalogError, ReportError};

pub use learner::{apply, reschedule, signal_strength, LearnerState, ReviewOutcome, ReviewSignal};

pub use session::{
    compose_session_pool, compose_session_pool_thread_rng, compose_with_fallback, partition_pool,
    pool_counts, PoolCounts,
};

pub use topics::{TopicCatalog, TopicCatalogBuilder};

pub use readiness::{
    aggregate_topic_stats, compute_all_lock_statuses, compute_readiness_score,
    compute_topic_lock_status, compute_topic_lock_status_with, AggregationReport, LockReason,
    QuestionStatSnapshot, ReadinessPolicy, TopicAggregate, TopicLockStatus,
};

pub use overrides::OverrideStore;

pub use gate::{evaluate_gate, GateDecision};

pub use report::{build_report, ReadinessReport};
