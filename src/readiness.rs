//! Topic Readiness Aggregator
//!
//! Rolls per-question attempt counters up into per-topic aggregates, scores
//! them, and derives the exam-readiness lock decision.
//!
//! Score = 0.60 * accuracy + 0.25 * coverage + 0.15 * confidence.
//! A topic locks only when it has a large enough sample AND both the composite
//! score and the raw accuracy clear their thresholds.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::sanitize::{clamp01, non_negative, normalize_confidence, safe_ratio};
use crate::topics::TopicCatalog;
use crate::types::LockMode;

/// Confidence mean used when a topic has no valid self-ratings
pub const DEFAULT_CONFIDENCE: f64 = 3.0;

/// Per-question counters as maintained by the surrounding application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStatSnapshot {
    pub question_id: String,
    pub topic: String,
    #[serde(default)]
    pub total_attempts: i64,
    #[serde(default)]
    pub correct_count: i64,
    #[serde(default)]
    pub incorrect_count: i64,
    #[serde(default)]
    pub last_confidence: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicAggregate {
    pub topic_key: String,
    pub total_attempts: u64,
    pub total_correct: u64,
    pub distinct_questions_attempted: u64,
    pub avg_last_confidence: f64,
    pub confidence_samples: u64,
}

impl TopicAggregate {
    pub fn new(topic_key: impl Into<String>) -> Self {
        Self {
            topic_key: topic_key.into(),
            total_attempts: 0,
            total_correct: 0,
            distinct_questions_attempted: 0,
            avg_last_confidence: DEFAULT_CONFIDENCE,
            confidence_samples: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    pub topics: BTreeMap<String, TopicAggregate>,
    /// Snapshots dropped because their topic did not resolve
    pub unmapped_count: usize,
}

impl AggregationReport {
    pub fn get(&self, topic_key: &str) -> Option<&TopicAggregate> {
        self.topics.get(topic_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    InsufficientSample,
    BelowThreshold,
    ExamReady,
}

impl LockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientSample => "insufficient_sample",
            Self::BelowThreshold => "below_threshold",
            Self::ExamReady => "exam_ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicLockStatus {
    pub topic_key: String,
    pub mode: LockMode,
    pub eligible: bool,
    pub locked: bool,
    pub reason: LockReason,
    pub accuracy: f64,
    pub coverage: f64,
    pub confidence_norm: f64,
    pub readiness_score: f64,
    pub total_attempts: u64,
    pub total_correct: u64,
    pub distinct_questions_attempted: u64,
    pub avg_last_confidence: f64,
}

/// Weights and thresholds for scoring and locking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessPolicy {
    pub accuracy_weight: f64,
    pub coverage_weight: f64,
    pub confidence_weight: f64,
    /// Distinct questions that count as full coverage
    pub coverage_target: u64,
    pub min_attempts: u64,
    pub min_distinct_questions: u64,
    pub min_readiness_score: f64,
    pub min_accuracy: f64,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            accuracy_weight: 0.60,
            coverage_weight: 0.25,
            confidence_weight: 0.15,
            coverage_target: 20,
            min_attempts: 40,
            min_distinct_questions: 18,
            min_readiness_score: 0.82,
            min_accuracy: 0.78,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessComponents {
    pub accuracy: f64,
    pub coverage: f64,
    pub confidence_norm: f64,
    pub score: f64,
}

#[derive(Default)]
struct TopicAccumulator {
    attempts: u64,
    correct: u64,
    confidence_mean: f64,
    confidence_samples: u64,
    questions: HashSet<String>,
}

impl TopicAccumulator {
    fn add(&mut self, snapshot: &QuestionStatSnapshot) {
        let correct = non_negative(snapshot.correct_count);
        let incorrect = non_negative(snapshot.incorrect_count);
        let derived_attempts =
            non_negative(snapshot.total_attempts).max(correct.saturating_add(incorrect));

        self.attempts = self.attempts.saturating_add(derived_attempts);
        self.correct = self.correct.saturating_add(correct);

        if let Some(conf) = snapshot.last_confidence.filter(|c| (1..=5).contains(c)) {
            self.confidence_samples += 1;
            let n = self.confidence_samples as f64;
            self.confidence_mean += (conf as f64 - self.confidence_mean) / n;
        }

        let question_id = snapshot.question_id.trim();
        if !question_id.is_empty() {
            self.questions.insert(question_id.to_string());
        }
    }

    fn finish(self, topic_key: String) -> TopicAggregate {
        TopicAggregate {
            topic_key,
            total_attempts: self.attempts,
            total_correct: self.correct,
            distinct_questions_attempted: self.questions.len() as u64,
            avg_last_confidence: if self.confidence_samples > 0 {
                self.confidence_mean
            } else {
                DEFAULT_CONFIDENCE
            },
            confidence_samples: self.confidence_samples,
        }
    }
}

/// Aggregate question snapshots per canonical topic.
///
/// Snapshots whose topic does not canonicalize are excluded and counted in
/// `unmapped_count`.
pub fn aggregate_topic_stats(
    stats: &[QuestionStatSnapshot],
    catalog: &TopicCatalog,
) -> AggregationReport {
    let mut accumulators: BTreeMap<String, TopicAccumulator> = BTreeMap::new();
    let mut unmapped_count = 0usize;

    for snapshot in stats {
        let Some(topic_key) = catalog.canonicalize(&snapshot.topic) else {
            unmapped_count += 1;
            continue;
        };
        accumulators.entry(topic_key).or_default().add(snapshot);
    }

    let topics: BTreeMap<String, TopicAggregate> = accumulators
        .into_iter()
        .map(|(key, acc)| (key.clone(), acc.finish(key)))
        .collect();

    tracing::debug!(
        snapshots = stats.len(),
        topics = topics.len(),
        unmapped = unmapped_count,
        "topic stats aggregated"
    );

    AggregationReport {
        topics,
        unmapped_count,
    }
}

pub fn readiness_components(
    aggregate: &TopicAggregate,
    policy: &ReadinessPolicy,
) -> ReadinessComponents {
    let accuracy = clamp01(safe_ratio(
        aggregate.total_correct as f64,
        aggregate.total_attempts as f64,
    ));
    let coverage = clamp01(safe_ratio(
        aggregate.distinct_questions_attempted as f64,
        policy.coverage_target as f64,
    ));
    let confidence_norm = normalize_confidence(aggregate.avg_last_confidence);

    let score = clamp01(
        policy.accuracy_weight * accuracy
            + policy.coverage_weight * coverage
            + policy.confidence_weight * confidence_norm,
    );

    ReadinessComponents {
        accuracy,
        coverage,
        confidence_norm,
        score,
    }
}

pub fn compute_readiness_score(aggregate: &TopicAggregate) -> f64 {
    readiness_components(aggregate, &ReadinessPolicy::default()).score
}

pub fn compute_topic_lock_status(aggregate: &TopicAggregate, mode: LockMode) -> TopicLockStatus {
    compute_topic_lock_status_with(aggregate, mode, &ReadinessPolicy::default())
}

pub fn compute_topic_lock_status_with(
    aggregate: &TopicAggregate,
    mode: LockMode,
    policy: &ReadinessPolicy,
) -> TopicLockStatus {
    let components = readiness_components(aggregate, policy);

    let eligible = aggregate.total_attempts >= policy.min_attempts
        && aggregate.distinct_questions_attempted >= policy.min_distinct_questions;
    let locked = eligible
        && components.score >= policy.min_readiness_score
        && components.accuracy >= policy.min_accuracy;

    let reason = if !eligible {
        LockReason::InsufficientSample
    } else if locked {
        LockReason::ExamReady
    } else {
        LockReason::BelowThreshold
    };

    TopicLockStatus {
        topic_key: aggregate.topic_key.clone(),
        mode,
        eligible,
        locked,
        reason,
        accuracy: components.accuracy,
        coverage: components.coverage,
        confidence_norm: components.confidence_norm,
        readiness_score: components.score,
        total_attempts: aggregate.total_attempts,
        total_correct: aggregate.total_correct,
        distinct_questions_attempted: aggregate.distinct_questions_attempted,
        avg_last_confidence: aggregate.avg_last_confidence,
    }
}

/// Lock status for every aggregated topic, ordered by topic key
pub fn compute_all_lock_statuses(
    report: &AggregationReport,
    mode: LockMode,
) -> Vec<TopicLockStatus> {
    report
        .topics
        .values()
        .map(|aggregate| compute_topic_lock_status(aggregate, mode))
        .collect()
}
