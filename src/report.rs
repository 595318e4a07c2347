//! Readiness report
//!
//! JSON in, JSON out: question snapshots are aggregated per topic and every
//! topic's lock status is rendered alongside the mode it was computed for.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::readiness::{
    aggregate_topic_stats, compute_all_lock_statuses, QuestionStatSnapshot, TopicLockStatus,
};
use crate::topics::TopicCatalog;
use crate::types::LockMode;

/// Accepts either `{"stats": [...]}` or a bare array of snapshots
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReportInput {
    Bare(Vec<QuestionStatSnapshot>),
    Wrapped { stats: Vec<QuestionStatSnapshot> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub mode: LockMode,
    pub unmapped_count: usize,
    pub topics: Vec<TopicLockStatus>,
}

impl ReadinessReport {
    pub fn locked_topics(&self) -> impl Iterator<Item = &TopicLockStatus> {
        self.topics.iter().filter(|status| status.locked)
    }
}

pub fn read_snapshots<R: Read>(reader: R) -> Result<Vec<QuestionStatSnapshot>, ReportError> {
    let input: ReportInput = serde_json::from_reader(reader)?;
    Ok(match input {
        ReportInput::Wrapped { stats } => stats,
        ReportInput::Bare(stats) => stats,
    })
}

pub fn build_report(
    stats: &[QuestionStatSnapshot],
    catalog: &TopicCatalog,
    mode: LockMode,
) -> ReadinessReport {
    let aggregation = aggregate_topic_stats(stats, catalog);
    if aggregation.unmapped_count > 0 {
        tracing::info!(
            unmapped = aggregation.unmapped_count,
            "snapshots with unknown topics excluded"
        );
    }

    ReadinessReport {
        mode,
        unmapped_count: aggregation.unmapped_count,
        topics: compute_all_lock_statuses(&aggregation, mode),
    }
}

pub fn write_report<W: Write>(mut writer: W, report: &ReadinessReport) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}
