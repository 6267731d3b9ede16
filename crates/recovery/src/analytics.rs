//! Read-only reductions over job snapshots.
//!
//! Everything here is a pure function of its input slice: identical
//! snapshots give identical output, and no job is ever mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strength::{analyze, Analysis, StrengthLevel};

use crate::job::{Job, JobId, JobStatus};

pub const NO_FILE_TYPE: &str = "none";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub total_jobs: usize,
    pub successful: usize,
    /// `Failed` plus `Completed` without a result.
    pub failed: usize,
    /// Whole percent, 0 for an empty snapshot.
    pub success_rate: u32,
    /// Mean wall time of successful jobs only.
    pub average_time_to_success_secs: f64,
    pub most_common_file_type: String,
    pub average_attempts: u64,
}

pub fn summarize(jobs: &[Job]) -> Summary {
    let total_jobs = jobs.len();
    let successful: Vec<&Job> = jobs.iter().filter(|j| j.is_successful()).collect();
    let failed = jobs.iter().filter(|j| j.is_unsuccessful()).count();

    let success_rate = if total_jobs == 0 {
        0
    } else {
        (100.0 * successful.len() as f64 / total_jobs as f64).round() as u32
    };

    let average_time_to_success_secs = if successful.is_empty() {
        0.0
    } else {
        let total_ms: i64 = successful
            .iter()
            .filter_map(|j| Some((j.end_time? - j.start_time?).num_milliseconds()))
            .sum();
        total_ms as f64 / successful.len() as f64 / 1000.0
    };

    let average_attempts = if total_jobs == 0 {
        0
    } else {
        let sum: u128 = jobs.iter().map(|j| u128::from(j.tried_attempts)).sum();
        (sum as f64 / total_jobs as f64).round() as u64
    };

    Summary {
        total_jobs,
        successful: successful.len(),
        failed,
        success_rate,
        average_time_to_success_secs,
        most_common_file_type: most_common_file_type(jobs),
        average_attempts,
    }
}

/// Highest count wins; ties go to the type seen first.
fn most_common_file_type(jobs: &[Job]) -> String {
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for job in jobs {
        match seen.iter().position(|(t, _)| *t == job.file_type) {
            Some(i) => seen[i].1 += 1,
            None => seen.push((job.file_type.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (file_type, count) in seen {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((file_type, count));
        }
    }
    best.map_or_else(|| NO_FILE_TYPE.to_string(), |(t, _)| t.to_string())
}

/// Per-status counters for dashboards.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub queued: usize,
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
    pub failed: usize,
    pub successful: usize,
}

impl StatusCounts {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut counts = StatusCounts { total: jobs.len(), ..Default::default() };
        for job in jobs {
            match job.status {
                JobStatus::Queued => counts.queued += 1,
                JobStatus::Running => counts.running += 1,
                JobStatus::Paused => counts.paused += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Failed => counts.failed += 1,
            }
            if job.is_successful() {
                counts.successful += 1;
            }
        }
        counts
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PasswordFinding {
    pub job_id: JobId,
    pub file_name: String,
    pub file_type: String,
    pub analysis: Analysis,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SecurityReport {
    pub summary: Summary,
    pub findings: Vec<PasswordFinding>,
    /// Mean score over findings, one decimal.
    pub average_score: f64,
    /// Every level is present, zero counts included.
    pub level_counts: BTreeMap<StrengthLevel, usize>,
}

/// Summary plus a strength analysis of every recovered password.
pub fn security_report(jobs: &[Job]) -> SecurityReport {
    let findings: Vec<PasswordFinding> = jobs
        .iter()
        .filter(|j| j.is_successful())
        .filter_map(|j| {
            let password = j.result.as_deref()?;
            Some(PasswordFinding {
                job_id: j.id,
                file_name: j.file_name.clone(),
                file_type: j.file_type.clone(),
                analysis: analyze(password),
            })
        })
        .collect();

    let mut level_counts: BTreeMap<StrengthLevel, usize> =
        StrengthLevel::ALL.iter().map(|l| (*l, 0)).collect();
    for f in &findings {
        *level_counts.entry(f.analysis.strength.level).or_default() += 1;
    }

    let average_score = if findings.is_empty() {
        0.0
    } else {
        let total: u32 = findings.iter().map(|f| u32::from(f.analysis.strength.score)).sum();
        (total as f64 / findings.len() as f64 * 10.0).round() / 10.0
    };

    SecurityReport {
        summary: summarize(jobs),
        findings,
        average_score,
        level_counts,
    }
}
