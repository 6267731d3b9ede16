use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::{summarize, Summary};
use crate::config::AttackMethod;
use crate::job::{Job, JobStatus};

pub const REDACTED: &str = "***REDACTED***";

/// What an export should contain. Rendering to a file format is left to
/// the caller.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportOptions {
    pub include_passwords: bool,
    pub include_timestamps: bool,
    pub include_analytics: bool,
    /// Replace ids and file names with positional placeholders.
    pub anonymize: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_passwords: false,
            include_timestamps: true,
            include_analytics: true,
            anonymize: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReportSummary {
    pub total_jobs: usize,
    pub successful_cracks: usize,
    pub failed_attempts: usize,
    pub success_rate: u32,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReportJob {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub status: JobStatus,
    pub method: AttackMethod,
    pub password: Option<String>,
    pub tried_attempts: u64,
    pub progress: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_secs: Option<u64>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Report {
    pub summary: ReportSummary,
    pub jobs: Vec<ReportJob>,
    pub analytics: Option<Summary>,
    /// Sum of wall time over finished jobs.
    pub processing_time_ms: u64,
}

pub fn build_report(jobs: &[Job], options: &ReportOptions, generated_at: DateTime<Utc>) -> Report {
    let summary = summarize(jobs);

    let rows = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| report_job(i + 1, job, options))
        .collect();

    let processing_time_ms = jobs
        .iter()
        .filter_map(Job::duration)
        .map(|d| d.as_millis() as u64)
        .sum();

    Report {
        summary: ReportSummary {
            total_jobs: summary.total_jobs,
            successful_cracks: summary.successful,
            failed_attempts: summary.failed,
            success_rate: summary.success_rate,
            generated_at,
        },
        jobs: rows,
        analytics: options.include_analytics.then_some(summary),
        processing_time_ms,
    }
}

fn report_job(position: usize, job: &Job, options: &ReportOptions) -> ReportJob {
    let (id, file_name) = if options.anonymize {
        (format!("job_{position}"), format!("file_{position}{}", job.file_type))
    } else {
        (job.id.to_string(), job.file_name.clone())
    };

    let password = match &job.result {
        Some(pw) if options.include_passwords => Some(pw.clone()),
        Some(_) => Some(REDACTED.to_string()),
        None => None,
    };

    let (start_time, end_time) = if options.include_timestamps {
        (job.start_time, job.end_time)
    } else {
        (None, None)
    };

    ReportJob {
        id,
        file_name,
        file_type: job.file_type.clone(),
        status: job.status,
        method: job.method,
        password,
        tried_attempts: job.tried_attempts,
        progress: job.progress,
        start_time,
        end_time,
        duration_secs: job.duration().map(|d| d.as_secs()),
    }
}
