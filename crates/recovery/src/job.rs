use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AttackMethod;
use crate::error::{RegistryError, Result};
use crate::simulator::TickUpdate;

pub type JobId = Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Paused,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one recovery job.
///
/// Values handed out by the registry are copies; only the registry mutates
/// the authoritative record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub file_name: String,
    pub file_type: String,
    pub method: AttackMethod,

    pub status: JobStatus,
    /// Percent in `[0, 100]`; exactly 100 once terminal.
    pub progress: f64,
    pub tried_attempts: u64,

    pub created_at: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,

    /// Recovered password. Only set on a successful completion.
    pub result: Option<String>,
}

/// Lifecycle edges. Anything not listed in [`Job::apply`] is rejected.
#[derive(Clone, Debug)]
pub(crate) enum Transition {
    Start,
    Pause,
    Resume,
    Complete { result: String },
    Fail,
}

impl Transition {
    fn action(&self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::Pause => "pause",
            Transition::Resume => "resume",
            Transition::Complete { .. } => "complete",
            Transition::Fail => "stop",
        }
    }
}

impl Job {
    pub fn new(
        id: JobId,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        method: AttackMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            file_type: file_type.into(),
            method,
            status: JobStatus::Queued,
            progress: 0.0,
            tried_attempts: 0,
            created_at: now,
            start_time: None,
            end_time: None,
            result: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_successful(&self) -> bool {
        self.status == JobStatus::Completed && self.result.is_some()
    }

    /// Failed outright, or completed without recovering anything.
    pub fn is_unsuccessful(&self) -> bool {
        match self.status {
            JobStatus::Failed => true,
            JobStatus::Completed => self.result.is_none(),
            _ => false,
        }
    }

    /// Wall time between start and end, if the job has finished.
    pub fn duration(&self) -> Option<Duration> {
        let (start, end) = (self.start_time?, self.end_time?);
        Some((end - start).to_std().unwrap_or_default())
    }

    /// Time since start, measured to `end_time` for finished jobs.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = self.start_time?;
        let until = self.end_time.unwrap_or(now);
        Some((until - start).to_std().unwrap_or_default())
    }

    /// Attempts extrapolated to 100% progress.
    pub fn estimated_total_attempts(&self) -> Option<u64> {
        if self.progress <= 0.0 {
            return None;
        }
        Some((self.tried_attempts as f64 / (self.progress / 100.0)).floor() as u64)
    }

    pub(crate) fn apply(&mut self, transition: Transition, now: DateTime<Utc>) -> Result<()> {
        match (self.status, transition) {
            (JobStatus::Queued, Transition::Start) => {
                self.status = JobStatus::Running;
                self.start_time.get_or_insert(now);
            }
            (JobStatus::Running, Transition::Pause) => self.status = JobStatus::Paused,
            (JobStatus::Paused, Transition::Resume) => self.status = JobStatus::Running,
            (JobStatus::Running, Transition::Complete { result }) => {
                self.finish(JobStatus::Completed, now);
                self.result = Some(result);
            }
            (JobStatus::Queued | JobStatus::Running | JobStatus::Paused, Transition::Fail) => {
                self.finish(JobStatus::Failed, now);
                self.result = None;
            }
            (from, transition) => {
                return Err(RegistryError::InvalidTransition {
                    job_id: self.id,
                    from,
                    action: transition.action(),
                })
            }
        }
        Ok(())
    }

    /// Progress never moves backwards.
    pub(crate) fn apply_tick(&mut self, update: &TickUpdate) {
        self.progress = self.progress.max(update.progress).min(100.0);
        self.tried_attempts = self.tried_attempts.max(update.tried_attempts);
    }

    fn finish(&mut self, status: JobStatus, now: DateTime<Utc>) {
        self.status = status;
        self.progress = 100.0;
        // wall clock may step backwards; keep end >= start
        let end = match self.start_time {
            Some(start) if now < start => start,
            _ => now,
        };
        self.end_time = Some(end);
    }
}
