use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::AttackMethod;
use crate::job::JobId;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// Search space exhausted without a match.
    Exhausted,
    Stopped,
    TimedOut,
}

/// Lifecycle notifications published by the registry.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum JobEvent {
    #[serde(rename = "submitted")]
    Submitted {
        job_id: JobId,
        file_name: String,
        file_type: String,
        method: AttackMethod,
    },

    #[serde(rename = "started")]
    Started { job_id: JobId, at: DateTime<Utc> },

    #[serde(rename = "progress")]
    Progress { job_id: JobId, progress: f64, tried_attempts: u64 },

    #[serde(rename = "paused")]
    Paused { job_id: JobId, progress: f64 },

    #[serde(rename = "resumed")]
    Resumed { job_id: JobId },

    #[serde(rename = "completed")]
    Completed { job_id: JobId, at: DateTime<Utc> },

    #[serde(rename = "failed")]
    Failed { job_id: JobId, at: DateTime<Utc>, reason: FailReason },
}

impl JobEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            JobEvent::Submitted { job_id, .. }
            | JobEvent::Started { job_id, .. }
            | JobEvent::Progress { job_id, .. }
            | JobEvent::Paused { job_id, .. }
            | JobEvent::Resumed { job_id }
            | JobEvent::Completed { job_id, .. }
            | JobEvent::Failed { job_id, .. } => *job_id,
        }
    }
}

pub(crate) struct EventBus {
    tx: broadcast::Sender<JobEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fire and forget; having no subscribers is not an error.
    pub(crate) fn publish(&self, event: JobEvent) {
        let _ = self.tx.send(event);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }
}
