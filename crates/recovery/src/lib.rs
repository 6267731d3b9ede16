//! Password recovery job engine
//!
//! Owns the lifecycle of simulated recovery jobs: submission, per-job
//! ticking on a fixed cadence, pause/resume/stop, and the read-only
//! analytics computed over job snapshots for reporting.

pub mod analytics;
pub mod config;
pub mod error;
pub mod eta;
pub mod events;
pub mod job;
pub mod registry;
pub mod report;
pub mod simulator;

pub use analytics::{
    security_report, summarize, PasswordFinding, SecurityReport, StatusCounts, Summary,
};
pub use config::{AttackConfig, AttackMethod, Complexity, EngineConfig, MethodProfile};
pub use error::{ConfigError, RegistryError, Result};
pub use eta::{estimate_remaining, format_duration, Eta};
pub use events::{FailReason, JobEvent};
pub use job::{Job, JobId, JobStatus};
pub use registry::{JobRegistry, TickOutcome};
pub use report::{build_report, Report, ReportJob, ReportOptions, ReportSummary};
pub use simulator::{ProgressSimulator, TickUpdate};

pub use strength::{analyze, Analysis, StrengthLevel};
