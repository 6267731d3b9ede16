use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::job::Job;

/// Estimated time to completion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eta {
    /// No progress yet, or the job never started.
    Unknown,
    /// The linear estimate has already been overtaken.
    NearCompletion,
    Remaining(Duration),
}

impl Eta {
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Eta::Remaining(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Unknown => f.write_str("Unknown"),
            Eta::NearCompletion => f.write_str("Almost done"),
            Eta::Remaining(d) => {
                let secs = d.as_secs();
                if secs < 60 {
                    write!(f, "{secs}s remaining")
                } else if secs < 3600 {
                    write!(f, "{}m remaining", secs / 60)
                } else {
                    write!(f, "{}h remaining", secs / 3600)
                }
            }
        }
    }
}

/// Linear extrapolation from elapsed time and progress:
/// `total = elapsed / (progress / 100)`, `remaining = total - elapsed`.
///
/// An estimate too large for a [`Duration`] is reported as unknown.
pub fn estimate_remaining(job: &Job, now: DateTime<Utc>) -> Eta {
    let Some(start) = job.start_time else {
        return Eta::Unknown;
    };
    if job.progress <= 0.0 {
        return Eta::Unknown;
    }

    let elapsed = (now - start).num_milliseconds() as f64 / 1000.0;
    let estimated_total = elapsed / (job.progress / 100.0);
    let remaining = estimated_total - elapsed;

    if remaining < 0.0 {
        return Eta::NearCompletion;
    }
    Duration::try_from_secs_f64(remaining).map_or(Eta::Unknown, Eta::Remaining)
}

/// `42s`, `3m 7s`, `2h 15m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_buckets() {
        assert_eq!(Eta::Unknown.to_string(), "Unknown");
        assert_eq!(Eta::NearCompletion.to_string(), "Almost done");
        assert_eq!(Eta::Remaining(Duration::from_secs(59)).to_string(), "59s remaining");
        assert_eq!(Eta::Remaining(Duration::from_secs(125)).to_string(), "2m remaining");
        assert_eq!(Eta::Remaining(Duration::from_secs(7300)).to_string(), "2h remaining");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(187)), "3m 7s");
        assert_eq!(format_duration(Duration::from_secs(8100)), "2h 15m");
    }
}
