use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_MAX_PROGRESS_STEP: f64 = 15.0;
pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.7;
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AttackMethod {
    #[default]
    Dictionary,
    BruteForce,
    Hybrid,
    Custom,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Display metadata for an attack method.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct MethodProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub estimated_speed: &'static str,
    pub effectiveness: u8,
    pub complexity: Complexity,
}

impl AttackMethod {
    pub const ALL: [AttackMethod; 4] = [
        AttackMethod::Dictionary,
        AttackMethod::BruteForce,
        AttackMethod::Hybrid,
        AttackMethod::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttackMethod::Dictionary => "dictionary",
            AttackMethod::BruteForce => "brute-force",
            AttackMethod::Hybrid => "hybrid",
            AttackMethod::Custom => "custom",
        }
    }

    pub fn profile(self) -> MethodProfile {
        match self {
            AttackMethod::Dictionary => MethodProfile {
                name: "Dictionary Attack",
                description: "Common passwords and word lists",
                estimated_speed: "50K-500K/sec",
                effectiveness: 85,
                complexity: Complexity::Low,
            },
            AttackMethod::BruteForce => MethodProfile {
                name: "Brute Force",
                description: "Every combination of the configured charset",
                estimated_speed: "10K-100K/sec",
                effectiveness: 95,
                complexity: Complexity::High,
            },
            AttackMethod::Hybrid => MethodProfile {
                name: "Hybrid Attack",
                description: "Dictionary words with mutation rules",
                estimated_speed: "25K-200K/sec",
                effectiveness: 90,
                complexity: Complexity::Medium,
            },
            AttackMethod::Custom => MethodProfile {
                name: "Custom Wordlist",
                description: "User supplied wordlist",
                estimated_speed: "Variable",
                effectiveness: 75,
                complexity: Complexity::Low,
            },
        }
    }
}

impl fmt::Display for AttackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttackMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AttackMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

/// Attack parameters chosen by the user. The engine reads these for
/// defaults and display; it does not validate them on its own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AttackConfig {
    pub method: AttackMethod,
    pub min_length: usize,
    pub max_length: usize,
    pub charset: String,
    pub custom_wordlist: Option<String>,
    pub use_rules: bool,
    pub threads_count: u32,
    /// Seconds. Zero disables the timeout.
    pub timeout_secs: u64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            method: AttackMethod::Dictionary,
            min_length: 4,
            max_length: 12,
            charset: DEFAULT_CHARSET.to_string(),
            custom_wordlist: None,
            use_rules: true,
            threads_count: 4,
            timeout_secs: 3600,
        }
    }
}

impl AttackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length > self.max_length {
            return Err(ConfigError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.threads_count == 0 {
            return Err(ConfigError::InvalidThreads);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Engine tunables. The defaults reproduce the product's observed cadence
/// and outcome rate.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    /// Upper bound of the per-tick progress delta, in percentage points.
    pub max_progress_step: f64,
    /// Half-open range of attempts added per tick.
    pub attempts_per_tick: Range<u64>,
    pub success_probability: f64,
    /// Master seed for the per-job random streams. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Fail running jobs once `AttackConfig::timeout` has elapsed.
    pub enforce_timeout: bool,
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            max_progress_step: DEFAULT_MAX_PROGRESS_STEP,
            attempts_per_tick: 100..1100,
            success_probability: DEFAULT_SUCCESS_PROBABILITY,
            seed: None,
            enforce_timeout: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_success_probability(mut self, p: f64) -> Self {
        self.success_probability = p;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::InvalidTickInterval);
        }
        if !self.max_progress_step.is_finite() || self.max_progress_step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.max_progress_step));
        }
        if self.attempts_per_tick.is_empty() {
            return Err(ConfigError::InvalidAttemptsRange {
                start: self.attempts_per_tick.start,
                end: self.attempts_per_tick.end,
            });
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(ConfigError::InvalidProbability(self.success_probability));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidEventCapacity);
        }
        Ok(())
    }
}
