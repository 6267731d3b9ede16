use std::ops::Range;

use rand::Rng;

use crate::config::{AttackConfig, EngineConfig, DEFAULT_CHARSET};
use crate::job::Job;

const MAX_PLACEHOLDER_LEN: usize = 64;

/// One tick's worth of change for a running job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickUpdate {
    pub progress: f64,
    pub tried_attempts: u64,
    /// Progress reached 100.
    pub terminal: bool,
}

/// Produces per-tick progress and the final outcome of a job.
///
/// Pure given its random source: the registry hands each job its own seeded
/// stream, so a fixed master seed replays the same run.
#[derive(Clone, Debug)]
pub struct ProgressSimulator {
    max_step: f64,
    attempts_per_tick: Range<u64>,
    success_probability: f64,
}

impl ProgressSimulator {
    /// Expects a config that passed [`EngineConfig::validate`].
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_step: config.max_progress_step,
            attempts_per_tick: config.attempts_per_tick.clone(),
            success_probability: config.success_probability,
        }
    }

    pub fn advance<R: Rng>(&self, job: &Job, rng: &mut R) -> TickUpdate {
        let delta = rng.gen_range(0.0..self.max_step);
        let progress = (job.progress + delta).min(100.0);
        let attempts = rng.gen_range(self.attempts_per_tick.clone());

        TickUpdate {
            progress,
            tried_attempts: job.tried_attempts.saturating_add(attempts),
            terminal: progress >= 100.0,
        }
    }

    /// Bernoulli draw: `true` means the password was recovered.
    pub fn draw_outcome<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.success_probability)
    }

    /// Stand-in "recovered" password drawn from the configured charset and
    /// length range.
    pub fn placeholder_password<R: Rng>(&self, attack: &AttackConfig, rng: &mut R) -> String {
        let mut charset: Vec<char> = attack.charset.chars().filter(|c| !c.is_control()).collect();
        if charset.is_empty() {
            charset = DEFAULT_CHARSET.chars().collect();
        }

        let min = attack.min_length.clamp(1, MAX_PLACEHOLDER_LEN);
        let max = attack.max_length.clamp(min, MAX_PLACEHOLDER_LEN);
        let len = rng.gen_range(min..=max);

        (0..len).map(|_| charset[rng.gen_range(0..charset.len())]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttackMethod;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn running_job() -> Job {
        let mut job = Job::new(Uuid::nil(), "a.pdf", ".pdf", AttackMethod::Hybrid, Utc::now());
        job.status = crate::job::JobStatus::Running;
        job
    }

    #[test]
    fn advance_stays_in_bounds() {
        let sim = ProgressSimulator::new(&EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        let mut job = running_job();

        for _ in 0..500 {
            let before = (job.progress, job.tried_attempts);
            let u = sim.advance(&job, &mut rng);
            assert!(u.progress >= before.0 && u.progress <= 100.0);
            assert!(u.progress - before.0 < 15.0);
            let added = u.tried_attempts - before.1;
            assert!((100..1100).contains(&added));
            assert_eq!(u.terminal, u.progress >= 100.0);
            job.progress = u.progress;
            job.tried_attempts = u.tried_attempts;
            if u.terminal {
                job.progress = 0.0;
            }
        }
    }

    #[test]
    fn same_seed_same_run() {
        let sim = ProgressSimulator::new(&EngineConfig::default());
        let job = running_job();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            assert_eq!(sim.advance(&job, &mut a), sim.advance(&job, &mut b));
        }
    }

    #[test]
    fn outcome_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let always = ProgressSimulator::new(&EngineConfig::default().with_success_probability(1.0));
        let never = ProgressSimulator::new(&EngineConfig::default().with_success_probability(0.0));
        for _ in 0..50 {
            assert!(always.draw_outcome(&mut rng));
            assert!(!never.draw_outcome(&mut rng));
        }
    }

    #[test]
    fn placeholder_respects_attack_config() {
        let sim = ProgressSimulator::new(&EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(3);
        let attack = AttackConfig {
            min_length: 6,
            max_length: 8,
            charset: "xyz".into(),
            ..Default::default()
        };

        for _ in 0..50 {
            let pw = sim.placeholder_password(&attack, &mut rng);
            assert!((6..=8).contains(&pw.len()));
            assert!(pw.chars().all(|c| "xyz".contains(c)));
        }
    }

    #[test]
    fn placeholder_survives_degenerate_config() {
        let sim = ProgressSimulator::new(&EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(4);
        let attack = AttackConfig {
            min_length: 0,
            max_length: 0,
            charset: String::new(),
            ..Default::default()
        };

        let pw = sim.placeholder_password(&attack, &mut rng);
        assert_eq!(pw.chars().count(), 1);
        assert!(DEFAULT_CHARSET.contains(pw.as_str()));
    }
}
