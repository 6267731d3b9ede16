use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{broadcast, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::analytics::StatusCounts;
use crate::config::{AttackConfig, AttackMethod, EngineConfig};
use crate::error::{ConfigError, RegistryError, Result};
use crate::eta::{estimate_remaining, Eta};
use crate::events::{EventBus, FailReason, JobEvent};
use crate::job::{Job, JobId, JobStatus, Transition};
use crate::simulator::ProgressSimulator;

/// Result of driving one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Advanced { progress: f64, tried_attempts: u64 },
    Completed,
    Failed,
    /// Job was not running (or the ticker was superseded); nothing changed.
    Skipped(JobStatus),
}

struct JobSlot {
    job: Job,
    rng: StdRng,
    /// Present while a ticker task is scheduled for this job.
    ticker: Option<CancellationToken>,
}

struct JobTable {
    order: Vec<JobId>,
    slots: HashMap<JobId, JobSlot>,
    attack: AttackConfig,
    seeder: StdRng,
}

struct Inner {
    config: EngineConfig,
    simulator: ProgressSimulator,
    table: RwLock<JobTable>,
    events: EventBus,
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Authoritative in-memory store of recovery jobs.
///
/// Every mutation happens under one write lock, so a snapshot from
/// [`get`](Self::get) or [`list`](Self::list) never shows a half-applied
/// tick. Each running job has its own ticker task; pausing or terminating a
/// job cancels that task.
#[derive(Clone)]
pub struct JobRegistry {
    inner: Arc<Inner>,
}

impl JobRegistry {
    pub fn new(config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_attack_config(config, AttackConfig::default())
    }

    pub fn with_attack_config(
        config: EngineConfig,
        attack: AttackConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let inner = Inner {
            simulator: ProgressSimulator::new(&config),
            events: EventBus::new(config.event_capacity),
            table: RwLock::new(JobTable {
                order: Vec::new(),
                slots: HashMap::new(),
                attack,
                seeder,
            }),
            shutdown: CancellationToken::new(),
            config,
        };

        Ok(Self { inner: Arc::new(inner) })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.inner.events.subscribe()
    }

    pub async fn attack_config(&self) -> AttackConfig {
        self.inner.table.read().await.attack.clone()
    }

    /// Replace the attack config used for defaults of future jobs and for
    /// outcomes of running ones. Taken as given; validate beforehand.
    pub async fn set_attack_config(&self, attack: AttackConfig) {
        self.inner.table.write().await.attack = attack;
        info!("registry: attack config updated");
    }

    /// Create a job and start ticking it.
    pub async fn submit(
        &self,
        file_name: &str,
        file_type: &str,
        method: Option<AttackMethod>,
    ) -> Result<JobId> {
        if file_name.trim().is_empty() {
            return Err(RegistryError::InvalidInput("file_name must not be empty".into()));
        }
        if file_type.trim().is_empty() {
            return Err(RegistryError::InvalidInput("file_type must not be empty".into()));
        }

        let now = Utc::now();
        let mut table = self.inner.table.write().await;
        if self.inner.shutdown.is_cancelled() {
            return Err(RegistryError::ShutDown);
        }

        let method = method.unwrap_or(table.attack.method);
        let job_id = uuid::Builder::from_random_bytes(table.seeder.gen()).into_uuid();
        let rng = StdRng::seed_from_u64(table.seeder.gen());

        let mut job = Job::new(job_id, file_name, file_type, method, now);
        self.inner.events.publish(JobEvent::Submitted {
            job_id,
            file_name: job.file_name.clone(),
            file_type: job.file_type.clone(),
            method,
        });

        job.apply(Transition::Start, now)?;
        let token = self.inner.shutdown.child_token();

        table.order.push(job_id);
        table.slots.insert(job_id, JobSlot { job, rng, ticker: Some(token.clone()) });
        let position = table.order.len();
        self.inner.events.publish(JobEvent::Started { job_id, at: now });
        drop(table);

        info!(job_id = %job_id, file_name, file_type, method = %method, position, "job submitted");
        self.spawn_ticker(job_id, token);

        Ok(job_id)
    }

    /// `Running -> Paused`. Accumulated progress and attempts are kept.
    pub async fn pause(&self, job_id: JobId) -> Result<()> {
        let mut table = self.inner.table.write().await;
        let slot = table.slots.get_mut(&job_id).ok_or(RegistryError::NotFound(job_id))?;

        slot.job.apply(Transition::Pause, Utc::now())?;
        if let Some(ticker) = slot.ticker.take() {
            ticker.cancel();
        }
        let progress = slot.job.progress;
        drop(table);

        info!(job_id = %job_id, progress, "job paused");
        self.inner.events.publish(JobEvent::Paused { job_id, progress });
        Ok(())
    }

    /// `Paused -> Running`, with a fresh ticker.
    pub async fn resume(&self, job_id: JobId) -> Result<()> {
        let mut table = self.inner.table.write().await;
        let slot = table.slots.get_mut(&job_id).ok_or(RegistryError::NotFound(job_id))?;
        if self.inner.shutdown.is_cancelled() {
            return Err(RegistryError::ShutDown);
        }

        slot.job.apply(Transition::Resume, Utc::now())?;
        let token = self.inner.shutdown.child_token();
        slot.ticker = Some(token.clone());
        self.inner.events.publish(JobEvent::Resumed { job_id });
        drop(table);

        info!(job_id = %job_id, "job resumed");
        self.spawn_ticker(job_id, token);
        Ok(())
    }

    /// Force any non-terminal job into `Failed`.
    pub async fn stop(&self, job_id: JobId) -> Result<()> {
        let now = Utc::now();
        let mut table = self.inner.table.write().await;
        let slot = table.slots.get_mut(&job_id).ok_or(RegistryError::NotFound(job_id))?;

        slot.job.apply(Transition::Fail, now)?;
        if let Some(ticker) = slot.ticker.take() {
            ticker.cancel();
        }
        let at = slot.job.end_time.unwrap_or(now);
        drop(table);

        info!(job_id = %job_id, "job stopped");
        self.inner.events.publish(JobEvent::Failed { job_id, at, reason: FailReason::Stopped });
        Ok(())
    }

    pub async fn get(&self, job_id: JobId) -> Result<Job> {
        let table = self.inner.table.read().await;
        table
            .slots
            .get(&job_id)
            .map(|slot| slot.job.clone())
            .ok_or(RegistryError::NotFound(job_id))
    }

    /// All jobs in submission order.
    pub async fn list(&self) -> Vec<Job> {
        let table = self.inner.table.read().await;
        table
            .order
            .iter()
            .filter_map(|id| table.slots.get(id))
            .map(|slot| slot.job.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.table.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn counts(&self) -> StatusCounts {
        StatusCounts::from_jobs(&self.list().await)
    }

    pub async fn estimate_remaining(&self, job_id: JobId) -> Result<Eta> {
        let job = self.get(job_id).await?;
        Ok(estimate_remaining(&job, Utc::now()))
    }

    /// Cancel every ticker and drop all jobs.
    pub async fn clear(&self) {
        let mut table = self.inner.table.write().await;
        for slot in table.slots.values_mut() {
            if let Some(ticker) = slot.ticker.take() {
                ticker.cancel();
            }
        }
        let dropped = table.order.len();
        table.order.clear();
        table.slots.clear();
        drop(table);

        info!(dropped, "registry cleared");
    }

    /// Stop all ticking for good. Jobs stay readable and can still be paused
    /// or stopped; running ones freeze. Later `submit` and `resume` calls fail
    /// with [`RegistryError::ShutDown`].
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        info!("registry: shutdown");
    }

    /// Advance one job by exactly one tick. What each ticker task calls on
    /// its cadence; a no-op for jobs that are not running.
    pub async fn tick(&self, job_id: JobId) -> Result<TickOutcome> {
        self.tick_with(job_id, None).await
    }

    async fn tick_with(
        &self,
        job_id: JobId,
        ticker: Option<&CancellationToken>,
    ) -> Result<TickOutcome> {
        let now = Utc::now();
        let mut table = self.inner.table.write().await;
        let JobTable { slots, attack, .. } = &mut *table;
        let slot = slots.get_mut(&job_id).ok_or(RegistryError::NotFound(job_id))?;

        // a ticker cancelled while waiting on the lock must not touch the job
        if ticker.is_some_and(|t| t.is_cancelled()) || slot.job.status != JobStatus::Running {
            debug!(job_id = %job_id, status = %slot.job.status, "tick skipped");
            return Ok(TickOutcome::Skipped(slot.job.status));
        }

        if self.inner.config.enforce_timeout {
            if let (Some(limit), Some(elapsed)) = (attack.timeout(), slot.job.elapsed(now)) {
                if elapsed > limit {
                    slot.job.apply(Transition::Fail, now)?;
                    if let Some(t) = slot.ticker.take() {
                        t.cancel();
                    }
                    warn!(job_id = %job_id, elapsed_secs = elapsed.as_secs(), "job timed out");
                    self.inner.events.publish(JobEvent::Failed {
                        job_id,
                        at: slot.job.end_time.unwrap_or(now),
                        reason: FailReason::TimedOut,
                    });
                    return Ok(TickOutcome::Failed);
                }
            }
        }

        let update = self.inner.simulator.advance(&slot.job, &mut slot.rng);
        slot.job.apply_tick(&update);

        if !update.terminal {
            self.inner.events.publish(JobEvent::Progress {
                job_id,
                progress: slot.job.progress,
                tried_attempts: slot.job.tried_attempts,
            });
            return Ok(TickOutcome::Advanced {
                progress: slot.job.progress,
                tried_attempts: slot.job.tried_attempts,
            });
        }

        let recovered = self.inner.simulator.draw_outcome(&mut slot.rng);
        let outcome = if recovered {
            let result = self.inner.simulator.placeholder_password(attack, &mut slot.rng);
            slot.job.apply(Transition::Complete { result }, now)?;
            TickOutcome::Completed
        } else {
            slot.job.apply(Transition::Fail, now)?;
            TickOutcome::Failed
        };
        if let Some(t) = slot.ticker.take() {
            t.cancel();
        }

        let at = slot.job.end_time.unwrap_or(now);
        let tried_attempts = slot.job.tried_attempts;
        drop(table);

        if recovered {
            info!(job_id = %job_id, tried_attempts, "job completed: password recovered");
            self.inner.events.publish(JobEvent::Completed { job_id, at });
        } else {
            info!(job_id = %job_id, tried_attempts, "job failed: search exhausted");
            self.inner.events.publish(JobEvent::Failed {
                job_id,
                at,
                reason: FailReason::Exhausted,
            });
        }
        Ok(outcome)
    }

    fn spawn_ticker(&self, job_id: JobId, token: CancellationToken) {
        let registry: Weak<Inner> = Arc::downgrade(&self.inner);
        let cadence = self.inner.config.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + cadence, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!(job_id = %job_id, "ticker: cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let Some(inner) = registry.upgrade() else {
                            break;
                        };
                        let handle = JobRegistry { inner };
                        match handle.tick_with(job_id, Some(&token)).await {
                            Ok(TickOutcome::Advanced { .. }) => {}
                            Ok(outcome) => {
                                debug!(job_id = %job_id, ?outcome, "ticker: finished");
                                break;
                            }
                            Err(e) => {
                                warn!(job_id = %job_id, "ticker: {e}");
                                break;
                            }
                        }
                    }
                }
            }
        });
    }
}
