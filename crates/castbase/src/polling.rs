//! Process-wide owner of periodic refresh jobs.
//!
//! Jobs are registered while the controller is stopped, spawned together by
//! [`PollController::start`], and cancelled together by [`PollController::stop`].
//! Each job first runs one full period after start; a slow run delays the
//! following tick instead of bursting to catch up.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Async body of a poll job.
pub type PollTask = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("poll job '{0}' needs a non-zero period")]
    ZeroPeriod(String),
    #[error("poll job '{0}' is already registered")]
    Duplicate(String),
    #[error("cannot register poll job '{0}' while the controller is running")]
    Running(String),
}

/// Named task executed every `period`.
pub struct PollJob {
    name: String,
    period: Duration,
    task: PollTask,
}

impl PollJob {
    pub fn new<F, Fut>(name: impl Into<String>, period: Duration, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            period,
            task: Arc::new(move || -> Pin<Box<dyn Future<Output = ()> + Send>> {
                Box::pin(task())
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

struct Running {
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

#[derive(Default)]
pub struct PollController {
    jobs: Vec<PollJob>,
    running: Option<Running>,
}

impl PollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, job: PollJob) -> Result<(), PollError> {
        if self.running.is_some() {
            return Err(PollError::Running(job.name));
        }
        if job.period.is_zero() {
            return Err(PollError::ZeroPeriod(job.name));
        }
        if self.jobs.iter().any(|existing| existing.name == job.name) {
            return Err(PollError::Duplicate(job.name));
        }

        debug!(job = %job.name, period_ms = job.period.as_millis() as u64, "registered poll job");
        self.jobs.push(job);
        Ok(())
    }

    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.iter().map(PollJob::name).collect()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawn every registered job. Must be called inside a tokio runtime; a
    /// second call while running does nothing.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }

        let shutdown = CancellationToken::new();
        let handles = self
            .jobs
            .iter()
            .map(|job| spawn_job(job, shutdown.clone()))
            .collect();

        info!(jobs = self.jobs.len(), "poll controller started");
        self.running = Some(Running { shutdown, handles });
    }

    /// Cancel all jobs and wait for them to finish. Stopping a stopped controller does nothing.
    pub async fn stop(&mut self) {
        let Some(Running { shutdown, handles }) = self.running.take() else {
            return;
        };

        shutdown.cancel();
        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "poll job ended abnormally");
            }
        }
        info!("poll controller stopped");
    }
}

fn spawn_job(job: &PollJob, shutdown: CancellationToken) -> JoinHandle<()> {
    let name = job.name.clone();
    let period = job.period;
    let task = Arc::clone(&job.task);

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    trace!(job = %name, "poll tick");
                    (task)().await;
                }
            }
        }

        debug!(job = %name, "poll job exited");
    })
}
