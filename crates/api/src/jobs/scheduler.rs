//! Interval-based runner for maintenance tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A periodic maintenance task.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    /// Delay between runs. The first run happens one period after start.
    fn period(&self) -> Duration;

    async fn run(&self) -> anyhow::Result<()>;
}

pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut stop = self.shutdown.subscribe();

            self.handles.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(job.period());
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                ticker.tick().await;

                loop {
                    tokio::select! {
                        _ = ticker.tick() => run_once(job.as_ref()).await,
                        changed = stop.changed() => {
                            if changed.is_err() || *stop.borrow() {
                                break;
                            }
                        }
                    }
                }

                info!(job = job.name(), "Job stopped");
            }));
        }
    }

    /// Signals every job to stop and waits up to `timeout` for them.
    pub async fn shutdown(self, timeout: Duration) {
        let _ = self.shutdown.send(true);

        let join_all = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        if tokio::time::timeout(timeout, join_all).await.is_err() {
            warn!(?timeout, "Job shutdown timed out");
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_once(job: &dyn Job) {
    let started = Instant::now();
    match job.run().await {
        Ok(()) => tracing::debug!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Job completed"
        ),
        Err(e) => warn!(
            job = job.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            error = %e,
            "Job failed"
        ),
    }
}
