use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use anyhow::{ensure, Result};

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval_ms: u64) -> Result<Self> {
        ensure!(interval_ms > 0, "probe interval must be positive");
        Ok(Self {
            interval: Duration::from_millis(interval_ms),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// job: async closure for each tick. Never returns unless the job errors.
    pub async fn run<J, F>(&self, job: J) -> Result<()>
    where
        J: FnMut() -> F,
        F: Future<Output = Result<()>>,
    {
        self.drive(None, job).await
    }

    /// Same loop as `run`, stopping after `ticks` iterations.
    #[cfg(test)]
    pub async fn run_for<J, F>(&self, ticks: u64, job: J) -> Result<()>
    where
        J: FnMut() -> F,
        F: Future<Output = Result<()>>,
    {
        self.drive(Some(ticks), job).await
    }

    async fn drive<J, F>(&self, limit: Option<u64>, mut job: J) -> Result<()>
    where
        J: FnMut() -> F,
        F: Future<Output = Result<()>>,
    {
        let mut done = 0u64;
        loop {
            if limit.is_some_and(|n| done >= n) {
                return Ok(());
            }
            // one job at a time; the pause starts only once it has finished
            job().await?;
            done += 1;
            sleep(self.interval).await;
        }
    }
}
