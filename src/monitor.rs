use crate::pipeline::{CycleReport, Pipeline};
use std::time::Duration;
use tokio::sync::watch;

/// The poll loop: run a cycle, sleep, repeat until shutdown is signalled.
/// Shutdown is only observed between cycles and while sleeping.
pub struct Monitor {
    pipeline: Pipeline,
    interval: Duration,
}

impl Monitor {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub async fn run_once(&mut self) -> CycleReport {
        self.pipeline.run_cycle().await
    }

    /// Returns the number of cycles completed.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut cycles = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.pipeline.run_cycle().await;
            cycles += 1;

            if *shutdown.borrow() {
                break;
            }

            tracing::info!(seconds = self.interval.as_secs(), "sleeping");
            if !sleep_until_shutdown(self.interval, &mut shutdown).await {
                break;
            }
        }

        tracing::info!(cycles, "monitoring stopped");
        cycles
    }
}

/// Sleep for `interval`. Returns false if shutdown was signalled first.
/// Updates that leave the flag unset do not cut the sleep short.
async fn sleep_until_shutdown(interval: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(interval);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return false;
                }
            }
        }
    }
}
