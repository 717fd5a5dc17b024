//! Progress sampling loop

use crate::engine::MediaEngine;
use crate::ui::Notification;
use crate::ProgressSample;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Polls the engine on a fixed interval and posts [`ProgressSample`]s.
///
/// At most one loop runs at a time. Every start and stop moves to a new
/// generation, so samples queued by a cancelled loop can be recognised and
/// dropped by the receiver.
pub struct ProgressSampler {
    period: Duration,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl ProgressSampler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            task: None,
        }
    }

    /// Start a fresh loop, cancelling any running one first.
    ///
    /// The first sample is taken immediately. Returns the new generation.
    pub fn start<E>(&mut self, engine: Arc<E>, tx: mpsc::UnboundedSender<Notification>) -> u64
    where
        E: MediaEngine + ?Sized + 'static,
    {
        self.stop();

        let generation = self.generation;
        let period = self.period;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let sample = ProgressSample {
                    elapsed_ms: engine.current_position().await,
                    total_ms: engine.duration().await,
                    generation,
                };
                trace!(generation, elapsed_ms = sample.elapsed_ms, "Progress sample");

                if tx.send(Notification::Progress(sample)).is_err() {
                    debug!(generation, "Notification receiver gone, sampler exiting");
                    break;
                }
            }
        }));

        debug!(generation, period_ms = period.as_millis() as u64, "Progress sampler started");
        generation
    }

    /// Cancel the running loop, if any
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(generation = self.generation, "Progress sampler stopped");
        }
        self.generation += 1;
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// True if `generation` belongs to the loop that is running now
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }
}

impl Drop for ProgressSampler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
