//! Clock-driven engine
//!
//! Plays any locator as an empty timeline of fixed length, advancing with the
//! tokio clock. Useful for headless runs and for exercising the controller
//! without a platform media stack.

use super::{EngineEvent, EventSink, MediaEngine};
use crate::{Error, Resolution, Result, Source};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Default)]
struct ClockInner {
    prepared: bool,
    released: bool,
    /// Position at the last anchor point
    offset: Duration,
    /// Set while the timeline is running
    running_since: Option<Instant>,
    /// Bumped whenever a pending completion must not fire
    epoch: u64,
    completion: Option<JoinHandle<()>>,
    sink: Option<EventSink>,
}

impl ClockInner {
    fn position(&self, duration: Duration) -> Duration {
        let running = self.running_since.map(|t| t.elapsed()).unwrap_or_default();
        (self.offset + running).min(duration)
    }

    /// Freeze the timeline at its current position and cancel completion
    fn halt(&mut self, duration: Duration) {
        self.offset = self.position(duration);
        self.running_since = None;
        self.epoch += 1;
        if let Some(handle) = self.completion.take() {
            handle.abort();
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(sink) = &self.sink {
            sink(event);
        }
    }
}

/// Engine that simulates playback of a fixed-length timeline
pub struct ClockEngine {
    duration: Duration,
    prepare_delay: Duration,
    prepare_failure: Option<String>,
    video_size: Option<Resolution>,
    inner: Arc<Mutex<ClockInner>>,
}

impl ClockEngine {
    /// Create an engine whose sources all last `duration`
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            prepare_delay: Duration::ZERO,
            prepare_failure: None,
            video_size: None,
            inner: Arc::new(Mutex::new(ClockInner::default())),
        }
    }

    /// Simulate buffering time during prepare
    pub fn with_prepare_delay(mut self, delay: Duration) -> Self {
        self.prepare_delay = delay;
        self
    }

    /// Make every prepare fail with the given cause
    pub fn fail_prepare(mut self, message: impl Into<String>) -> Self {
        self.prepare_failure = Some(message.into());
        self
    }

    /// Report this video size after each prepare
    pub fn with_video_size(mut self, size: Resolution) -> Self {
        self.video_size = Some(size);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_completion(&self, inner: &mut ClockInner) {
        inner.epoch += 1;
        if let Some(handle) = inner.completion.take() {
            handle.abort();
        }

        let epoch = inner.epoch;
        let duration = self.duration;
        let remaining = duration.saturating_sub(inner.position(duration));
        let state = Arc::clone(&self.inner);

        inner.completion = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;

            let mut inner = state.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.epoch != epoch {
                return;
            }
            inner.offset = duration;
            inner.running_since = None;
            inner.completion = None;
            debug!("Clock engine reached end of timeline");
            inner.emit(EngineEvent::Completed);
        }));
    }
}

#[async_trait]
impl MediaEngine for ClockEngine {
    async fn prepare(&self, source: &Source) -> Result<u64> {
        let released = self.lock().released;
        if released {
            return Err(Error::engine("prepare", "engine released"));
        }

        if !self.prepare_delay.is_zero() {
            tokio::time::sleep(self.prepare_delay).await;
        }

        if let Some(message) = &self.prepare_failure {
            return Err(Error::engine("prepare", message.clone()));
        }

        let mut inner = self.lock();
        if inner.released {
            return Err(Error::engine("prepare", "engine released"));
        }
        inner.halt(self.duration);
        inner.offset = Duration::ZERO;
        inner.prepared = true;

        info!(source = %source, duration_ms = self.duration.as_millis() as u64, "Clock engine prepared");

        if let Some(size) = self.video_size {
            inner.emit(EngineEvent::VideoSize(size));
        }

        Ok(self.duration.as_millis() as u64)
    }

    async fn start(&self) -> Result<()> {
        let mut inner = self.lock();
        if !inner.prepared {
            return Err(Error::engine("start", "source not prepared"));
        }
        if inner.running_since.is_some() {
            return Ok(());
        }
        if inner.position(self.duration) >= self.duration {
            inner.offset = Duration::ZERO;
        }
        inner.running_since = Some(Instant::now());
        self.schedule_completion(&mut inner);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut inner = self.lock();
        if !inner.prepared {
            return Err(Error::engine("pause", "source not prepared"));
        }
        inner.halt(self.duration);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.halt(self.duration);
        inner.offset = Duration::ZERO;
        inner.prepared = false;
        Ok(())
    }

    async fn seek_to(&self, position_ms: u64) -> Result<()> {
        let mut inner = self.lock();
        if !inner.prepared {
            return Err(Error::engine("seek", "source not prepared"));
        }

        let was_running = inner.running_since.is_some();
        inner.halt(self.duration);
        inner.offset = Duration::from_millis(position_ms).min(self.duration);
        if was_running {
            inner.running_since = Some(Instant::now());
            self.schedule_completion(&mut inner);
        }

        inner.emit(EngineEvent::SeekComplete {
            position_ms: inner.offset.as_millis() as u64,
        });
        Ok(())
    }

    async fn current_position(&self) -> u64 {
        self.lock().position(self.duration).as_millis() as u64
    }

    async fn duration(&self) -> u64 {
        if self.lock().prepared {
            self.duration.as_millis() as u64
        } else {
            0
        }
    }

    async fn release(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.halt(self.duration);
        inner.prepared = false;
        inner.released = true;
        inner.sink = None;
        Ok(())
    }

    fn set_event_sink(&self, sink: EventSink) {
        self.lock().sink = Some(sink);
    }
}
