//! Shared fixtures for controller integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use vidstream_core::{
    ClockEngine, EngineEvent, Error, EventSink, HintFlag, MediaEngine, Notification,
    PlaybackController, PlayerConfig, ProgressSample, Resolution, Result, Source, UiSurface,
};

/// Engine decorator that counts calls and can inject notifications
pub struct CountingEngine<E> {
    inner: E,
    prepares: AtomicUsize,
    starts: AtomicUsize,
    releases: AtomicUsize,
    sink: Mutex<Option<EventSink>>,
}

impl<E: MediaEngine> CountingEngine<E> {
    pub fn new(inner: E) -> Arc<Self> {
        Arc::new(Self {
            inner,
            prepares: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            sink: Mutex::new(None),
        })
    }

    pub fn prepare_count(&self) -> usize {
        self.prepares.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Deliver an event as if the wrapped engine raised it
    pub fn emit(&self, event: EngineEvent) {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            sink(event);
        }
    }
}

#[async_trait]
impl<E: MediaEngine> MediaEngine for CountingEngine<E> {
    async fn prepare(&self, source: &Source) -> Result<u64> {
        self.prepares.fetch_add(1, Ordering::SeqCst);
        self.inner.prepare(source).await
    }

    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.inner.start().await
    }

    async fn pause(&self) -> Result<()> {
        self.inner.pause().await
    }

    async fn stop(&self) -> Result<()> {
        self.inner.stop().await
    }

    async fn seek_to(&self, position_ms: u64) -> Result<()> {
        self.inner.seek_to(position_ms).await
    }

    async fn current_position(&self) -> u64 {
        self.inner.current_position().await
    }

    async fn duration(&self) -> u64 {
        self.inner.duration().await
    }

    async fn release(&self) -> Result<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.inner.release().await
    }

    fn set_event_sink(&self, sink: EventSink) {
        *self.sink.lock().unwrap() = Some(Arc::clone(&sink));
        self.inner.set_event_sink(sink);
    }
}

/// Everything a UI surface was told, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    Duration(u64),
    Progress(ProgressSample),
    Ended,
    VideoSize(Resolution),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<UiCall>,
}

impl RecordingSurface {
    pub fn progress(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Progress(sample) => Some(sample.elapsed_ms),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &UiCall) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl UiSurface for RecordingSurface {
    fn on_duration_known(&mut self, duration_ms: u64) {
        self.calls.push(UiCall::Duration(duration_ms));
    }

    fn on_progress(&mut self, sample: ProgressSample) {
        self.calls.push(UiCall::Progress(sample));
    }

    fn on_playback_ended(&mut self) {
        self.calls.push(UiCall::Ended);
    }

    fn on_video_size(&mut self, size: Resolution) {
        self.calls.push(UiCall::VideoSize(size));
    }

    fn on_error(&mut self, error: &Error) {
        self.calls.push(UiCall::Error(error.to_string()));
    }
}

pub type TestController = PlaybackController<CountingEngine<ClockEngine>, HintFlag>;

/// Controller wired to a counting clock engine and a recording UI
pub struct Harness {
    pub controller: TestController,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    pub engine: Arc<CountingEngine<ClockEngine>>,
    pub hint: HintFlag,
    pub ui: RecordingSurface,
}

pub const SOURCE: &str = "http://x/video.mp4";

impl Harness {
    pub fn new(clock: ClockEngine, config: PlayerConfig) -> Self {
        let engine = CountingEngine::new(clock);
        let hint = HintFlag::new("test");
        let (controller, notifications) =
            PlaybackController::new(Arc::clone(&engine), hint.clone(), config).unwrap();

        Self {
            controller,
            notifications,
            engine,
            hint,
            ui: RecordingSurface::default(),
        }
    }

    /// Two-minute clock engine, default config, source already set
    pub fn with_source() -> Self {
        let mut harness = Self::new(
            ClockEngine::new(Duration::from_secs(120)),
            PlayerConfig::default(),
        );
        harness.controller.set_source(SOURCE).unwrap();
        harness
    }

    /// Let freshly spawned tasks run without advancing time
    pub async fn settle(&self) {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    /// Dispatch every queued notification to the recording UI
    pub async fn pump(&mut self) {
        self.settle().await;
        while let Ok(notification) = self.notifications.try_recv() {
            self.controller
                .dispatch(notification, &mut self.ui)
                .await
                .unwrap();
        }
    }
}
