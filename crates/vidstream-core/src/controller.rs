//! Playback Controller - owns the playback state machine
//!
//! Coordinates:
//! - Source selection and prepare
//! - Play/pause/stop/seek against the media engine
//! - The keep-active hint (held exactly while playing)
//! - The progress sampler and UI notifications

use crate::{
    engine::{EngineEvent, EventSink, MediaEngine},
    hint::KeepActive,
    sampler::ProgressSampler,
    types::*,
    ui::{Notification, UiSurface},
    Error, Result,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, trace, warn};

/// Wraps a media engine with play/pause/stop semantics.
///
/// All state changes go through `&mut self`, so a single owner drives the
/// controller. Background work (progress sampling, engine callbacks) only
/// posts [`Notification`]s; the owner feeds them back through
/// [`dispatch`](Self::dispatch).
pub struct PlaybackController<E: ?Sized, H: KeepActive> {
    /// Unique controller ID
    id: SessionId,
    /// Controller configuration
    config: PlayerConfig,
    /// Media engine
    engine: Arc<E>,
    /// Keep-active hint
    hint: H,
    /// Current playback state
    state: PlaybackState,
    /// State change broadcaster
    state_tx: watch::Sender<PlaybackState>,
    /// Source to prepare
    source: Option<Source>,
    /// Set after the first successful prepare; the source is fixed from then on
    has_prepared: bool,
    /// Duration reported by the last prepare
    duration_ms: u64,
    /// Last delivered progress position
    progress_ms: u64,
    /// Progress polling loop
    sampler: ProgressSampler,
    /// Engine run counter; events tagged with an older value are dropped
    engine_epoch: Arc<AtomicU64>,
    /// Outbound notifications to the owner
    notify_tx: mpsc::UnboundedSender<Notification>,
}

impl<E, H> PlaybackController<E, H>
where
    E: MediaEngine + ?Sized + 'static,
    H: KeepActive,
{
    /// Create a controller and the notification stream its owner must drain
    pub fn new(
        engine: Arc<E>,
        hint: H,
        config: PlayerConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Notification>)> {
        config.validate()?;

        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(PlaybackState::Idle);

        let engine_epoch = Arc::new(AtomicU64::new(0));
        let engine_tx = notify_tx.clone();
        let sink_epoch = Arc::clone(&engine_epoch);
        let sink: EventSink = Arc::new(move |event| {
            let epoch = sink_epoch.load(Ordering::SeqCst);
            let _ = engine_tx.send(Notification::Engine { epoch, event });
        });
        engine.set_event_sink(sink);

        let controller = Self {
            id: SessionId::new(),
            sampler: ProgressSampler::new(config.progress_interval()),
            config,
            engine,
            hint,
            state: PlaybackState::Idle,
            state_tx,
            source: None,
            has_prepared: false,
            duration_ms: 0,
            progress_ms: 0,
            engine_epoch,
            notify_tx,
        };

        debug!(session = %controller.id, "Playback controller created");
        Ok((controller, notify_rx))
    }

    /// Get controller ID
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Get current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Subscribe to state changes
    pub fn subscribe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Get the configured source, if any
    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// Duration from the last prepare, in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Last position delivered to the UI, in milliseconds
    pub fn progress_ms(&self) -> u64 {
        self.progress_ms
    }

    /// Whether the keep-active hint is currently held
    pub fn is_hint_held(&self) -> bool {
        self.hint.is_held()
    }

    /// Set the locator to play. Only allowed before the first prepare.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn set_source(&mut self, locator: &str) -> Result<()> {
        self.ensure_live()?;

        if self.has_prepared {
            return Err(Error::InvalidSource(
                "source is fixed once playback has started".to_string(),
            ));
        }

        let source = Source::parse(locator)?;
        info!(source = %source, "Source set");
        self.source = Some(source);
        Ok(())
    }

    /// Start or resume playback
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Disposed => return Err(Error::Disposed),
            PlaybackState::Playing => {
                debug!("Already playing");
                return Ok(());
            }
            PlaybackState::Paused => {
                self.engine.start().await?;
            }
            PlaybackState::Idle | PlaybackState::Stopped => {
                let source = self
                    .source
                    .clone()
                    .ok_or_else(|| Error::InvalidSource("no source set".to_string()))?;

                self.next_engine_epoch();
                let duration_ms = self.prepare(&source).await?;
                self.has_prepared = true;
                self.engine.start().await?;

                self.duration_ms = duration_ms;
                self.progress_ms = 0;
                self.notify(Notification::DurationKnown(duration_ms));
            }
        }

        self.transition(PlaybackState::Playing);
        self.sampler
            .start(Arc::clone(&self.engine), self.notify_tx.clone());

        Ok(())
    }

    /// Pause playback. No-op unless playing.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Disposed => Err(Error::Disposed),
            PlaybackState::Playing => {
                self.engine.pause().await?;
                self.sampler.stop();
                self.transition(PlaybackState::Paused);
                Ok(())
            }
            state => {
                debug!(state = %state, "Pause ignored");
                Ok(())
            }
        }
    }

    /// Stop playback and reset progress to zero
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn stop(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Disposed => return Err(Error::Disposed),
            PlaybackState::Stopped => {
                debug!("Already stopped");
                return Ok(());
            }
            PlaybackState::Playing | PlaybackState::Paused => {
                if let Err(e) = self.engine.stop().await {
                    warn!(error = %e, "Engine stop failed");
                }
            }
            PlaybackState::Idle => {}
        }

        info!("Stopping playback");

        self.next_engine_epoch();
        self.sampler.stop();
        self.progress_ms = 0;
        self.transition(PlaybackState::Stopped);
        self.notify(Notification::PlaybackEnded);

        Ok(())
    }

    /// Seek within the prepared media.
    ///
    /// The target is clamped to `[0, duration]`; the clamped position is
    /// returned. Before prepare there is nothing to seek and the current
    /// progress is returned unchanged.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn seek(&mut self, position_ms: u64) -> Result<u64> {
        match self.state {
            PlaybackState::Disposed => Err(Error::Disposed),
            state if !state.is_prepared() => {
                warn!(state = %state, "Cannot seek before prepare");
                Ok(self.progress_ms)
            }
            _ => {
                let clamped = position_ms.min(self.duration_ms);
                info!(from = self.progress_ms, to = clamped, "Seeking");

                self.engine.seek_to(clamped).await?;
                self.progress_ms = clamped;
                Ok(clamped)
            }
        }
    }

    /// Tear down playback. Every later operation fails with [`Error::Disposed`].
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn release(&mut self) -> Result<()> {
        self.ensure_live()?;

        info!("Releasing controller");

        self.next_engine_epoch();
        self.sampler.stop();
        if let Err(e) = self.engine.release().await {
            warn!(error = %e, "Engine release failed");
        }

        self.progress_ms = 0;
        self.transition(PlaybackState::Disposed);

        Ok(())
    }

    /// Apply a notification taken from the controller's channel.
    ///
    /// Engine events drive state changes; everything else is forwarded to
    /// `ui`. Progress from a cancelled sampler run and engine events raised
    /// before the last stop or prepare are dropped, and after release nothing
    /// reaches the UI.
    pub async fn dispatch<U>(&mut self, notification: Notification, ui: &mut U) -> Result<()>
    where
        U: UiSurface + ?Sized,
    {
        if self.state == PlaybackState::Disposed {
            trace!(?notification, "Dropping notification after release");
            return Ok(());
        }

        match notification {
            Notification::DurationKnown(duration_ms) => ui.on_duration_known(duration_ms),
            Notification::Progress(sample) => {
                if self.state == PlaybackState::Playing && self.sampler.is_current(sample.generation)
                {
                    self.progress_ms = sample.elapsed_ms;
                    ui.on_progress(sample);
                } else {
                    trace!(generation = sample.generation, "Dropping stale progress sample");
                }
            }
            Notification::PlaybackEnded => ui.on_playback_ended(),
            Notification::Engine { epoch, event } if epoch != self.current_engine_epoch() => {
                trace!(epoch, ?event, "Dropping engine event from an earlier run");
            }
            Notification::Engine {
                event: EngineEvent::Completed,
                ..
            } => {
                info!(session = %self.id, "Playback completed");
                if self.config.stop_on_completion {
                    if self.state.is_prepared() {
                        self.stop().await?;
                    }
                } else {
                    // Engine sits at the end of the timeline; the next play restarts it
                    if self.state == PlaybackState::Playing {
                        self.sampler.stop();
                        self.progress_ms = self.duration_ms;
                        self.transition(PlaybackState::Paused);
                    }
                    ui.on_playback_ended();
                }
            }
            Notification::Engine {
                event: EngineEvent::Error(message),
                ..
            } => {
                let err = Error::engine("play", message);
                error!(session = %self.id, error = %err, "Engine reported failure");
                if self.state.is_prepared() {
                    self.stop().await?;
                }
                ui.on_error(&err);
            }
            Notification::Engine {
                event: EngineEvent::VideoSize(size),
                ..
            } => {
                debug!(size = %size, "Video size known");
                ui.on_video_size(size);
            }
            Notification::Engine {
                event: EngineEvent::SeekComplete { position_ms },
                ..
            } => {
                debug!(position_ms, "Seek complete");
            }
        }

        Ok(())
    }

    /// Run the engine prepare step, bounded by the configured timeout
    async fn prepare(&self, source: &Source) -> Result<u64> {
        info!(source = %source, "Preparing");

        let prepare = self.engine.prepare(source);
        let result = match self.config.prepare_timeout() {
            Some(limit) => match tokio::time::timeout(limit, prepare).await {
                Ok(result) => result,
                Err(_) => Err(Error::PrepareTimeout {
                    timeout_ms: self.config.prepare_timeout_ms,
                }),
            },
            None => prepare.await,
        };

        match result {
            Ok(duration_ms) => {
                info!(duration_ms, "Prepared");
                Ok(duration_ms)
            }
            Err(e) => {
                warn!(error = %e, "Prepare failed");
                Err(e)
            }
        }
    }

    /// Move to a new state, keeping the hint in step with `Playing`
    fn transition(&mut self, to: PlaybackState) {
        let from = self.state;
        debug_assert!(from.can_transition_to(to), "invalid transition {from} -> {to}");

        self.state = to;
        if to == PlaybackState::Playing && self.config.keep_display_awake {
            self.hint.acquire();
        } else if self.hint.is_held() {
            self.hint.release();
        }
        self.state_tx.send_replace(to);

        info!(from = %from, to = %to, "State transition");
    }

    fn current_engine_epoch(&self) -> u64 {
        self.engine_epoch.load(Ordering::SeqCst)
    }

    /// Start a new engine run; events already queued become stale
    fn next_engine_epoch(&self) {
        let epoch = self.engine_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(epoch, "Engine epoch advanced");
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == PlaybackState::Disposed {
            Err(Error::Disposed)
        } else {
            Ok(())
        }
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notify_tx.send(notification);
    }
}

impl<E: ?Sized, H: KeepActive> Drop for PlaybackController<E, H> {
    fn drop(&mut self) {
        if self.hint.is_held() {
            self.hint.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ClockEngine;
    use crate::hint::HintFlag;
    use std::time::Duration;

    fn controller() -> (
        PlaybackController<ClockEngine, HintFlag>,
        mpsc::UnboundedReceiver<Notification>,
    ) {
        let engine = Arc::new(ClockEngine::new(Duration::from_secs(120)));
        PlaybackController::new(engine, HintFlag::default(), PlayerConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_controller_creation() {
        let (controller, _rx) = controller();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.progress_ms(), 0);
        assert!(controller.source().is_none());
        assert!(!controller.is_hint_held());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let engine = Arc::new(ClockEngine::new(Duration::from_secs(1)));
        let config = PlayerConfig {
            progress_interval_ms: 0,
            ..Default::default()
        };
        let result = PlaybackController::new(engine, HintFlag::default(), config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_play_without_source() {
        let (mut controller, _rx) = controller();
        let err = controller.play().await.unwrap_err();
        assert!(matches!(err, Error::InvalidSource(_)));
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_subscription() {
        let (mut controller, _rx) = controller();
        let mut states = controller.subscribe_state();

        controller.set_source("http://x/video.mp4").unwrap();
        controller.play().await.unwrap();
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), PlaybackState::Playing);

        controller.pause().await.unwrap();
        assert_eq!(*states.borrow_and_update(), PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_fixed_after_prepare() {
        let (mut controller, _rx) = controller();
        controller.set_source("http://x/a.mp4").unwrap();
        controller.set_source("http://x/b.mp4").unwrap();
        controller.play().await.unwrap();

        let err = controller.set_source("http://x/c.mp4").unwrap_err();
        assert!(matches!(err, Error::InvalidSource(_)));
        assert_eq!(controller.source().unwrap().as_str(), "http://x/b.mp4");
    }
}
