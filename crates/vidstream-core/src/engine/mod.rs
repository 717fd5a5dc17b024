//! Media engine abstraction
//!
//! The controller never decodes or fetches anything itself; it drives an
//! injected [`MediaEngine`] and listens to its notifications through an
//! [`EventSink`].

mod clock;

pub use clock::ClockEngine;

use crate::{Resolution, Result, Source};
use async_trait::async_trait;
use std::sync::Arc;

/// Asynchronous notifications raised by an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playback reached the end of the media
    Completed,
    /// Decode or playback failed after prepare
    Error(String),
    /// Video dimensions became known
    VideoSize(Resolution),
    /// A seek request finished
    SeekComplete { position_ms: u64 },
}

/// Callback an engine uses to deliver [`EngineEvent`]s
pub type EventSink = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// Black-box media decode/render pipeline
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Open and buffer a source, returning its duration in milliseconds
    async fn prepare(&self, source: &Source) -> Result<u64>;

    /// Start or resume rendering
    async fn start(&self) -> Result<()>;

    /// Pause rendering, keeping the prepared source
    async fn pause(&self) -> Result<()>;

    /// Stop rendering; the source must be prepared again before the next start
    async fn stop(&self) -> Result<()>;

    /// Move the playhead
    async fn seek_to(&self, position_ms: u64) -> Result<()>;

    /// Current playhead in milliseconds
    async fn current_position(&self) -> u64;

    /// Duration of the prepared source in milliseconds, 0 when unknown
    async fn duration(&self) -> u64;

    /// Free all engine resources
    async fn release(&self) -> Result<()>;

    /// Register the receiver of asynchronous notifications
    fn set_event_sink(&self, sink: EventSink);
}
