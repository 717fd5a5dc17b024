//! UI collaborator contract
//!
//! Nothing here runs on a background task: samplers and engines post
//! [`Notification`]s to a channel, and the owning context hands each one to
//! [`PlaybackController::dispatch`](crate::PlaybackController::dispatch),
//! which calls into the [`UiSurface`].

use crate::engine::EngineEvent;
use crate::{Error, ProgressSample, Resolution};

/// Messages delivered to the owner of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Prepare finished and the total length is known
    DurationKnown(u64),
    /// Periodic position report from the sampler
    Progress(ProgressSample),
    /// Playback stopped; the progress display should be cleared
    PlaybackEnded,
    /// Raw notification from the media engine, tagged with the engine run
    /// that was current when it was raised
    Engine { epoch: u64, event: EngineEvent },
}

/// Receiver of playback updates, typically a seek bar and time labels
pub trait UiSurface {
    fn on_duration_known(&mut self, duration_ms: u64);

    fn on_progress(&mut self, sample: ProgressSample);

    fn on_playback_ended(&mut self);

    fn on_video_size(&mut self, _size: Resolution) {}

    fn on_error(&mut self, _error: &Error) {}
}
