//! Core types for vidstream

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Unique identifier for a controller instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing prepared yet
    Idle,
    /// Content is playing
    Playing,
    /// Playback paused, engine still prepared
    Paused,
    /// Playback stopped, next play re-prepares
    Stopped,
    /// Released, no further operations allowed
    Disposed,
}

impl PlaybackState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: PlaybackState) -> bool {
        use PlaybackState::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Playing) | (Idle, Stopped) |
            // From Playing
            (Playing, Paused) | (Playing, Stopped) |
            // From Paused
            (Paused, Playing) | (Paused, Stopped) |
            // From Stopped
            (Stopped, Playing) |
            // Release is always allowed from a live state
            (Idle, Disposed) | (Playing, Disposed) | (Paused, Disposed) | (Stopped, Disposed)
        )
    }

    /// True once the engine has been prepared and not stopped since
    pub fn is_prepared(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Disposed => write!(f, "disposed"),
        }
    }
}

/// Opaque media locator handed to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source(Url);

impl Source {
    /// Parse a locator: an absolute URI or an absolute filesystem path
    pub fn parse(locator: &str) -> Result<Self> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(Error::InvalidSource("empty locator".to_string()));
        }

        match Url::parse(locator) {
            Ok(url) => Ok(Self(url)),
            Err(e) => {
                let path = Path::new(locator);
                if path.is_absolute() {
                    Url::from_file_path(path).map(Self).map_err(|_| {
                        Error::InvalidSource(format!("{locator}: not a valid file path"))
                    })
                } else {
                    Err(Error::InvalidSource(format!("{locator}: {e}")))
                }
            }
        }
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Periodic playback position report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSample {
    /// Elapsed playback time in milliseconds
    pub elapsed_ms: u64,
    /// Total media duration in milliseconds
    pub total_ms: u64,
    /// Sampler run that produced this sample
    pub generation: u64,
}

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, `None` for a degenerate size
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Interval between progress samples (milliseconds)
    pub progress_interval_ms: u64,
    /// Upper bound for the prepare step (milliseconds, 0 = unbounded)
    pub prepare_timeout_ms: u64,
    /// Stop playback when the engine reports completion
    pub stop_on_completion: bool,
    /// Hold the keep-active hint while playing
    pub keep_display_awake: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 1000,
            prepare_timeout_ms: 30_000,
            stop_on_completion: true,
            keep_display_awake: true,
        }
    }
}

impl PlayerConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "progress_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn prepare_timeout(&self) -> Option<Duration> {
        (self.prepare_timeout_ms > 0).then(|| Duration::from_millis(self.prepare_timeout_ms))
    }
}
