//! vidstream core - playback control over an injected media engine
//!
//! This crate provides:
//! - A playback state machine (idle, playing, paused, stopped, disposed)
//! - A keep-active hint held exactly while playing
//! - A cancellable progress sampler reporting once per interval
//! - Duration label formatting and video surface sizing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       vidstream core                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐     │
//! │  │    Media     │   │   Playback   │   │  Keep-Active │     │
//! │  │    Engine    │◄──┤  Controller  ├──►│     Hint     │     │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────────┘     │
//! │         │ events           │ spawns                         │
//! │         │           ┌──────┴───────┐                        │
//! │         │           │   Progress   │                        │
//! │         │           │   Sampler    │                        │
//! │         │           └──────┬───────┘                        │
//! │         │                  │ samples                        │
//! │         └────────┬─────────┘                                │
//! │           ┌──────┴───────┐       dispatch      ┌─────────┐  │
//! │           │ Notification ├────────────────────►│   UI    │  │
//! │           │   channel    │     (owner task)    │ Surface │  │
//! │           └──────────────┘                     └─────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vidstream_core::{ClockEngine, HintFlag, PlaybackController, PlayerConfig};
//!
//! # async fn run() -> vidstream_core::Result<()> {
//! let engine = Arc::new(ClockEngine::new(Duration::from_secs(90)));
//! let (mut controller, mut notifications) =
//!     PlaybackController::new(engine, HintFlag::default(), PlayerConfig::default())?;
//!
//! controller.set_source("http://example.com/video.mp4")?;
//! controller.play().await?;
//!
//! let next = notifications.recv().await;
//! # let _ = next;
//! controller.release().await?;
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod engine;
pub mod error;
pub mod format;
pub mod hint;
pub mod layout;
pub mod sampler;
pub mod types;
pub mod ui;

pub use controller::PlaybackController;
pub use engine::{ClockEngine, EngineEvent, EventSink, MediaEngine};
pub use error::{Error, Result};
pub use format::{format_duration, format_progress};
pub use hint::{HintFlag, KeepActive};
pub use layout::fit_to_display;
pub use sampler::ProgressSampler;
pub use types::*;
pub use ui::{Notification, UiSurface};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
