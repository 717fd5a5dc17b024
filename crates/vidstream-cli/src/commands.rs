//! Interactive command parsing and execution

use crate::output::TerminalSurface;
use anyhow::{bail, Context};
use vidstream_core::{format_duration, KeepActive, MediaEngine, PlaybackController};

/// A line typed by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    /// Seek to an absolute position in seconds
    Seek(f64),
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        let command = match verb.to_lowercase().as_str() {
            "play" | "p" => Command::Play,
            "pause" => Command::Pause,
            "stop" | "s" => Command::Stop,
            "seek" => {
                let secs: f64 = words
                    .next()
                    .context("seek needs a position in seconds")?
                    .parse()
                    .context("seek position must be a number")?;
                if !secs.is_finite() || secs < 0.0 {
                    bail!("seek position must be zero or positive");
                }
                Command::Seek(secs)
            }
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };

        if words.next().is_some() {
            bail!("too many arguments for '{}'", verb);
        }
        Ok(command)
    }
}

pub const HELP: &str = "commands: play | pause | stop | seek <seconds> | status | quit";

/// Run a non-play command against the controller.
///
/// `Play` goes through here too, but callers that want to stay responsive
/// during prepare should race `controller.play()` themselves.
pub async fn execute<E, H>(
    controller: &mut PlaybackController<E, H>,
    command: Command,
    surface: &mut TerminalSurface,
) -> vidstream_core::Result<()>
where
    E: MediaEngine + ?Sized + 'static,
    H: KeepActive,
{
    match command {
        Command::Play => controller.play().await?,
        Command::Pause => controller.pause().await?,
        Command::Stop => controller.stop().await?,
        Command::Seek(secs) => {
            let target = (secs * 1000.0) as u64;
            let position = controller.seek(target).await?;
            surface.status(&format!("seek -> {}", format_duration(position)));
        }
        Command::Status => {
            surface.status(&format!(
                "{} | {} / {} | keep-awake {}",
                controller.state(),
                format_duration(controller.progress_ms()),
                format_duration(controller.duration_ms()),
                if controller.is_hint_held() { "on" } else { "off" },
            ));
        }
        Command::Help => surface.status(HELP),
        Command::Quit => {}
    }
    Ok(())
}
