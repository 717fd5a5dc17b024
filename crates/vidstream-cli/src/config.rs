//! Player configuration file loading

use anyhow::Context;
use std::path::Path;
use vidstream_core::{PlayerConfig, Resolution};

/// Load a JSON config file, or the defaults when no path is given
pub fn load(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    let Some(path) = path else {
        return Ok(PlayerConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Parse and validate a JSON config; missing fields take their defaults
pub fn parse(text: &str) -> anyhow::Result<PlayerConfig> {
    let config: PlayerConfig = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_resolution(s: &str) -> Result<Resolution, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = width
        .trim()
        .parse()
        .map_err(|e| format!("bad width '{width}': {e}"))?;
    let height = height
        .trim()
        .parse()
        .map_err(|e| format!("bad height '{height}': {e}"))?;
    Ok(Resolution::new(width, height))
}
