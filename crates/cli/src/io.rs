//! Reading stop lists and writing results.

use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkways::{Config, Stop};

/// Read stops from a `.csv` file with `id,lng,lat` columns, or from a JSON
/// array. Validation happens when the pipeline is built.
pub fn read_stops(path: &Path) -> anyhow::Result<Vec<Stop>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => read_stops_csv(path),
        _ => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read stops from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse stops in {}", path.display()))
        }
    }
}

/// Extra columns are ignored.
fn read_stops_csv(path: &Path) -> anyhow::Result<Vec<Stop>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read stops from {}", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<Stop>, csv::Error>>()
        .with_context(|| format!("Failed to parse stops in {}", path.display()))
}

/// Load a configuration file; `.toml` files are read as TOML, anything else
/// as JSON.
pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Config::from_toml(&text)?,
        _ => Config::from_json(&text)?,
    };
    Ok(config)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
