mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./tagforged.toml", "~/.config/tagforged/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let text = &config.text_track;

    if text.timescale == 0 {
        anyhow::bail!("text_track.timescale cannot be 0");
    }

    tagforged_bmff::text_track::pack_language(&text.language)
        .with_context(|| format!("Invalid text_track.language {:?}", text.language))?;

    if text.track_id == Some(0) {
        anyhow::bail!("text_track.track_id cannot be 0");
    }

    text.style
        .validate()
        .context("Invalid text_track.style")?;

    Ok(())
}
