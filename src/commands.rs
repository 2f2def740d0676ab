//! Subcommand implementations.

use crate::config::{self, Config};
use crate::subtitles;
use anyhow::{Context, Result};
use std::path::Path;
use tagforged_bmff::{
    next_free_track_id, EditOutcome, Mp4Editor, OutputProfile, TagKey, TagValue, Tags,
    TimedTextTrack,
};

/// Values given to `tag`.
#[derive(Debug, Default)]
pub struct TagArgs {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub date: Option<String>,
    pub cover: Option<std::path::PathBuf>,
}

impl TagArgs {
    /// Build the tag set to write.
    pub fn into_tags(self) -> Result<Tags> {
        let mut tags = Tags::new();
        for (key, value) in [
            (TagKey::Title, self.title),
            (TagKey::Artist, self.artist),
            (TagKey::Genre, self.genre),
            (TagKey::Date, self.date),
        ] {
            if let Some(value) = value {
                tags.insert(key, value)?;
            }
        }
        if let Some(cover) = self.cover {
            let data = std::fs::read(&cover)
                .with_context(|| format!("Failed to read cover image: {:?}", cover))?;
            tags.insert(TagKey::Cover, TagValue::image(data))?;
        }
        Ok(tags)
    }
}

pub fn tag(file: &Path, args: TagArgs) -> Result<()> {
    let tags = args.into_tags()?;
    if tags.is_empty() {
        anyhow::bail!(
            "Nothing to write: pass at least one of --title, --artist, --genre, --date, --cover"
        );
    }

    match Mp4Editor::new().update_ilst(file, &tags)? {
        EditOutcome::Applied { delta } => {
            println!(
                "Wrote {} tag(s) to {} ({:+} bytes)",
                tags.len(),
                file.display(),
                delta
            );
        }
        EditOutcome::Skipped { reason } => {
            println!("Skipped {}: {}", file.display(), reason);
        }
    }
    Ok(())
}

fn value_to_json(value: &TagValue) -> serde_json::Value {
    match value {
        TagValue::Text(s) => serde_json::json!(s),
        TagValue::Integer(n) => serde_json::json!(n),
        TagValue::Pair { index, total } => serde_json::json!({ "index": index, "total": total }),
        TagValue::Image { format, data } => serde_json::json!({
            "format": format!("{format:?}").to_lowercase(),
            "bytes": data.len(),
        }),
    }
}

fn value_to_text(value: &TagValue) -> String {
    match value {
        TagValue::Text(s) => s.clone(),
        TagValue::Integer(n) => n.to_string(),
        TagValue::Pair { index, total } => format!("{index}/{total}"),
        TagValue::Image { format, data } => format!("{format:?} image, {} bytes", data.len()),
    }
}

pub fn show(file: &Path, json: bool) -> Result<()> {
    let tags = Mp4Editor::new()
        .read_ilst(file)
        .with_context(|| format!("Failed to read tags from {:?}", file))?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = tags
            .iter()
            .map(|(key, value)| (key.name().to_string(), value_to_json(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if tags.is_empty() {
        println!("No tags in {}", file.display());
        return Ok(());
    }
    println!("File: {}", file.display());
    for (key, value) in tags.iter() {
        println!("  {:<14} {}", key.name(), value_to_text(value));
    }
    Ok(())
}

/// Profile for `brand`: explicit flag, then config, then file extension.
pub fn resolve_profile(file: &Path, flag: Option<OutputProfile>, config: &Config) -> OutputProfile {
    flag.or(config.brand.profile)
        .or_else(|| {
            file.extension()
                .and_then(|e| e.to_str())
                .and_then(OutputProfile::from_extension)
        })
        .unwrap_or_default()
}

pub fn brand(file: &Path, flag: Option<OutputProfile>, config: &Config) -> Result<()> {
    let profile = resolve_profile(file, flag, config);
    let delta = Mp4Editor::new()
        .update_brand(file, profile)
        .with_context(|| format!("Failed to rebrand {:?}", file))?;
    println!("Branded {} as {} ({:+} bytes)", file.display(), profile, delta);
    Ok(())
}

pub fn subtitle(file: &Path, subtitles_path: &Path, config: &Config) -> Result<()> {
    let samples = subtitles::load(subtitles_path)
        .with_context(|| format!("Failed to load subtitles from {:?}", subtitles_path))?;

    let settings = &config.text_track;
    let track_id = match settings.track_id {
        Some(id) => id,
        None => {
            let data = std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
            next_free_track_id(&data)
        }
    };

    let track = TimedTextTrack::new(samples)
        .with_language(settings.language.clone())
        .with_timescale(settings.timescale)
        .with_track_id(track_id)
        .with_style(settings.style.clone());

    let inserted = Mp4Editor::new()
        .add_timed_text_track(file, &track)
        .with_context(|| format!("Failed to add text track to {:?}", file))?;
    println!(
        "Added {} cue(s) to {} as track {} ({} bytes of track data)",
        track.samples.len(),
        file.display(),
        track_id,
        inserted.trak_size
    );
    Ok(())
}

pub fn validate(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_summary(&Config::default());
        }
    }
    Ok(())
}

fn print_summary(config: &Config) {
    match config.brand.profile {
        Some(profile) => println!("  Brand profile: {}", profile),
        None => println!("  Brand profile: from file extension"),
    }
    let text = &config.text_track;
    println!("  Text track language: {}", text.language);
    println!("  Text track timescale: {}", text.timescale);
    match text.track_id {
        Some(id) => println!("  Text track id: {}", id),
        None => println!("  Text track id: next free"),
    }
    println!("  Font: {} {}pt", text.style.font, text.style.font_size);
}
