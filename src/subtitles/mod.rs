//! SRT and WebVTT ingestion into timed-text samples.

mod srt;
mod webvtt;

pub use srt::parse_srt;
pub use webvtt::parse_webvtt;

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tagforged_bmff::TimedTextSample;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    #[error("line {line}: invalid cue timing {text:?}")]
    InvalidTiming { line: usize, text: String },

    #[error("no cues found")]
    Empty,
}

pub type Result<T> = std::result::Result<T, SubtitleError>;

/// `[hh:]mm:ss(,|.)mmm`
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{2})[,.](\d{1,3})$").expect("valid timestamp regex")
});

/// `start --> end`, with optional trailing cue settings.
static TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+?)\s*-->\s*(\S+)(?:\s.*)?$").expect("valid timing regex")
});

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>|\{\\[^}]*\}").expect("valid markup regex"));

/// Parse a subtitle file, picking the format from its extension.
pub fn load(path: &Path) -> Result<Vec<TimedTextSample>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let parse: fn(&str) -> Result<Vec<TimedTextSample>> = match ext.as_str() {
        "srt" => parse_srt,
        "vtt" | "webvtt" => parse_webvtt,
        _ => return Err(SubtitleError::UnsupportedFormat(path.display().to_string())),
    };

    let content = std::fs::read_to_string(path).map_err(|source| SubtitleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = parse(&content)?;
    tracing::debug!("Parsed {} cues from {:?}", samples.len(), path);
    Ok(samples)
}

fn parse_timestamp(text: &str) -> Option<Duration> {
    let caps = TIMESTAMP.captures(text)?;
    let field = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    let minutes = field(2)?;
    let seconds = field(3)?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    // "5" after the separator means 500 ms.
    let frac = caps.get(4)?.as_str();
    let millis = frac.parse::<u64>().ok()? * 10u64.pow(3 - frac.len() as u32);

    let total_ms = field(1)?
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)?;
    Some(Duration::from_millis(total_ms))
}

/// Parse a `start --> end` line into start and duration.
fn parse_timing(line: &str, line_no: usize) -> Result<(Duration, Duration)> {
    let invalid = || SubtitleError::InvalidTiming {
        line: line_no,
        text: line.trim().to_string(),
    };
    let caps = TIMING.captures(line).ok_or_else(invalid)?;
    let start = parse_timestamp(&caps[1]).ok_or_else(invalid)?;
    let end = parse_timestamp(&caps[2]).ok_or_else(invalid)?;
    let duration = end.checked_sub(start).ok_or_else(invalid)?;
    Ok((start, duration))
}

fn clean_text(lines: &[&str]) -> String {
    let joined = lines.join("\n");
    MARKUP.replace_all(&joined, "").trim().to_string()
}

/// Split normalised text into blank-line separated blocks, keeping the
/// 1-based line number each block starts at.
fn blocks(content: &str) -> Vec<(usize, Vec<&str>)> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start = 1;

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push((start, std::mem::take(&mut current)));
            }
            start = i + 2;
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push((start, current));
    }
    out
}

/// Turn one block into a sample. Blocks without a timing line, or whose
/// text is empty after cleanup, yield `None`. A line containing `-->` that
/// does not parse is an error.
fn cue_from_block(start_line: usize, lines: &[&str]) -> Result<Option<TimedTextSample>> {
    let Some(timing_at) = lines.iter().position(|l| l.contains("-->")) else {
        return Ok(None);
    };
    let (start, duration) = parse_timing(lines[timing_at], start_line + timing_at)?;
    let text = clean_text(&lines[timing_at + 1..]);
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(TimedTextSample::new(start, duration, text)))
}

fn finish(mut samples: Vec<TimedTextSample>) -> Result<Vec<TimedTextSample>> {
    if samples.is_empty() {
        return Err(SubtitleError::Empty);
    }
    samples.sort_by_key(|s| s.start);
    Ok(samples)
}
