use super::{blocks, cue_from_block, finish, Result};
use tagforged_bmff::TimedTextSample;

/// Parse SubRip text. Index lines and empty cues are skipped.
pub fn parse_srt(content: &str) -> Result<Vec<TimedTextSample>> {
    let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut samples = Vec::new();
    for (line, block) in blocks(&content) {
        if let Some(sample) = cue_from_block(line, &block)? {
            samples.push(sample);
        }
    }
    finish(samples)
}
