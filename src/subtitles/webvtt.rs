use super::{blocks, cue_from_block, finish, Result};
use tagforged_bmff::TimedTextSample;

/// Blocks that never carry cues.
const SKIPPED_BLOCKS: [&str; 3] = ["NOTE", "STYLE", "REGION"];

/// Parse WebVTT text. The header, NOTE/STYLE/REGION blocks, cue settings
/// and empty cues are skipped.
pub fn parse_webvtt(content: &str) -> Result<Vec<TimedTextSample>> {
    let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut samples = Vec::new();

    for (line, block) in blocks(&content) {
        let first = block[0].trim_start();
        if first.starts_with("WEBVTT")
            || SKIPPED_BLOCKS
                .iter()
                .any(|kw| first == *kw || first.starts_with(&format!("{kw} ")))
        {
            continue;
        }
        if let Some(sample) = cue_from_block(line, &block)? {
            samples.push(sample);
        }
    }
    finish(samples)
}
