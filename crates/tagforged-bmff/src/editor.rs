//! File-level operations: load, edit in memory, replace.

use crate::bmff::AtomBuffer;
use crate::ftyp::{apply_brand, OutputProfile};
use crate::ilst::{apply_ilst, read_tags, EditOutcome, Tags};
use crate::io::{AtomicReplace, FileReplacer};
use crate::text_track::{apply_text_track, TimedTextTrack, TrackInsertion};
use crate::Result;
use std::path::Path;

/// Edits MP4-family files in place.
///
/// Each call reads the whole file, edits the bytes in memory and hands the
/// result to the replacer. Callers must not run two edits against the same
/// path at once.
#[derive(Debug, Clone, Default)]
pub struct Mp4Editor<R: FileReplacer = AtomicReplace> {
    replacer: R,
}

impl Mp4Editor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: FileReplacer> Mp4Editor<R> {
    /// Use a different replacement strategy.
    pub fn with_replacer(replacer: R) -> Self {
        Self { replacer }
    }

    fn commit(&self, path: &Path, buf: AtomBuffer) -> Result<()> {
        self.replacer.replace(path, buf.as_slice())
    }

    /// Write `tags` into `moov/udta/meta/ilst`.
    ///
    /// A file without that chain is not rewritten and yields
    /// [`EditOutcome::Skipped`].
    pub fn update_ilst(&self, path: &Path, tags: &Tags) -> Result<EditOutcome> {
        let mut buf = AtomBuffer::load(path)?;
        let outcome = apply_ilst(&mut buf, tags)?;
        if let EditOutcome::Applied { delta } = outcome {
            self.commit(path, buf)?;
            tracing::info!(path = %path.display(), tags = tags.len(), delta, "Updated metadata");
        }
        Ok(outcome)
    }

    /// Read the tags currently in the file.
    pub fn read_ilst(&self, path: &Path) -> Result<Tags> {
        let buf = AtomBuffer::load(path)?;
        Ok(read_tags(buf.as_slice()))
    }

    /// Rewrite `ftyp` for `profile`. Returns the size change.
    pub fn update_brand(&self, path: &Path, profile: OutputProfile) -> Result<i64> {
        let mut buf = AtomBuffer::load(path)?;
        let delta = apply_brand(&mut buf, profile)?;
        self.commit(path, buf)?;
        tracing::info!(path = %path.display(), %profile, delta, "Updated brand");
        Ok(delta)
    }

    /// Add a timed-text track.
    pub fn add_timed_text_track(
        &self,
        path: &Path,
        track: &TimedTextTrack,
    ) -> Result<TrackInsertion> {
        let mut buf = AtomBuffer::load(path)?;
        let inserted = apply_text_track(&mut buf, track)?;
        self.commit(path, buf)?;
        tracing::info!(
            path = %path.display(),
            track_id = track.track_id,
            samples = track.samples.len(),
            "Added text track"
        );
        Ok(inserted)
    }
}
