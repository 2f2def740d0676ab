//! ISO BMFF (MP4) read-modify-write engine.
//!
//! Edits container structure and metadata without touching media payload:
//!
//! - iTunes-style tags in `moov/udta/meta/ilst`
//! - file type brands in `ftyp`
//! - `tx3g` timed-text tracks
//!
//! Every operation loads the whole file, edits the bytes in memory, fixes
//! the size of every enclosing atom and atomically replaces the original.
//! Only 32-bit atom sizes are supported.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tagforged_bmff::{update_ilst, TagKey, Tags};
//!
//! let tags = Tags::new()
//!     .with(TagKey::Title, "Big Buck Bunny")?
//!     .with(TagKey::Date, "2008")?;
//! let outcome = update_ilst(Path::new("movie.mp4"), &tags)?;
//! println!("{outcome:?}");
//! # Ok::<(), tagforged_bmff::Error>(())
//! ```

pub mod bmff;
mod editor;
mod error;
pub mod ftyp;
pub mod ilst;
pub mod io;
pub mod text_track;

pub use editor::Mp4Editor;
pub use error::{Error, Result, Severity};
pub use ftyp::{build_ftyp, OutputProfile};
pub use ilst::{build_ilst, EditOutcome, ImageFormat, TagKey, TagKind, TagValue, Tags};
pub use io::{AtomicReplace, FileReplacer};
pub use text_track::{
    build_trak, encode_samples, next_free_track_id, sample_offsets, Color,
    HorizontalJustification, TextBox, TextStyle, TimedTextSample, TimedTextTrack, TrackInsertion,
    VerticalJustification,
};

use std::path::Path;

/// Write `tags` into the file's metadata list. See [`Mp4Editor::update_ilst`].
pub fn update_ilst(path: &Path, tags: &Tags) -> Result<EditOutcome> {
    Mp4Editor::new().update_ilst(path, tags)
}

/// Read the file's metadata list.
pub fn read_ilst(path: &Path) -> Result<Tags> {
    Mp4Editor::new().read_ilst(path)
}

/// Rewrite the file's `ftyp` for `profile`.
pub fn update_brand(path: &Path, profile: OutputProfile) -> Result<i64> {
    Mp4Editor::new().update_brand(path, profile)
}

/// Insert a timed-text track.
pub fn add_timed_text_track(path: &Path, track: &TimedTextTrack) -> Result<TrackInsertion> {
    Mp4Editor::new().add_timed_text_track(path, track)
}
