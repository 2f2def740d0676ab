//! Timed-text (`tx3g`) track construction and insertion.
//!
//! A track is built as a complete `trak` subtree and inserted into `moov`
//! (before `mvex` when present). The encoded samples go into a new `mdat`
//! appended at the end of the file, and the track's single `stco` entry
//! points at the start of that payload.

mod boxes;
mod sample_table;
mod style;

pub use boxes::pack_language;
pub use sample_table::{time_to_sample_runs, TimeToSampleRun};
pub use style::{
    write_tx3g, Color, HorizontalJustification, TextBox, TextStyle, VerticalJustification,
};

use crate::bmff::{
    find_box, find_child, read_u32, write_box, write_container_box, Atom, AtomBuffer, AtomPath,
    AtomType,
};
use crate::{Error, Result};
use bytes::BufMut;
use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "eng";
pub const DEFAULT_TRACK_ID: u32 = 1;
pub const DEFAULT_TIMESCALE: u32 = 600;

/// One caption: shown at `start` for `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedTextSample {
    pub start: Duration,
    pub duration: Duration,
    pub text: String,
}

impl TimedTextSample {
    pub fn new(start: Duration, duration: Duration, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }

    /// Start plus duration.
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Bytes this sample takes in the media data: u16 length + text.
    pub fn encoded_len(&self) -> usize {
        2 + self.text.len()
    }
}

/// A text track to insert. Samples are expected in start order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedTextTrack {
    pub samples: Vec<TimedTextSample>,
    pub language: String,
    pub track_id: u32,
    pub timescale: u32,
    pub style: TextStyle,
}

impl TimedTextTrack {
    pub fn new(samples: Vec<TimedTextSample>) -> Self {
        Self {
            samples,
            language: DEFAULT_LANGUAGE.to_string(),
            track_id: DEFAULT_TRACK_ID,
            timescale: DEFAULT_TIMESCALE,
            style: TextStyle::default(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_track_id(mut self, track_id: u32) -> Self {
        self.track_id = track_id;
        self
    }

    pub fn with_timescale(mut self, timescale: u32) -> Self {
        self.timescale = timescale;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Check everything the builders rely on.
    pub fn validate(&self) -> Result<()> {
        if self.samples.is_empty() {
            return Err(Error::invalid_input("text track has no samples"));
        }
        if self.track_id == 0 {
            return Err(Error::invalid_input("track id 0 is reserved"));
        }
        if self.timescale == 0 {
            return Err(Error::invalid_input("timescale must be positive"));
        }
        pack_language(&self.language)?;
        self.style.validate()?;
        if let Some((i, sample)) = self
            .samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.text.len() > u16::MAX as usize)
        {
            return Err(Error::invalid_input(format!(
                "sample {i} text is {} bytes, at most {} fit",
                sample.text.len(),
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Track duration in timescale units: end of the last sample.
    pub fn duration(&self) -> u64 {
        self.samples
            .last()
            .map_or(0, |s| scale(s.end(), self.timescale))
    }

    /// Per-sample durations in timescale units, truncated.
    pub fn scaled_durations(&self) -> Result<Vec<u32>> {
        self.samples
            .iter()
            .map(|s| {
                let scaled = scale(s.duration, self.timescale);
                u32::try_from(scaled).map_err(|_| {
                    Error::invalid_input(format!(
                        "sample duration {:?} does not fit at timescale {}",
                        s.duration, self.timescale
                    ))
                })
            })
            .collect()
    }
}

/// Convert `d` to `timescale` units, truncating.
pub fn scale(d: Duration, timescale: u32) -> u64 {
    let units = d.as_nanos() * timescale as u128 / 1_000_000_000;
    u64::try_from(units).unwrap_or(u64::MAX)
}

/// Sample payloads, back to back: u16 big-endian length then UTF-8 text.
pub fn encode_samples(track: &TimedTextTrack) -> Vec<u8> {
    let total = track.samples.iter().map(TimedTextSample::encoded_len).sum();
    let mut out = Vec::with_capacity(total);
    for sample in &track.samples {
        out.put_u16(sample.text.len() as u16);
        out.put_slice(sample.text.as_bytes());
    }
    out
}

/// Absolute offset of each sample when the chunk starts at `chunk_offset`.
pub fn sample_offsets(track: &TimedTextTrack, chunk_offset: u64) -> Vec<u64> {
    track
        .samples
        .iter()
        .scan(chunk_offset, |next, sample| {
            let at = *next;
            *next += sample.encoded_len() as u64;
            Some(at)
        })
        .collect()
}

/// Build the complete `trak` subtree with `stco` pointing at `chunk_offset`.
pub fn build_trak(track: &TimedTextTrack, chunk_offset: u32) -> Result<Vec<u8>> {
    track.validate()?;

    let language = pack_language(&track.language)?;
    let runs = time_to_sample_runs(&track.scaled_durations()?);
    let sizes: Vec<u32> = track
        .samples
        .iter()
        .map(|s| s.encoded_len() as u32)
        .collect();

    let stsd = boxes::write_stsd(&write_tx3g(&track.style)?);
    let stbl = sample_table::write_stbl(&stsd, &runs, &sizes, chunk_offset);
    let minf = write_container_box(
        AtomType::MINF,
        &[&boxes::write_nmhd(), &boxes::write_dinf(), &stbl],
    );
    let mdia = write_container_box(
        AtomType::MDIA,
        &[
            &boxes::write_mdhd(track.timescale, track.duration(), language),
            &boxes::write_hdlr(b"text", boxes::HANDLER_NAME),
            &minf,
        ],
    );
    let trak = write_container_box(AtomType::TRAK, &[&boxes::write_tkhd(track.track_id), &mdia]);

    if trak.len() > u32::MAX as usize {
        return Err(Error::SizeOverflow {
            atom_type: AtomType::TRAK,
            size: trak.len() as i64,
        });
    }
    Ok(trak)
}

/// Where a track insertion put things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInsertion {
    pub trak_offset: usize,
    pub trak_size: u32,
    /// Header offset of the appended `mdat`.
    pub mdat_offset: usize,
}

impl TrackInsertion {
    /// Offset of the first sample byte.
    pub fn chunk_offset(&self) -> usize {
        self.mdat_offset + crate::bmff::HEADER_SIZE
    }
}

/// Track ids already declared by `tkhd` boxes under `moov`.
fn existing_track_ids(data: &[u8], moov: &Atom) -> Vec<u32> {
    moov.children(data)
        .filter(|a| a.atom_type == AtomType::TRAK)
        .filter_map(|trak| find_child(data, &trak, AtomType::TKHD))
        .filter_map(|tkhd| {
            let version = *data.get(tkhd.data_offset())?;
            let at = if version == 1 { 20 } else { 12 };
            read_u32(data, tkhd.data_offset() + at)
        })
        .collect()
}

/// Lowest id safe for a new track: past every `tkhd` and `mvhd.next_track_ID`.
pub fn next_free_track_id(data: &[u8]) -> u32 {
    let Some(moov) = find_box(data, AtomType::MOOV, 0, data.len()) else {
        return DEFAULT_TRACK_ID;
    };
    let from_tracks = existing_track_ids(data, &moov)
        .into_iter()
        .max()
        .and_then(|max| max.checked_add(1))
        .unwrap_or(DEFAULT_TRACK_ID);
    let from_mvhd = find_child(data, &moov, AtomType::MVHD)
        .filter(|mvhd| mvhd.data_size() >= 4)
        .and_then(|mvhd| read_u32(data, mvhd.end() - 4))
        .filter(|&next| next != 0 && next != u32::MAX)
        .unwrap_or(DEFAULT_TRACK_ID);
    from_tracks.max(from_mvhd)
}

/// Raise `mvhd.next_track_ID` past `track_id`.
fn bump_next_track_id(buf: &mut AtomBuffer, track_id: u32) -> Result<()> {
    let Some(mvhd) = buf
        .find_top_level(AtomType::MOOV)
        .and_then(|moov| find_child(buf.as_slice(), &moov, AtomType::MVHD))
    else {
        return Ok(());
    };
    if mvhd.data_size() < 4 {
        return Ok(());
    }
    let at = mvhd.end() - 4;
    let next = buf.read_u32(at).unwrap_or(0);
    if let Some(wanted) = track_id.checked_add(1).filter(|&w| next < w) {
        tracing::debug!(from = next, to = wanted, "Raising next track id");
        buf.write_u32(at, wanted)?;
    }
    Ok(())
}

/// Insert `track` into the buffer, appending its samples in a new `mdat`.
///
/// Missing `moov` is an error.
pub fn apply_text_track(buf: &mut AtomBuffer, track: &TimedTextTrack) -> Result<TrackInsertion> {
    track.validate()?;

    let moov = buf
        .find_top_level(AtomType::MOOV)
        .ok_or_else(|| Error::structure_missing("moov"))?;
    if existing_track_ids(buf.as_slice(), &moov).contains(&track.track_id) {
        return Err(Error::invalid_input(format!(
            "track id {} is already in use",
            track.track_id
        )));
    }

    let payload = encode_samples(track);
    let mdat = write_box(AtomType::MDAT, &payload);
    if mdat.len() > u32::MAX as usize {
        return Err(Error::SizeOverflow {
            atom_type: AtomType::MDAT,
            size: mdat.len() as i64,
        });
    }

    // stco is fixed width, so the trak length does not depend on the offset.
    let trak_len = build_trak(track, 0)?.len();
    let chunk_offset = buf.len() + trak_len + crate::bmff::HEADER_SIZE;
    let chunk_offset = u32::try_from(chunk_offset).map_err(|_| Error::SizeOverflow {
        atom_type: AtomType::STCO,
        size: chunk_offset as i64,
    })?;
    let trak = build_trak(track, chunk_offset)?;

    let insert_at = find_child(buf.as_slice(), &moov, AtomType::MVEX)
        .map_or(moov.end(), |mvex| mvex.offset);
    let delta = trak.len() as i64;
    tracing::debug!(
        offset = insert_at,
        size = trak.len(),
        samples = track.samples.len(),
        "Inserting text trak"
    );

    crate::bmff::relocate_chunk_offsets(buf, &moov, insert_at, delta)?;
    buf.insert(insert_at, &trak)?;
    AtomPath::from_atoms(vec![moov]).propagate(buf, delta)?;

    let mdat_offset = buf.append(&mdat);
    debug_assert_eq!(mdat_offset + crate::bmff::HEADER_SIZE, chunk_offset as usize);
    bump_next_track_id(buf, track.track_id)?;

    Ok(TrackInsertion {
        trak_offset: insert_at,
        trak_size: trak.len() as u32,
        mdat_offset,
    })
}
