//! File type (`ftyp`) brand rewriting.

use crate::bmff::{write_box, Atom, AtomBuffer, AtomType, Siblings};
use crate::{Error, Result};
use bytes::BufMut;
use std::str::FromStr;

/// An `ftyp` is only looked for among atoms starting in the first 32 bytes.
const FTYP_SEARCH_WINDOW: usize = 32;

/// Upper bound for a leading value to be taken as a legacy file-size field.
const LEGACY_SIZE_LIMIT: u32 = 100_000_000;

/// Output container flavour, selecting the brands written to `ftyp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OutputProfile {
    /// Plain ISO base media (`.mp4`).
    #[default]
    Generic,
    /// iTunes video (`.m4v`).
    Video,
    /// iTunes audio (`.m4a`).
    Audio,
    /// iTunes audiobook (`.m4b`).
    Audiobook,
    /// iTunes ringtone (`.m4r`).
    Ringtone,
}

impl OutputProfile {
    pub const ALL: [OutputProfile; 5] = [
        OutputProfile::Generic,
        OutputProfile::Video,
        OutputProfile::Audio,
        OutputProfile::Audiobook,
        OutputProfile::Ringtone,
    ];

    /// Major brand code.
    pub fn major_brand(self) -> AtomType {
        AtomType(match self {
            Self::Generic => *b"isom",
            Self::Video => *b"M4V ",
            Self::Audio => *b"M4A ",
            Self::Audiobook => *b"M4B ",
            Self::Ringtone => *b"M4R ",
        })
    }

    /// Compatible brand codes, in write order.
    pub fn compatible_brands(self) -> &'static [AtomType] {
        const ISOM: AtomType = AtomType(*b"isom");
        const ISO2: AtomType = AtomType(*b"iso2");
        const AVC1: AtomType = AtomType(*b"avc1");
        const MP41: AtomType = AtomType(*b"mp41");
        const M4V: AtomType = AtomType(*b"M4V ");
        const M4A: AtomType = AtomType(*b"M4A ");
        const M4B: AtomType = AtomType(*b"M4B ");
        const M4R: AtomType = AtomType(*b"M4R ");
        match self {
            Self::Generic => &[ISOM, ISO2, AVC1, MP41],
            Self::Video => &[M4V, ISOM, ISO2, AVC1, MP41],
            Self::Audio => &[M4A, ISOM, ISO2, MP41],
            Self::Audiobook => &[M4B, ISOM, ISO2, MP41],
            Self::Ringtone => &[M4R, ISOM, ISO2, MP41],
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Audiobook => "audiobook",
            Self::Ringtone => "ringtone",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Generic => "mp4",
            Self::Video => "m4v",
            Self::Audio => "m4a",
            Self::Audiobook => "m4b",
            Self::Ringtone => "m4r",
        }
    }

    /// Profile for a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.extension() == ext)
    }
}

impl std::fmt::Display for OutputProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputProfile {
    type Err = Error;

    /// Accepts a profile name or an extension.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .or_else(|| Self::from_extension(&lower))
            .ok_or_else(|| Error::invalid_input(format!("unknown output profile: {s}")))
    }
}

/// Build an `ftyp`: major brand, zero minor version, compatible brands.
pub fn build_ftyp(profile: OutputProfile) -> Vec<u8> {
    let brands = profile.compatible_brands();
    let mut content = Vec::with_capacity(8 + brands.len() * 4);
    content.put_slice(profile.major_brand().as_bytes());
    content.put_u32(0); // minor version
    for brand in brands {
        content.put_slice(brand.as_bytes());
    }
    write_box(AtomType::FTYP, &content)
}

/// Whether the file starts with a legacy overall-size field instead of an atom.
///
/// The leading value must be a plausible small size and the next four
/// bytes must not read as an atom type.
fn has_legacy_size_field(data: &[u8]) -> bool {
    let Some(value) = crate::bmff::read_u32(data, 0) else {
        return false;
    };
    if value == 0 || value >= LEGACY_SIZE_LIMIT || data.len() < 8 {
        return false;
    }
    !AtomType::from_bytes([data[4], data[5], data[6], data[7]]).is_plausible()
}

/// Locate an `ftyp` starting within the search window, either at the top
/// level or behind a legacy 4-byte size field.
fn locate_ftyp(data: &[u8]) -> Option<Atom> {
    [0usize, 4].into_iter().filter(|&start| start < data.len()).find_map(|start| {
        Siblings::new(data, start, data.len() - start)
            .take_while(|atom| atom.offset < FTYP_SEARCH_WINDOW)
            .find(|atom| atom.atom_type == AtomType::FTYP)
    })
}

/// Top-level `moov`, scanning from `base` (4 when a legacy size field leads).
fn top_level_moov(data: &[u8], base: usize) -> Option<Atom> {
    Siblings::new(data, base, data.len().saturating_sub(base)).find(|a| a.atom_type == AtomType::MOOV)
}

/// Shift the legacy leading size field by `delta`.
fn adjust_legacy_size(buf: &mut AtomBuffer, delta: i64) -> Result<()> {
    let current = buf.read_u32(0).unwrap_or(0) as i64;
    let updated = u32::try_from(current + delta).map_err(|_| Error::SizeOverflow {
        atom_type: AtomType::FTYP,
        size: current + delta,
    })?;
    buf.write_u32(0, updated)
}

/// Rewrite (or synthesize) the `ftyp` for `profile`. Returns the byte delta.
///
/// A buffer with no recognisable top-level atom is rejected with
/// [`Error::StructureMissing`].
pub fn apply_brand(buf: &mut AtomBuffer, profile: OutputProfile) -> Result<i64> {
    let new_ftyp = build_ftyp(profile);

    if let Some(ftyp) = locate_ftyp(buf.as_slice()) {
        let delta = new_ftyp.len() as i64 - ftyp.size as i64;
        let legacy = ftyp.offset == 4 && has_legacy_size_field(buf.as_slice());
        tracing::debug!(offset = ftyp.offset, old_size = ftyp.size, delta, legacy, "Replacing ftyp");

        if let Some(moov) = top_level_moov(buf.as_slice(), ftyp.offset) {
            crate::bmff::relocate_chunk_offsets(buf, &moov, ftyp.end(), delta)?;
        }
        buf.splice(ftyp.offset..ftyp.end(), &new_ftyp)?;

        if legacy {
            tracing::warn!(delta, "Adjusting legacy leading size field");
            adjust_legacy_size(buf, delta)?;
        }
        return Ok(delta);
    }

    let legacy = has_legacy_size_field(buf.as_slice());
    let insert_at = if legacy { 4 } else { 0 };
    if Siblings::new(buf.as_slice(), insert_at, buf.len().saturating_sub(insert_at))
        .next()
        .is_none()
    {
        return Err(Error::structure_missing("no top-level atom to brand"));
    }

    tracing::debug!(offset = insert_at, legacy, "Inserting new ftyp");
    let delta = new_ftyp.len() as i64;
    if let Some(moov) = top_level_moov(buf.as_slice(), insert_at) {
        crate::bmff::relocate_chunk_offsets(buf, &moov, insert_at, delta)?;
    }
    buf.insert(insert_at, &new_ftyp)?;

    if legacy {
        let total = u32::try_from(buf.len()).map_err(|_| Error::SizeOverflow {
            atom_type: AtomType::FTYP,
            size: buf.len() as i64,
        })?;
        tracing::warn!(total, "Rewriting legacy leading size field");
        buf.write_u32(0, total)?;
    }
    Ok(delta)
}
