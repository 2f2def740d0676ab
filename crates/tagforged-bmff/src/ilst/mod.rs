//! iTunes-style metadata list (`moov/udta/meta/ilst`).
//!
//! Updates are best-effort: a file without the `moov/udta/meta` chain is
//! left alone rather than having one forced into it.

mod builder;
mod reader;
mod tags;

pub use builder::build_ilst;
pub use reader::parse_ilst;
pub use tags::{data_type, ImageFormat, TagKey, TagKind, TagValue, Tags};

use crate::bmff::{find_box, relocate_chunk_offsets, AtomBuffer, AtomPath, AtomType};
use crate::{Error, Result};

/// Result of a best-effort edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The buffer was changed; `delta` is the net byte change.
    Applied { delta: i64 },
    /// Required structure was missing; nothing was changed.
    Skipped { reason: String },
}

impl EditOutcome {
    /// Whether the edit was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

const META_CHAIN: [AtomType; 3] = [AtomType::MOOV, AtomType::UDTA, AtomType::META];

/// Replace (or insert) the `ilst` under `moov/udta/meta` with one built
/// from `tags`, fixing the sizes of `meta`, `udta` and `moov`.
///
/// Missing structure yields [`EditOutcome::Skipped`] with the buffer untouched.
pub fn apply_ilst(buf: &mut AtomBuffer, tags: &Tags) -> Result<EditOutcome> {
    let path = match AtomPath::resolve(buf.as_slice(), &META_CHAIN) {
        Ok(path) => path,
        Err(e) if e.is_soft() => {
            tracing::warn!("Skipping metadata update: {}", e);
            return Ok(EditOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };
    let (Some(moov), Some(meta)) = (path.root().copied(), path.leaf().copied()) else {
        return Err(Error::structure_missing("moov/udta/meta"));
    };

    if meta.data_size() < 4 {
        tracing::warn!("Skipping metadata update: meta has no version/flags");
        return Ok(EditOutcome::Skipped {
            reason: "meta atom too short for version/flags".to_string(),
        });
    }

    let children = meta.children_range();
    let existing = find_box(buf.as_slice(), AtomType::ILST, children.start, children.len());
    let replace = match existing {
        Some(ilst) => ilst.offset..ilst.end(),
        None => children.start..children.start,
    };

    let new_ilst = build_ilst(tags);
    if new_ilst.len() > u32::MAX as usize {
        return Err(Error::SizeOverflow {
            atom_type: AtomType::ILST,
            size: new_ilst.len() as i64,
        });
    }
    let delta = new_ilst.len() as i64 - replace.len() as i64;

    tracing::debug!(
        offset = replace.start,
        old_size = replace.len(),
        new_size = new_ilst.len(),
        replaced = existing.is_some(),
        "Writing ilst"
    );

    relocate_chunk_offsets(buf, &moov, replace.end, delta)?;
    buf.splice(replace, &new_ilst)?;
    path.propagate(buf, delta)?;

    Ok(EditOutcome::Applied { delta })
}

/// Read the tags under `moov/udta/meta/ilst`. Missing structure yields no tags.
pub fn read_tags(data: &[u8]) -> Tags {
    let chain = [AtomType::MOOV, AtomType::UDTA, AtomType::META, AtomType::ILST];
    match AtomPath::resolve(data, &chain) {
        Ok(path) => path.leaf().map(|ilst| parse_ilst(data, ilst)).unwrap_or_default(),
        Err(e) => {
            tracing::debug!("No tags: {}", e);
            Tags::new()
        }
    }
}
