//! Sibling scanning over a byte range.
//!
//! Scanning is flat: it walks the atoms laid end to end inside one range and
//! never descends. Callers descend by scanning a found atom's
//! [`children_range`](super::Atom::children_range).

use super::{Atom, AtomType, HEADER_SIZE};
use crate::{Error, Result};

/// Read a big-endian u32 at `offset`, if in bounds.
pub fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a big-endian u64 at `offset`, if in bounds.
pub fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset.checked_add(8)?)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

/// Iterator over sibling atoms in `[start, start + length)`.
///
/// Stops at the first header whose size is below 8 or that would run past
/// the end of the range. The reason is kept and can be inspected with
/// [`Siblings::malformed`].
#[derive(Debug, Clone)]
pub struct Siblings<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    malformed: Option<(usize, String)>,
}

impl<'a> Siblings<'a> {
    /// Create an iterator over `length` bytes starting at `start`.
    pub fn new(data: &'a [u8], start: usize, length: usize) -> Self {
        let end = start.saturating_add(length).min(data.len());
        Self {
            data,
            pos: start,
            end,
            malformed: None,
        }
    }

    /// The offset and reason that stopped the scan early, if any.
    pub fn malformed(&self) -> Option<(usize, &str)> {
        self.malformed.as_ref().map(|(o, r)| (*o, r.as_str()))
    }
}

impl Iterator for Siblings<'_> {
    type Item = Atom;

    fn next(&mut self) -> Option<Atom> {
        if self.malformed.is_some() || self.pos + HEADER_SIZE > self.end {
            return None;
        }

        let offset = self.pos;
        let size = read_u32(self.data, offset)?;
        let atom_type = AtomType::from_bytes([
            self.data[offset + 4],
            self.data[offset + 5],
            self.data[offset + 6],
            self.data[offset + 7],
        ]);

        if (size as usize) < HEADER_SIZE {
            self.malformed = Some((offset, format!("{atom_type} size {size} below header size")));
            return None;
        }

        let next = offset + size as usize;
        if next > self.end {
            self.malformed = Some((
                offset,
                format!("{atom_type} size {size} runs past end of range at {}", self.end),
            ));
            return None;
        }

        self.pos = next;
        Some(Atom {
            atom_type,
            offset,
            size,
        })
    }
}

/// Find the first sibling of type `atom_type` in `[start, start + length)`.
///
/// Returns `None` when the type is absent or a malformed header is reached
/// before it; callers treat both as missing structure.
pub fn find_box(data: &[u8], atom_type: AtomType, start: usize, length: usize) -> Option<Atom> {
    Siblings::new(data, start, length).find(|atom| atom.atom_type == atom_type)
}

/// Find the first child of type `atom_type` inside `parent`.
pub fn find_child(data: &[u8], parent: &Atom, atom_type: AtomType) -> Option<Atom> {
    parent.children(data).find(|atom| atom.atom_type == atom_type)
}

/// Collect all siblings in a range, failing on a malformed header.
pub fn scan(data: &[u8], start: usize, length: usize) -> Result<Vec<Atom>> {
    let mut siblings = Siblings::new(data, start, length);
    let atoms: Vec<Atom> = siblings.by_ref().collect();
    if let Some((offset, reason)) = siblings.malformed() {
        return Err(Error::malformed(offset, reason));
    }
    Ok(atoms)
}
