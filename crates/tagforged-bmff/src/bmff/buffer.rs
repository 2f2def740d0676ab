//! Owned, mutable byte arena for one read-modify-write operation.

use super::{adjust_size, find_box, read_u32, Atom, AtomType};
use crate::{Error, Result};
use std::ops::Range;
use std::path::Path;

/// The whole file, loaded into memory and edited in place.
///
/// Edits return the byte delta they caused; atoms located before an edit
/// keep their header offsets only if they start before the edit point.
/// Re-locate anything that sits after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomBuffer {
    data: Vec<u8>,
}

impl AtomBuffer {
    /// Wrap existing bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read a whole file into memory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::unreadable(path, e))?;
        Ok(Self { data })
    }

    /// Borrow the bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Give back the bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Find a top-level atom.
    pub fn find_top_level(&self, atom_type: AtomType) -> Option<Atom> {
        find_box(&self.data, atom_type, 0, self.data.len())
    }

    /// Read a big-endian u32.
    pub fn read_u32(&self, offset: usize) -> Option<u32> {
        read_u32(&self.data, offset)
    }

    /// Overwrite a big-endian u32 in place.
    pub fn write_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        let slot = self
            .data
            .get_mut(offset..offset.saturating_add(4))
            .filter(|s| s.len() == 4)
            .ok_or_else(|| Error::malformed(offset, "u32 write out of bounds"))?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Replace `range` with `bytes`, returning the length delta.
    pub fn splice(&mut self, range: Range<usize>, bytes: &[u8]) -> Result<i64> {
        if range.start > range.end || range.end > self.data.len() {
            return Err(Error::malformed(
                range.start,
                format!("splice range {:?} outside buffer of {}", range, self.data.len()),
            ));
        }
        let delta = bytes.len() as i64 - range.len() as i64;
        self.data.splice(range, bytes.iter().copied());
        Ok(delta)
    }

    /// Insert `bytes` at `offset`, returning the length delta.
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) -> Result<i64> {
        self.splice(offset..offset, bytes)
    }

    /// Append `bytes` at the end, returning the offset they start at.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        offset
    }

    /// Patch the size field of the atom at `header_offset` by `delta`.
    pub fn adjust_size(&mut self, header_offset: usize, delta: i64) -> Result<u32> {
        adjust_size(&mut self.data, header_offset, delta)
    }
}

impl From<Vec<u8>> for AtomBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
