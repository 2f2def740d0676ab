//! In-place size field patching.

use super::{read_u32, AtomType, HEADER_SIZE};
use crate::{Error, Result};

/// Add `delta` to the 32-bit size field of the atom whose header starts at
/// `header_offset`. Only the size field is touched.
///
/// Returns the new size. Fails if the header is out of bounds or the result
/// leaves `[8, u32::MAX]`.
pub fn adjust_size(data: &mut [u8], header_offset: usize, delta: i64) -> Result<u32> {
    let current = read_u32(data, header_offset)
        .ok_or_else(|| Error::malformed(header_offset, "size field out of bounds"))?;
    if delta == 0 {
        return Ok(current);
    }

    let atom_type = data
        .get(header_offset + 4..header_offset + HEADER_SIZE)
        .map(|t| AtomType::from_bytes([t[0], t[1], t[2], t[3]]))
        .unwrap_or(AtomType([0; 4]));

    let size = current as i64 + delta;
    let new_size = u32::try_from(size)
        .ok()
        .filter(|s| *s as usize >= HEADER_SIZE)
        .ok_or(Error::SizeOverflow { atom_type, size })?;

    data[header_offset..header_offset + 4].copy_from_slice(&new_size.to_be_bytes());
    Ok(new_size)
}
