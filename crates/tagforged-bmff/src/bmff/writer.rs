//! Atom serialization primitives.
//!
//! Each atom follows the standard layout: 4-byte size (big-endian u32),
//! 4-byte type, then atom-specific content.

use super::{AtomType, HEADER_SIZE};

/// Write a complete atom: size (u32 BE) + type + content.
pub fn write_box(atom_type: AtomType, content: &[u8]) -> Vec<u8> {
    let size = (HEADER_SIZE + content.len()) as u32;
    let mut out = Vec::with_capacity(size as usize);
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(atom_type.as_bytes());
    out.extend_from_slice(content);
    out
}

/// Write a container atom (size + type + children concatenated).
pub fn write_container_box(atom_type: AtomType, children: &[&[u8]]) -> Vec<u8> {
    let children_len: usize = children.iter().map(|c| c.len()).sum();
    let size = (HEADER_SIZE + children_len) as u32;
    let mut out = Vec::with_capacity(size as usize);
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(atom_type.as_bytes());
    for child in children {
        out.extend_from_slice(child);
    }
    out
}

/// Full box header: version in the top byte, 24-bit flags below.
pub fn fullbox_header(version: u8, flags: u32) -> [u8; 4] {
    let val = ((version as u32) << 24) | (flags & 0x00FF_FFFF);
    val.to_be_bytes()
}
