//! `ilst` parsing.

use super::{data_type, ImageFormat, TagKey, TagKind, TagValue, Tags};
use crate::bmff::{find_child, read_u32, Atom, AtomType, Siblings};

/// Decode every recognised child of an `ilst` atom.
///
/// Unknown keys, values whose data type does not fit the key, and empty
/// values are skipped. Parsing stops quietly at the first malformed child.
pub fn parse_ilst(data: &[u8], ilst: &Atom) -> Tags {
    let mut tags = Tags::new();

    let range = ilst.payload_range();
    for child in Siblings::new(data, range.start, range.len()) {
        let Some(key) = TagKey::from_atom_type(child.atom_type) else {
            tracing::trace!(atom = %child.atom_type, "Skipping unknown ilst child");
            continue;
        };
        let Some(data_atom) = find_child(data, &child, AtomType::DATA) else {
            continue;
        };
        if let Some(value) = parse_data_atom(data, &data_atom, key.kind()) {
            tags.insert_unchecked(key, value);
        }
    }

    tags
}

/// Decode a `data` atom: type code, 4-byte locale, then the payload.
fn parse_data_atom(data: &[u8], atom: &Atom, kind: TagKind) -> Option<TagValue> {
    if atom.data_size() < 8 {
        return None;
    }
    // The top byte is a version; the type code is the low 24 bits.
    let code = read_u32(data, atom.data_offset())? & 0x00FF_FFFF;
    let payload = data.get(atom.data_offset() + 8..atom.end())?;
    if payload.is_empty() {
        return None;
    }

    match (kind, code) {
        (TagKind::Text, data_type::UTF8) => {
            let text = String::from_utf8_lossy(payload).trim().to_string();
            (!text.is_empty()).then_some(TagValue::Text(text))
        }
        (TagKind::Integer, data_type::INTEGER) => {
            let n = match payload.len() {
                1 => payload[0] as i8 as i32,
                2 => i16::from_be_bytes([payload[0], payload[1]]) as i32,
                n if n >= 4 => i32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]),
                _ => return None,
            };
            Some(TagValue::Integer(n))
        }
        (TagKind::Pair, data_type::IMPLICIT) if payload.len() >= 6 => Some(TagValue::Pair {
            index: u16::from_be_bytes([payload[2], payload[3]]),
            total: u16::from_be_bytes([payload[4], payload[5]]),
        }),
        (TagKind::Image, data_type::JPEG | data_type::PNG) => Some(TagValue::Image {
            format: if code == data_type::PNG {
                ImageFormat::Png
            } else {
                ImageFormat::Jpeg
            },
            data: payload.to_vec(),
        }),
        _ => None,
    }
}
