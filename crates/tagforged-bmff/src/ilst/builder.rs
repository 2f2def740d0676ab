//! `ilst` serialization.

use super::{data_type, TagKey, TagValue, Tags};
use crate::bmff::{write_box, AtomType};
use bytes::BufMut;

/// Build a complete `ilst` atom from `tags`.
///
/// Children are written in [`TagKey`] order, so the same tags always yield
/// the same bytes.
pub fn build_ilst(tags: &Tags) -> Vec<u8> {
    let mut children = Vec::new();
    for (key, value) in tags.iter() {
        children.extend(write_tag(key, value));
    }
    write_box(AtomType::ILST, &children)
}

/// One `ilst` child: an atom named after the key holding a single `data` atom.
fn write_tag(key: TagKey, value: &TagValue) -> Vec<u8> {
    let (code, payload) = match value {
        TagValue::Text(s) => (data_type::UTF8, s.as_bytes().to_vec()),
        TagValue::Integer(n) => (data_type::INTEGER, n.to_be_bytes().to_vec()),
        TagValue::Pair { index, total } => {
            let mut p = Vec::with_capacity(8);
            p.put_u16(0);
            p.put_u16(*index);
            p.put_u16(*total);
            p.put_u16(0);
            (data_type::IMPLICIT, p)
        }
        TagValue::Image { format, data } => (format.data_type(), data.clone()),
    };

    let mut content = Vec::with_capacity(8 + payload.len());
    content.put_u32(code);
    content.put_u32(0); // locale
    content.put_slice(&payload);

    let data_atom = write_box(AtomType::DATA, &content);
    write_box(key.atom_type(), &data_atom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmff::{find_box, read_u32};

    fn sample_tags() -> Tags {
        Tags::new()
            .with(TagKey::Title, "Test Title")
            .unwrap()
            .with(TagKey::Artist, "Test Artist")
            .unwrap()
            .with(TagKey::Genre, "Action, Drama")
            .unwrap()
            .with(TagKey::Season, 1)
            .unwrap()
            .with(TagKey::TrackNumber, TagValue::Pair { index: 3, total: 12 })
            .unwrap()
    }

    #[test]
    fn test_ilst_header() {
        let ilst = build_ilst(&sample_tags());
        assert!(ilst.len() > 8);
        assert_eq!(read_u32(&ilst, 0), Some(ilst.len() as u32));
        assert_eq!(&ilst[4..8], b"ilst");
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(build_ilst(&Tags::new()), vec![0, 0, 0, 8, b'i', b'l', b's', b't']);
    }

    #[test]
    fn test_text_data_atom_layout() {
        let tags = Tags::new().with(TagKey::Title, "Hi").unwrap();
        let ilst = build_ilst(&tags);
        let expected: Vec<u8> = [
            &[0, 0, 0, 34][..],
            b"ilst",
            &[0, 0, 0, 26],
            b"\xa9nam",
            &[0, 0, 0, 18],
            b"data",
            &[0, 0, 0, 1],
            &[0, 0, 0, 0],
            b"Hi",
        ]
        .concat();
        assert_eq!(ilst, expected);
    }

    #[test]
    fn test_cover_data_type() {
        let tags = Tags::new()
            .with(TagKey::Cover, TagValue::image(vec![0xFF, 0xD8, 0xFF, 0xE0]))
            .unwrap();
        let ilst = build_ilst(&tags);
        let covr = find_box(&ilst, AtomType(*b"covr"), 8, ilst.len() - 8).unwrap();
        let data = find_box(&ilst, AtomType::DATA, covr.data_offset(), covr.data_size()).unwrap();
        assert_eq!(read_u32(&ilst, data.data_offset()), Some(13));
        assert_eq!(&ilst[data.data_offset() + 8..data.end()], &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_pair_layout() {
        let tags = Tags::new()
            .with(TagKey::DiscNumber, TagValue::Pair { index: 1, total: 2 })
            .unwrap();
        let ilst = build_ilst(&tags);
        // ilst(8) + disk(8) + data header(8) + type(4) + locale(4)
        assert_eq!(&ilst[32..], &[0, 0, 0, 1, 0, 2, 0, 0]);
        assert_eq!(read_u32(&ilst, 24), Some(0));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(build_ilst(&sample_tags()), build_ilst(&sample_tags()));
    }
}
