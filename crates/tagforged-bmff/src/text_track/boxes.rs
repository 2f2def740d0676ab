//! Leaf and header boxes of a text `trak`.

use crate::bmff::{fullbox_header, write_box, write_container_box, AtomType};
use crate::{Error, Result};
use bytes::BufMut;

/// Handler name written into `hdlr`.
pub(crate) const HANDLER_NAME: &str = "SubtitleHandler";

/// `tkhd` flag: track enabled.
const TRACK_ENABLED: u32 = 0x1;

fn put_identity_matrix(content: &mut Vec<u8>) {
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        content.put_u32(value);
    }
}

/// Pack a three-letter ISO-639-2 code into 15 bits (5 per letter).
pub fn pack_language(language: &str) -> Result<u16> {
    let bytes = language.as_bytes();
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
        return Err(Error::invalid_input(format!(
            "language must be three ASCII letters, got {language:?}"
        )));
    }
    Ok(bytes
        .iter()
        .map(|b| (b.to_ascii_lowercase() - 0x60) as u16)
        .fold(0, |packed, letter| (packed << 5) | letter))
}

/// Version 0 track header (92 bytes). Duration is left at zero.
pub(crate) fn write_tkhd(track_id: u32) -> Vec<u8> {
    let mut content = Vec::with_capacity(84);
    content.put_slice(&fullbox_header(0, TRACK_ENABLED));
    content.put_u32(0); // creation_time
    content.put_u32(0); // modification_time
    content.put_u32(track_id);
    content.put_u32(0); // reserved
    content.put_u32(0); // duration
    content.put_slice(&[0u8; 8]);
    content.put_u16(0); // layer
    content.put_u16(0); // alternate_group
    content.put_u16(0); // volume
    content.put_u16(0);
    put_identity_matrix(&mut content);
    content.put_u32(0); // width
    content.put_u32(0); // height
    write_box(AtomType::TKHD, &content)
}

/// Media header; version 1 only when the duration needs 64 bits.
pub(crate) fn write_mdhd(timescale: u32, duration: u64, language: u16) -> Vec<u8> {
    let mut content = Vec::with_capacity(36);
    match u32::try_from(duration) {
        Ok(duration) => {
            content.put_slice(&fullbox_header(0, 0));
            content.put_u32(0);
            content.put_u32(0);
            content.put_u32(timescale);
            content.put_u32(duration);
        }
        Err(_) => {
            content.put_slice(&fullbox_header(1, 0));
            content.put_u64(0);
            content.put_u64(0);
            content.put_u32(timescale);
            content.put_u64(duration);
        }
    }
    content.put_u16(language);
    content.put_u16(0); // pre_defined
    write_box(AtomType::MDHD, &content)
}

pub(crate) fn write_hdlr(handler_type: &[u8; 4], name: &str) -> Vec<u8> {
    let mut content = Vec::with_capacity(25 + name.len());
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(0); // pre_defined
    content.put_slice(handler_type);
    content.put_slice(&[0u8; 12]);
    content.put_slice(name.as_bytes());
    content.put_u8(0);
    write_box(AtomType::HDLR, &content)
}

/// Null media header.
pub(crate) fn write_nmhd() -> Vec<u8> {
    write_box(AtomType::NMHD, &fullbox_header(0, 0))
}

/// `dinf` with a single self-contained `url ` reference.
pub(crate) fn write_dinf() -> Vec<u8> {
    let url = write_box(AtomType::URL, &fullbox_header(0, 1));
    let mut dref = Vec::with_capacity(8 + url.len());
    dref.put_slice(&fullbox_header(0, 0));
    dref.put_u32(1);
    dref.put_slice(&url);
    write_container_box(AtomType::DINF, &[&write_box(AtomType::DREF, &dref)])
}

/// `stsd` holding one sample entry.
pub(crate) fn write_stsd(entry: &[u8]) -> Vec<u8> {
    let mut content = Vec::with_capacity(8 + entry.len());
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(1);
    content.put_slice(entry);
    write_box(AtomType::STSD, &content)
}
