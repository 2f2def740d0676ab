//! Shared fixtures for engine integration tests.
//!
//! Builds small but structurally complete movies on disk: `ftyp`, a `moov`
//! with one media track whose `stco` points into a trailing `mdat`, and
//! optionally a `udta/meta` chain.

#![allow(dead_code)]

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tagforged_bmff::bmff::{
    find_child, fullbox_header, read_u32, scan, write_box, write_container_box, AtomPath,
    AtomType,
};
use tempfile::TempDir;

/// Bytes stored in the fixture's `mdat`.
pub const MEDIA_PAYLOAD: &[u8] = b"not really video but close enough";

pub struct Fixture {
    pub udta: bool,
    pub existing_title: Option<&'static str>,
    pub mvex: bool,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            udta: true,
            existing_title: Some("Old title"),
            mvex: false,
        }
    }
}

fn mvhd() -> Vec<u8> {
    let mut content = vec![0u8; 96];
    content[..4].copy_from_slice(&fullbox_header(0, 0));
    content[12..16].copy_from_slice(&1000u32.to_be_bytes());
    content[92..].copy_from_slice(&2u32.to_be_bytes());
    write_box(AtomType::MVHD, &content)
}

fn media_trak(chunk_offset: u32) -> Vec<u8> {
    let mut tkhd = vec![0u8; 84];
    tkhd[..4].copy_from_slice(&fullbox_header(0, 1));
    tkhd[12..16].copy_from_slice(&1u32.to_be_bytes());
    let tkhd = write_box(AtomType::TKHD, &tkhd);

    let mut stco = fullbox_header(0, 0).to_vec();
    stco.extend_from_slice(&1u32.to_be_bytes());
    stco.extend_from_slice(&chunk_offset.to_be_bytes());
    let stco = write_box(AtomType::STCO, &stco);

    let stbl = write_container_box(AtomType::STBL, &[&stco]);
    let minf = write_container_box(AtomType::MINF, &[&stbl]);
    let mdia = write_container_box(AtomType::MDIA, &[&minf]);
    write_container_box(AtomType::TRAK, &[&tkhd, &mdia])
}

fn udta(existing_title: Option<&str>) -> Vec<u8> {
    let mut meta = fullbox_header(0, 0).to_vec();
    if let Some(title) = existing_title {
        let mut data = 1u32.to_be_bytes().to_vec();
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(title.as_bytes());
        let data = write_box(AtomType::DATA, &data);
        let nam = write_container_box(AtomType(*b"\xa9nam"), &[&data]);
        meta.extend(write_container_box(AtomType::ILST, &[&nam]));
    }
    let meta = write_box(AtomType::META, &meta);
    write_container_box(AtomType::UDTA, &[&meta])
}

impl Fixture {
    pub fn bytes(&self) -> Vec<u8> {
        let ftyp = write_box(AtomType::FTYP, b"mp42\0\0\0\0mp42isom");
        let build_moov = |chunk_offset: u32| {
            let mut children = vec![mvhd(), media_trak(chunk_offset)];
            if self.mvex {
                children.push(write_box(AtomType::MVEX, &[]));
            }
            if self.udta {
                children.push(udta(self.existing_title));
            }
            let refs: Vec<&[u8]> = children.iter().map(Vec::as_slice).collect();
            write_container_box(AtomType::MOOV, &refs)
        };
        let moov_len = build_moov(0).len();
        let chunk_offset = (ftyp.len() + moov_len + 8) as u32;

        let mut out = ftyp;
        out.extend(build_moov(chunk_offset));
        out.extend(write_box(AtomType::MDAT, MEDIA_PAYLOAD));
        out
    }

    pub fn write(&self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.m4v");
        std::fs::write(&path, self.bytes()).unwrap();
        (dir, path)
    }
}

pub fn sha256_hex(path: &Path) -> String {
    hex::encode(Sha256::digest(std::fs::read(path).unwrap()))
}

/// Assert the first `stco` entry of the media track still addresses the payload.
pub fn assert_media_addressable(data: &[u8]) {
    let stbl = AtomPath::resolve(
        data,
        &[AtomType::MOOV, AtomType::TRAK, AtomType::MDIA, AtomType::MINF, AtomType::STBL],
    )
    .unwrap();
    let stco = find_child(data, stbl.leaf().unwrap(), AtomType::STCO).unwrap();
    let offset = read_u32(data, stco.data_offset() + 8).unwrap() as usize;
    assert_eq!(&data[offset..offset + MEDIA_PAYLOAD.len()], MEDIA_PAYLOAD);
}

/// Assert the top-level atoms tile the file exactly.
pub fn assert_top_level_tiles(data: &[u8]) {
    let atoms = scan(data, 0, data.len()).unwrap();
    assert_eq!(atoms.last().map(|a| a.end()), Some(data.len()));
}
