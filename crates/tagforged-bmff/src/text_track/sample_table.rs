//! Sample table boxes for a single-chunk text track.
//!
//! - stts: run-length encoded sample durations
//! - stsc: one entry, every sample in chunk 1
//! - stsz: explicit per-sample sizes
//! - stco: one chunk offset

use crate::bmff::{fullbox_header, write_box, write_container_box, AtomType};
use bytes::BufMut;

/// One `stts` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeToSampleRun {
    pub count: u32,
    pub duration: u32,
}

/// Collapse consecutive equal durations into runs.
pub fn time_to_sample_runs(durations: &[u32]) -> Vec<TimeToSampleRun> {
    let mut runs: Vec<TimeToSampleRun> = Vec::new();
    for &duration in durations {
        match runs.last_mut() {
            Some(run) if run.duration == duration => run.count += 1,
            _ => runs.push(TimeToSampleRun { count: 1, duration }),
        }
    }
    runs
}

pub(crate) fn write_stts(runs: &[TimeToSampleRun]) -> Vec<u8> {
    let mut content = Vec::with_capacity(8 + runs.len() * 8);
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(runs.len() as u32);
    for run in runs {
        content.put_u32(run.count);
        content.put_u32(run.duration);
    }
    write_box(AtomType::STTS, &content)
}

pub(crate) fn write_stsc(sample_count: u32) -> Vec<u8> {
    let mut content = Vec::with_capacity(20);
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(1);
    content.put_u32(1); // first_chunk
    content.put_u32(sample_count); // samples_per_chunk
    content.put_u32(1); // sample_description_index
    write_box(AtomType::STSC, &content)
}

pub(crate) fn write_stsz(sizes: &[u32]) -> Vec<u8> {
    let mut content = Vec::with_capacity(12 + sizes.len() * 4);
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(0); // sample_size: sizes follow
    content.put_u32(sizes.len() as u32);
    for &size in sizes {
        content.put_u32(size);
    }
    write_box(AtomType::STSZ, &content)
}

pub(crate) fn write_stco(chunk_offset: u32) -> Vec<u8> {
    let mut content = Vec::with_capacity(12);
    content.put_slice(&fullbox_header(0, 0));
    content.put_u32(1);
    content.put_u32(chunk_offset);
    write_box(AtomType::STCO, &content)
}

/// Assemble `stbl` in the fixed stsd, stts, stsc, stsz, stco order.
pub(crate) fn write_stbl(
    stsd: &[u8],
    runs: &[TimeToSampleRun],
    sizes: &[u32],
    chunk_offset: u32,
) -> Vec<u8> {
    let stts = write_stts(runs);
    let stsc = write_stsc(sizes.len() as u32);
    let stsz = write_stsz(sizes);
    let stco = write_stco(chunk_offset);
    write_container_box(AtomType::STBL, &[stsd, &stts, &stsc, &stsz, &stco])
}
