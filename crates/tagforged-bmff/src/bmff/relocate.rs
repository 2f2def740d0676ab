//! Chunk offset relocation.
//!
//! `stco`/`co64` entries are absolute file offsets. When an edit moves the
//! bytes that follow it, every entry pointing at or past the edit has to
//! move with them or existing tracks lose their media.

use super::{find_child, read_u32, read_u64, Atom, AtomBuffer, AtomType};
use crate::{Error, Result};

/// A chunk offset table found under `moov`.
#[derive(Debug, Clone, Copy)]
struct OffsetTable {
    /// Offset of the first entry.
    entries_at: usize,
    count: usize,
    wide: bool,
}

fn offset_tables(data: &[u8], moov: &Atom) -> Vec<OffsetTable> {
    let mut tables = Vec::new();

    for trak in moov.children(data).filter(|a| a.atom_type == AtomType::TRAK) {
        let Some(stbl) = find_child(data, &trak, AtomType::MDIA)
            .and_then(|mdia| find_child(data, &mdia, AtomType::MINF))
            .and_then(|minf| find_child(data, &minf, AtomType::STBL))
        else {
            continue;
        };

        for table in stbl.children(data) {
            let wide = match table.atom_type {
                AtomType::STCO => false,
                AtomType::CO64 => true,
                _ => continue,
            };
            let Some(count) = read_u32(data, table.data_offset() + 4) else {
                continue;
            };
            let entry_size = if wide { 8 } else { 4 };
            let entries_at = table.data_offset() + 8;
            // Clamp the declared count to what the atom actually holds.
            let available = table.end().saturating_sub(entries_at) / entry_size;
            tables.push(OffsetTable {
                entries_at,
                count: (count as usize).min(available),
                wide,
            });
        }
    }

    tables
}

/// Shift every chunk offset `>= threshold` by `delta`.
///
/// `moov` must be located in the buffer as it is now, before the edit is
/// applied. Returns the number of entries rewritten.
pub fn relocate_chunk_offsets(
    buf: &mut AtomBuffer,
    moov: &Atom,
    threshold: usize,
    delta: i64,
) -> Result<usize> {
    if delta == 0 {
        return Ok(0);
    }

    let tables = offset_tables(buf.as_slice(), moov);
    let mut patched = Vec::new();

    for table in &tables {
        for i in 0..table.count {
            if table.wide {
                let at = table.entries_at + i * 8;
                let Some(value) = read_u64(buf.as_slice(), at) else {
                    break;
                };
                if value >= threshold as u64 {
                    let moved = value as i64 + delta;
                    let moved = u64::try_from(moved).map_err(|_| Error::SizeOverflow {
                        atom_type: AtomType::CO64,
                        size: moved,
                    })?;
                    patched.push((at, moved.to_be_bytes().to_vec()));
                }
            } else {
                let at = table.entries_at + i * 4;
                let Some(value) = buf.read_u32(at) else {
                    break;
                };
                if value as usize >= threshold {
                    let moved = value as i64 + delta;
                    let moved = u32::try_from(moved).map_err(|_| Error::SizeOverflow {
                        atom_type: AtomType::STCO,
                        size: moved,
                    })?;
                    patched.push((at, moved.to_be_bytes().to_vec()));
                }
            }
        }
    }

    // Validate everything before writing so a failure leaves the buffer as-is.
    let count = patched.len();
    for (at, bytes) in patched {
        buf.splice(at..at + bytes.len(), &bytes)?;
    }

    if count > 0 {
        tracing::debug!(entries = count, threshold, delta, "Relocated chunk offsets");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmff::{find_box, fullbox_header, write_box, write_container_box};

    fn stco(offsets: &[u32]) -> Vec<u8> {
        let mut c = fullbox_header(0, 0).to_vec();
        c.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
        for o in offsets {
            c.extend_from_slice(&o.to_be_bytes());
        }
        write_box(AtomType::STCO, &c)
    }

    fn co64(offsets: &[u64]) -> Vec<u8> {
        let mut c = fullbox_header(0, 0).to_vec();
        c.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
        for o in offsets {
            c.extend_from_slice(&o.to_be_bytes());
        }
        write_box(AtomType::CO64, &c)
    }

    fn trak_with(table: &[u8]) -> Vec<u8> {
        let stbl = write_container_box(AtomType::STBL, &[table]);
        let minf = write_container_box(AtomType::MINF, &[&stbl]);
        let mdia = write_container_box(AtomType::MDIA, &[&minf]);
        write_container_box(AtomType::TRAK, &[&mdia])
    }

    fn movie() -> Vec<u8> {
        let t1 = trak_with(&stco(&[100, 500, 900]));
        let t2 = trak_with(&co64(&[50, 1000]));
        write_container_box(AtomType::MOOV, &[&t1, &t2])
    }

    #[test]
    fn test_relocates_entries_past_threshold() {
        let mut buf = AtomBuffer::new(movie());
        let moov = find_box(buf.as_slice(), AtomType::MOOV, 0, buf.len()).unwrap();

        let n = relocate_chunk_offsets(&mut buf, &moov, 500, 16).unwrap();
        assert_eq!(n, 3);

        let tables = offset_tables(buf.as_slice(), &moov);
        let stco = tables[0];
        let values: Vec<u32> = (0..stco.count)
            .map(|i| buf.read_u32(stco.entries_at + i * 4).unwrap())
            .collect();
        assert_eq!(values, vec![100, 516, 916]);

        let co64 = tables[1];
        let values: Vec<u64> = (0..co64.count)
            .map(|i| read_u64(buf.as_slice(), co64.entries_at + i * 8).unwrap())
            .collect();
        assert_eq!(values, vec![50, 1016]);
    }

    #[test]
    fn test_negative_delta() {
        let mut buf = AtomBuffer::new(movie());
        let moov = find_box(buf.as_slice(), AtomType::MOOV, 0, buf.len()).unwrap();
        assert_eq!(relocate_chunk_offsets(&mut buf, &moov, 0, -50).unwrap(), 5);
    }

    #[test]
    fn test_underflow_leaves_buffer_untouched() {
        let data = movie();
        let mut buf = AtomBuffer::new(data.clone());
        let moov = find_box(buf.as_slice(), AtomType::MOOV, 0, buf.len()).unwrap();
        assert!(relocate_chunk_offsets(&mut buf, &moov, 0, -60).is_err());
        assert_eq!(buf.as_slice(), &data[..]);
    }

    #[test]
    fn test_no_tracks() {
        let mut buf = AtomBuffer::new(write_box(AtomType::MOOV, &[]));
        let moov = find_box(buf.as_slice(), AtomType::MOOV, 0, buf.len()).unwrap();
        assert_eq!(relocate_chunk_offsets(&mut buf, &moov, 0, 8).unwrap(), 0);
    }
}
