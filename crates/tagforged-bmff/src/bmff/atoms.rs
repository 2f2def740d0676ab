//! Atom type codes and located atom headers.

use std::fmt;
use std::ops::Range;

/// Four-character atom type code.
///
/// Usually ASCII, but iTunes tag names start with the `0xA9` copyright byte
/// (`©nam`, `©ART`, ...), so the raw bytes are kept as-is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomType(pub [u8; 4]);

impl AtomType {
    pub const FTYP: Self = Self(*b"ftyp");
    pub const MOOV: Self = Self(*b"moov");
    pub const MDAT: Self = Self(*b"mdat");
    pub const MVHD: Self = Self(*b"mvhd");
    pub const MVEX: Self = Self(*b"mvex");
    pub const TRAK: Self = Self(*b"trak");
    pub const TKHD: Self = Self(*b"tkhd");
    pub const MDIA: Self = Self(*b"mdia");
    pub const MDHD: Self = Self(*b"mdhd");
    pub const HDLR: Self = Self(*b"hdlr");
    pub const MINF: Self = Self(*b"minf");
    pub const NMHD: Self = Self(*b"nmhd");
    pub const DINF: Self = Self(*b"dinf");
    pub const DREF: Self = Self(*b"dref");
    pub const URL: Self = Self(*b"url ");
    pub const STBL: Self = Self(*b"stbl");
    pub const STSD: Self = Self(*b"stsd");
    pub const STTS: Self = Self(*b"stts");
    pub const STSC: Self = Self(*b"stsc");
    pub const STSZ: Self = Self(*b"stsz");
    pub const STCO: Self = Self(*b"stco");
    pub const CO64: Self = Self(*b"co64");
    pub const UDTA: Self = Self(*b"udta");
    pub const META: Self = Self(*b"meta");
    pub const ILST: Self = Self(*b"ilst");
    pub const DATA: Self = Self(*b"data");
    pub const TX3G: Self = Self(*b"tx3g");
    pub const FTAB: Self = Self(*b"ftab");
    pub const FREE: Self = Self(*b"free");

    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw code bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether the code looks like a real type: printable ASCII or the
    /// iTunes copyright byte.
    pub fn is_plausible(&self) -> bool {
        self.0
            .iter()
            .all(|&b| (0x20..=0x7E).contains(&b) || b == 0xA9)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            match b {
                0xA9 => f.write_str("©")?,
                0x20..=0x7E => write!(f, "{}", b as char)?,
                _ => write!(f, "\\x{:02x}", b)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomType(\"{}\")", self)
    }
}

/// Size of a compact atom header (32-bit size + type).
pub const HEADER_SIZE: usize = 8;

/// An atom located inside a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    /// Atom type code.
    pub atom_type: AtomType,
    /// Offset of the 4-byte size field.
    pub offset: usize,
    /// Declared size including the 8-byte header.
    pub size: u32,
}

impl Atom {
    /// Offset one past the last byte of the atom.
    pub fn end(&self) -> usize {
        self.offset + self.size as usize
    }

    /// Offset where the payload starts.
    pub fn data_offset(&self) -> usize {
        self.offset + HEADER_SIZE
    }

    /// Byte range following the header.
    pub fn payload_range(&self) -> Range<usize> {
        self.data_offset()..self.end()
    }

    /// Payload size (size minus header).
    pub fn data_size(&self) -> usize {
        (self.size as usize).saturating_sub(HEADER_SIZE)
    }

    /// Fixed non-atom prefix before the children of a container.
    ///
    /// `meta` carries version/flags; `stsd` and `dref` carry version/flags
    /// and an entry count.
    pub fn child_prefix(&self) -> usize {
        match self.atom_type {
            AtomType::META => 4,
            AtomType::STSD | AtomType::DREF => 8,
            _ => 0,
        }
    }

    /// Byte range holding the child atoms of a container.
    pub fn children_range(&self) -> Range<usize> {
        let start = (self.data_offset() + self.child_prefix()).min(self.end());
        start..self.end()
    }

    /// Lazily iterate the children of this atom within `data`.
    pub fn children<'a>(&self, data: &'a [u8]) -> super::Siblings<'a> {
        let range = self.children_range();
        super::Siblings::new(data, range.start, range.len())
    }
}
