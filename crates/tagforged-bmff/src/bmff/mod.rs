//! ISO BMFF atom scanning and in-place editing.
//!
//! This module provides the primitives every edit is built from:
//! - [`find_box`] / [`Siblings`]: flat sibling scans over a byte range
//! - [`adjust_size`]: 32-bit size field patching
//! - [`AtomPath`]: ancestor chains, so a splice can fix every enclosing size
//! - [`AtomBuffer`]: the owned in-memory copy of the file being edited
//! - [`relocate_chunk_offsets`]: keeps `stco`/`co64` in step with moved bytes

mod atoms;
mod buffer;
mod path;
mod relocate;
mod scanner;
mod size;
mod writer;

pub use atoms::{Atom, AtomType, HEADER_SIZE};
pub use buffer::AtomBuffer;
pub use path::AtomPath;
pub use relocate::relocate_chunk_offsets;
pub use scanner::{find_box, find_child, read_u32, read_u64, scan, Siblings};
pub use size::adjust_size;
pub use writer::{fullbox_header, write_box, write_container_box};
