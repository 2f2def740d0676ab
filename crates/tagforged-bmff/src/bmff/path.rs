//! Ancestor chains from the outermost container to a target atom.

use super::{find_box, Atom, AtomBuffer, AtomType};
use crate::{Error, Result};

/// Chain of nested atoms, outermost first.
///
/// Holding the chain lets a splice inside the innermost atom patch every
/// ancestor header in one call instead of re-deriving offsets by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomPath {
    atoms: Vec<Atom>,
}

impl AtomPath {
    /// Resolve `types` as a nested chain starting at the top level of `data`.
    ///
    /// Each link is searched among the children of the previous one (after
    /// any fixed prefix such as `meta`'s version/flags). A missing link is a
    /// [`Error::StructureMissing`] naming the chain up to that link.
    pub fn resolve(data: &[u8], types: &[AtomType]) -> Result<Self> {
        let mut atoms: Vec<Atom> = Vec::with_capacity(types.len());

        for (depth, &atom_type) in types.iter().enumerate() {
            let range = match atoms.last() {
                Some(parent) => parent.children_range(),
                None => 0..data.len(),
            };
            let atom = find_box(data, atom_type, range.start, range.len()).ok_or_else(|| {
                Error::structure_missing(describe(&types[..=depth]))
            })?;
            atoms.push(atom);
        }

        Ok(Self { atoms })
    }

    /// Build a path from already located atoms, outermost first.
    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// The atoms on the path, outermost first.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The outermost atom.
    pub fn root(&self) -> Option<&Atom> {
        self.atoms.first()
    }

    /// The innermost atom.
    pub fn leaf(&self) -> Option<&Atom> {
        self.atoms.last()
    }

    /// Add `delta` to every size on the path, innermost first.
    ///
    /// Call after an edit inside the leaf changed its contents by `delta`
    /// bytes. Header offsets stay valid because every ancestor starts before
    /// the edit point.
    pub fn propagate(&self, buf: &mut AtomBuffer, delta: i64) -> Result<()> {
        if delta == 0 {
            return Ok(());
        }
        for atom in self.atoms.iter().rev() {
            buf.adjust_size(atom.offset, delta)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for AtomPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let types: Vec<AtomType> = self.atoms.iter().map(|a| a.atom_type).collect();
        f.write_str(&describe(&types))
    }
}

fn describe(types: &[AtomType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmff::{write_box, write_container_box};

    fn nested() -> Vec<u8> {
        let ilst = write_box(AtomType::ILST, &[]);
        let mut meta_content = vec![0, 0, 0, 0];
        meta_content.extend(&ilst);
        let meta = write_box(AtomType::META, &meta_content);
        let udta = write_container_box(AtomType::UDTA, &[&meta]);
        let moov = write_container_box(AtomType::MOOV, &[&udta]);
        let mut data = write_box(AtomType::FTYP, b"isom\0\0\0\0");
        data.extend(moov);
        data
    }

    #[test]
    fn test_resolve_chain() {
        let data = nested();
        let path = AtomPath::resolve(
            &data,
            &[AtomType::MOOV, AtomType::UDTA, AtomType::META, AtomType::ILST],
        )
        .unwrap();
        assert_eq!(path.atoms().len(), 4);
        assert_eq!(path.root().unwrap().offset, 16);
        assert_eq!(path.leaf().unwrap().atom_type, AtomType::ILST);
        // ilst sits after meta's 4-byte version/flags.
        assert_eq!(path.leaf().unwrap().offset, 16 + 8 + 8 + 8 + 4);
        assert_eq!(path.to_string(), "moov/udta/meta/ilst");
    }

    #[test]
    fn test_resolve_missing_link() {
        let data = nested();
        let err = AtomPath::resolve(&data, &[AtomType::MOOV, AtomType::TRAK]).unwrap_err();
        assert!(err.is_soft());
        assert_eq!(err.to_string(), "structure missing: moov/trak");
    }

    #[test]
    fn test_propagate_patches_every_ancestor() {
        let data = nested();
        let path =
            AtomPath::resolve(&data, &[AtomType::MOOV, AtomType::UDTA, AtomType::META]).unwrap();
        let sizes: Vec<u32> = path.atoms().iter().map(|a| a.size).collect();

        let mut buf = AtomBuffer::new(data);
        path.propagate(&mut buf, 12).unwrap();

        for (atom, before) in path.atoms().iter().zip(sizes) {
            assert_eq!(buf.read_u32(atom.offset), Some(before + 12));
        }
        // ftyp is not on the path.
        assert_eq!(buf.read_u32(0), Some(16));
    }
}
