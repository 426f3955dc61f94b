use std::io::{Read, Seek};

use binrw::{BinRead, BinReaderExt};

use crate::{consts::CONTAINER, support::fourcc_string, DriftError};

/// Header as stored in the file.
#[derive(Debug, BinRead)]
#[br(big)]
struct RawHeader {
    size: u32,
    name: [u8; 4],
    /// Present only if `size == 1`.
    #[br(if(size == 1))]
    large_size: Option<u64>,
}

/// Atom header.
/// 8 or 16 bytes in MP4, depending on whether
/// 32 or 64-bit sized.
///
/// ```ignore
/// | [X X X X] [Y Y Y Y] [Z Z Z Z Z Z Z Z] |
///    |         |         |
///    |         |         64bit size (optional, only if 32 bit size == 1)
///    |         FourCC
///    32bit size
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomHeader {
    /// Total atom size in bytes including 8/16 byte header.
    pub(crate) atom_size: u64,
    /// FourCC
    pub(crate) name: [u8; 4],
    /// Absolute byte offset for start of atom,
    /// i.e. byte offset for its header.
    pub(crate) offset: u64,
    /// Set to `true` if atom size is specified
    /// in the 64 bit field after the FourCC.
    pub(crate) size_64bit: bool,
}

impl AtomHeader {
    /// Reads the header at the current position.
    ///
    /// `end` is the absolute end of the enclosing atom (or file).
    /// A 32-bit size of 0 means the atom extends to `end`.
    pub fn read<R: Read + Seek>(reader: &mut R, end: u64) -> Result<Self, DriftError> {
        let offset = reader.stream_position()?;
        let raw: RawHeader = reader.read_be()?;

        let (atom_size, size_64bit) = match (raw.size, raw.large_size) {
            (1, Some(large)) => (large, true),
            (0, _) => (end.saturating_sub(offset), false),
            (size, _) => (size as u64, false),
        };

        let header = Self {
            atom_size,
            name: raw.name,
            offset,
            size_64bit,
        };

        if atom_size < header.header_size() as u64 || header.end() > end {
            return Err(DriftError::UnexpectedAtomSize { len: atom_size, offset })
        }

        Ok(header)
    }

    /// FourCC as string.
    /// Bytes are mapped as ISO8859-1.
    pub fn name(&self) -> String {
        fourcc_string(&self.name)
    }

    pub fn is(&self, fourcc: &[u8; 4]) -> bool {
        &self.name == fourcc
    }

    /// Whether this atom holds atoms that may contain dates.
    pub fn is_container(&self) -> bool {
        CONTAINER.iter().any(|c| c.as_bytes() == self.name)
    }

    pub fn atom_size(&self) -> u64 {
        self.atom_size
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Header size in bytes, 8 or 16.
    pub fn header_size(&self) -> u8 {
        match self.size_64bit {
            true => 16,
            false => 8,
        }
    }

    /// Absolute offset of data load, i.e. position after header.
    pub fn data_offset(&self) -> u64 {
        self.offset + self.header_size() as u64
    }

    /// Size of data load (excludes header size).
    pub fn data_size(&self) -> u64 {
        self.atom_size - self.header_size() as u64
    }

    /// Absolute offset of the next atom.
    pub fn end(&self) -> u64 {
        self.offset + self.atom_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_32bit_header() {
        let mut bytes = vec![0, 0, 0, 16];
        bytes.extend_from_slice(b"ftyp");
        bytes.extend_from_slice(&[0; 8]);
        let header = AtomHeader::read(&mut Cursor::new(&bytes), bytes.len() as u64).unwrap();
        assert!(header.is(b"ftyp"));
        assert_eq!(header.name(), "ftyp");
        assert_eq!(header.data_offset(), 8);
        assert_eq!(header.data_size(), 8);
        assert_eq!(header.end(), 16);
    }

    #[test]
    fn reads_64bit_header() {
        let mut bytes = vec![0, 0, 0, 1];
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&20u64.to_be_bytes());
        bytes.extend_from_slice(&[0; 4]);
        let header = AtomHeader::read(&mut Cursor::new(&bytes), bytes.len() as u64).unwrap();
        assert_eq!(header.header_size(), 16);
        assert_eq!(header.data_size(), 4);
    }

    #[test]
    fn zero_size_extends_to_end() {
        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&[0; 24]);
        let header = AtomHeader::read(&mut Cursor::new(&bytes), bytes.len() as u64).unwrap();
        assert_eq!(header.atom_size(), 32);
    }

    #[test]
    fn rejects_atom_past_end() {
        let mut bytes = vec![0, 0, 0, 64];
        bytes.extend_from_slice(b"moov");
        let res = AtomHeader::read(&mut Cursor::new(&bytes), bytes.len() as u64);
        assert!(matches!(res, Err(DriftError::UnexpectedAtomSize { len: 64, offset: 0 })));
    }
}
