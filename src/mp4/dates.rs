//! Creation and modification dates of `mvhd`, `tkhd` and `mdhd`.
//!
//! All three atoms start with the same fields:
//!
//! ```ignore
//! version      u8       0 or 1
//! flags        [u8; 3]
//! creation     u32/u64  seconds since 1904-01-01 (u64 if version 1)
//! modification u32/u64
//! ```

use std::io::{Read, Seek, SeekFrom};

use binrw::{binrw, BinReaderExt};
use time::Duration;

use crate::{consts::mp4_time_zero, AtomHeader, DriftError, TimeValue};

/// Leading date fields of a movie, track or media header atom.
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomDates {
    /// 32-bit dates.
    #[brw(magic = 0u8)]
    V0 {
        flags: [u8; 3],
        creation_time: u32,
        modification_time: u32,
    },
    /// 64-bit dates.
    #[brw(magic = 1u8)]
    V1 {
        flags: [u8; 3],
        creation_time: u64,
        modification_time: u64,
    },
}

impl AtomDates {
    /// Encoded size of the version 0 date block.
    pub const V0_SIZE: u64 = 12;
    /// Encoded size of the version 1 date block.
    pub const V1_SIZE: u64 = 20;

    /// Encoded size in bytes, version and flags included.
    pub fn size(&self) -> u64 {
        match self {
            Self::V0 { .. } => Self::V0_SIZE,
            Self::V1 { .. } => Self::V1_SIZE,
        }
    }

    /// Seconds since midnight, 1904-01-01.
    pub fn creation_time(&self) -> u64 {
        match self {
            Self::V0 { creation_time, .. } => *creation_time as u64,
            Self::V1 { creation_time, .. } => *creation_time,
        }
    }

    /// Seconds since midnight, 1904-01-01.
    pub fn modification_time(&self) -> u64 {
        match self {
            Self::V0 { modification_time, .. } => *modification_time as u64,
            Self::V1 { modification_time, .. } => *modification_time,
        }
    }

    pub fn set_creation_time(&mut self, secs: u64) -> Result<(), DriftError> {
        match self {
            Self::V0 { creation_time, .. } => *creation_time = fit_u32(secs)?,
            Self::V1 { creation_time, .. } => *creation_time = secs,
        }
        Ok(())
    }

    pub fn set_modification_time(&mut self, secs: u64) -> Result<(), DriftError> {
        match self {
            Self::V0 { modification_time, .. } => *modification_time = fit_u32(secs)?,
            Self::V1 { modification_time, .. } => *modification_time = secs,
        }
        Ok(())
    }
}

fn fit_u32(secs: u64) -> Result<u32, DriftError> {
    u32::try_from(secs).map_err(|_| DriftError::TimeRange(secs as f64))
}

/// Converts MP4 seconds to a time value.
/// `0` means unset and yields `None`.
pub fn mp4_to_time_value(secs: u64) -> Option<TimeValue> {
    if secs == 0 {
        return None
    }
    let secs = i64::try_from(secs).ok()?;
    mp4_time_zero()
        .checked_add(Duration::seconds(secs))
        .map(TimeValue::from_datetime)
}

/// Converts a time value to whole MP4 seconds.
pub fn time_value_to_mp4(value: TimeValue) -> Result<u64, DriftError> {
    let secs = value.round() - TimeValue::from_datetime(mp4_time_zero());
    match secs >= 0.0 && secs <= u64::MAX as f64 {
        true => Ok(secs as u64),
        false => Err(DriftError::TimeRange(value.secs())),
    }
}

/// Which header atom dates belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAtomKind {
    /// `moov/mvhd`
    Movie,
    /// `moov/trak/tkhd`
    Track,
    /// `moov/trak/mdia/mdhd`
    Media,
}

impl DateAtomKind {
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"mvhd" => Some(Self::Movie),
            b"tkhd" => Some(Self::Track),
            b"mdhd" => Some(Self::Media),
            _ => None,
        }
    }

    /// Tag name for the creation date, as exiftool names it.
    pub fn creation_tag(&self) -> &'static str {
        match self {
            Self::Movie => "CreateDate",
            Self::Track => "TrackCreateDate",
            Self::Media => "MediaCreateDate",
        }
    }

    /// Tag name for the modification date, as exiftool names it.
    pub fn modification_tag(&self) -> &'static str {
        match self {
            Self::Movie => "ModifyDate",
            Self::Track => "TrackModifyDate",
            Self::Media => "MediaModifyDate",
        }
    }
}

/// Date fields of one header atom and where they live.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAtom {
    pub kind: DateAtomKind,
    pub header: AtomHeader,
    pub dates: AtomDates,
}

impl DateAtom {
    pub fn creation(&self) -> Option<TimeValue> {
        mp4_to_time_value(self.dates.creation_time())
    }

    pub fn modification(&self) -> Option<TimeValue> {
        mp4_to_time_value(self.dates.modification_time())
    }

    /// Sets the field named `tag` (case-insensitive) to `secs`.
    /// Returns `false` if `tag` does not belong to this atom.
    pub fn set(&mut self, tag: &str, secs: u64) -> Result<bool, DriftError> {
        if tag.eq_ignore_ascii_case(self.kind.creation_tag()) {
            self.dates.set_creation_time(secs)?;
            Ok(true)
        } else if tag.eq_ignore_ascii_case(self.kind.modification_tag()) {
            self.dates.set_modification_time(secs)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Collects all date-bearing atoms in an MP4 of `len` bytes,
/// in file order.
pub fn read_date_atoms<R: Read + Seek>(reader: &mut R, len: u64) -> Result<Vec<DateAtom>, DriftError> {
    let mut atoms = Vec::new();
    walk(reader, 0, len, &mut atoms)?;
    Ok(atoms)
}

fn walk<R: Read + Seek>(
    reader: &mut R,
    start: u64,
    end: u64,
    atoms: &mut Vec<DateAtom>
) -> Result<(), DriftError> {
    let mut pos = start;
    // 8 bytes is the smallest possible header
    while pos + 8 <= end {
        reader.seek(SeekFrom::Start(pos))?;
        let header = AtomHeader::read(reader, end)?;

        if header.is_container() {
            walk(reader, header.data_offset(), header.end(), atoms)?;
        } else if let Some(kind) = DateAtomKind::from_fourcc(&header.name) {
            let too_small = || DriftError::UnexpectedAtomSize {
                len: header.atom_size(),
                offset: header.offset(),
            };
            if header.data_size() < AtomDates::V0_SIZE {
                return Err(too_small())
            }
            reader.seek(SeekFrom::Start(header.data_offset()))?;
            let dates: AtomDates = reader.read_be()?;
            if header.data_size() < dates.size() {
                return Err(too_small())
            }
            atoms.push(DateAtom { kind, header: header.to_owned(), dates });
        }

        pos = header.end();
    }
    Ok(())
}
