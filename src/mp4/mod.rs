//! Native access to the date fields of QuickTime/MP4 files.
//!
//! Only the atoms carrying dates are visited:
//!
//! ```ignore
//! moov
//! ├── mvhd            CreateDate, ModifyDate
//! └── trak (multiple)
//!     ├── tkhd        TrackCreateDate, TrackModifyDate
//!     └── mdia
//!         └── mdhd    MediaCreateDate, MediaModifyDate
//! ```
//!
//! Dates are seconds since midnight, 1904-01-01 and are rewritten in place,
//! so the file layout never changes.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>

pub mod atom_header;
pub mod dates;
pub mod metadata;

pub use atom_header::AtomHeader;
pub use dates::{AtomDates, DateAtom, DateAtomKind};
pub use metadata::Mp4Metadata;
