use time::{
    format_description::BorrowedFormatItem,
    macros::{datetime, format_description},
    PrimitiveDateTime,
};

/// Date time format for reference files and for
/// values exchanged with metadata tools, `YYYY-MM-DD HH:MM:SS`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Same format as `DATE_FORMAT` in `strftime` notation,
/// passed to exiftool via `-d`.
pub const EXIFTOOL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exiftool's native date time format, used for values written.
pub const EXIFTOOL_WRITE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// Tags tried in order when reading the observed time of a photo.
pub const PHOTO_SOURCE_TAGS: [&'static str; 2] = [
    "DateTimeOriginal",
    "CreateDate",
];

/// Tags tried in order when reading the observed time of a video.
pub const VIDEO_SOURCE_TAGS: [&'static str; 3] = [
    "CreateDate",
    "MediaCreateDate",
    "TrackCreateDate",
];

/// Date-bearing tags queried in addition to the source candidates,
/// so that a correction is written to every tag that held a time.
///
/// - `DateTimeOriginal`, `CreateDate`, `ModifyDate`: EXIF, also QuickTime `mvhd`
/// - `TrackCreateDate`, `TrackModifyDate`: QuickTime `tkhd`
/// - `MediaCreateDate`, `MediaModifyDate`: QuickTime `mdhd`
pub const DATE_TAGS: [&'static str; 7] = [
    "DateTimeOriginal",
    "CreateDate",
    "ModifyDate",
    "TrackCreateDate",
    "TrackModifyDate",
    "MediaCreateDate",
    "MediaModifyDate",
];

/// FourCC:s for the container atoms walked when looking for
/// date-bearing atoms.
///
/// - `moov`: holds `mvhd` (movie dates)
/// - `trak`: moov.trak (multiple), holds `tkhd` (track dates)
/// - `mdia`: moov.trak.mdia, holds `mdhd` (media dates)
pub const CONTAINER: [&'static str; 3] = [
    "moov",
    "trak",
    "mdia",
];

/// File extensions read natively as QuickTime/MP4.
pub const MP4_EXTENSIONS: [&'static str; 3] = ["mp4", "mov", "m4v"];

/// Value of exiftool's `EmbeddedVideoType` for Samsung Motion Photos.
pub const MOTION_PHOTO_TYPE: &str = "MotionPhoto_Data";

/// Entries allowed in the Samsung trailer for the embedded video
/// to be safely cut off.
pub const SAMSUNG_TRAILER_ENTRIES: [&'static str; 4] = [
    "Samsung_Trailer",
    "TimeStamp",
    "SamsungTrailer",
    "EmbeddedVideo",
];

/// Time zero for MP4 containers. Midnight January 1, 1904.
pub fn mp4_time_zero() -> PrimitiveDateTime {
    datetime!(1904-01-01 0:00)
}
