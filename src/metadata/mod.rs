//! Boundaries to the programs and file formats that hold timestamps.
//!
//! Correction only talks to these traits, so a fake collaborator can stand
//! in for exiftool and ffmpeg in tests.
//!
//! - `MetadataIo`: read the observed time of a file, write a corrected one
//! - `ContainerIo`: copy tags between files, get at embedded motion photo video
//! - `FrameExtractor`: save a single video frame as an image

pub mod exiftool;
pub mod ffmpeg;
pub mod routed;

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use crate::{DriftError, FrameStamp, TimeValue};

pub use exiftool::{parse_tag_listing, Exiftool};
pub use ffmpeg::Ffmpeg;
pub use routed::RoutedMetadata;

/// Timestamp read from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// First candidate tag present in the file.
    pub tag: String,
    /// Value of `tag`.
    pub value: TimeValue,
    /// Every date-bearing tag present in the file.
    pub date_tags: BTreeSet<String>,
}

impl Reading {
    /// Tags a correction should be written to:
    /// all date tags present, including the source tag.
    pub fn write_tags(&self) -> Vec<String> {
        let mut tags = self.date_tags.clone();
        tags.insert(self.tag.clone());
        tags.into_iter().collect()
    }
}

/// Reads and writes timestamps of a single file.
pub trait MetadataIo: Send + Sync {
    /// Returns the first of `candidates` present in the file at `path`
    /// with its value, and all date-bearing tags the file carries.
    fn read_timestamp(&self, path: &Path, candidates: &[String]) -> Result<Reading, DriftError>;

    /// Every date-bearing tag present in the file at `path` with its value.
    fn read_dates(&self, path: &Path) -> Result<BTreeMap<String, TimeValue>, DriftError>;

    /// Writes `value` to every tag in `tags`.
    /// Either all tags are written or the call fails.
    fn write_timestamp(&self, path: &Path, tags: &[String], value: TimeValue) -> Result<(), DriftError>;
}

/// Whole-file metadata operations, used for frame grabs and motion photos.
pub trait ContainerIo: Send + Sync {
    /// Copies all writable tags from `from` onto `to`.
    fn copy_tags(&self, from: &Path, to: &Path) -> Result<(), DriftError>;

    /// Value of the `EmbeddedVideoType` tag, if any.
    fn embedded_video_type(&self, path: &Path) -> Result<Option<String>, DriftError>;

    /// Raw bytes of the embedded video.
    fn embedded_video(&self, path: &Path) -> Result<Vec<u8>, DriftError>;

    /// Verbose structural listing of the file,
    /// used to locate the Samsung trailer.
    fn trailer_listing(&self, path: &Path) -> Result<String, DriftError>;
}

/// Saves single frames from a video.
pub trait FrameExtractor: Send + Sync {
    /// Saves the frame at `at` in `video` as an image at `output`.
    fn extract_frame(&self, video: &Path, at: &FrameStamp, output: &Path) -> Result<(), DriftError>;
}

/// Picks the first of `candidates` (case-insensitive) among
/// the date values found in a file.
pub fn select_reading(
    path: &Path,
    values: &BTreeMap<String, TimeValue>,
    candidates: &[String]
) -> Result<Reading, DriftError> {
    let found = candidates.iter()
        .find_map(|c| values.iter().find(|(tag, _)| tag.eq_ignore_ascii_case(c)));

    match found {
        Some((tag, value)) => Ok(Reading {
            tag: tag.to_owned(),
            value: *value,
            date_tags: values.keys().cloned().collect(),
        }),
        None => Err(DriftError::SubjectUnreadable {
            path: path.to_owned(),
            reason: format!("none of the tags {} present", candidates.join(", ")),
        }),
    }
}
