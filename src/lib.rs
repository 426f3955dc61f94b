//! Correct drifting device clocks in photo and video metadata.
//!
//! A camera clock that runs fast or slow is corrected against a set of
//! reference points, pairs of (observed, true) timestamps, e.g. photos of a
//! clock with the time read off the picture. Timestamps between two reference
//! points are corrected by linear interpolation, timestamps outside the
//! reference range by extrapolating the nearest segment.
//!
//! Timestamps are read and written through exiftool, or natively for
//! QuickTime/MP4 files. Companion tools grab timestamped video frames, tell
//! the shift needed for a single photo and extract motion photo videos.
//!
//! ```rs
//! use clockdrift::{ReferenceFile, ReferenceSet, TimeValue};
//! use std::path::Path;
//!
//! fn main() -> Result<(), clockdrift::DriftError> {
//!     let refs = ReferenceSet::build(ReferenceFile::load(Path::new("refs.csv"))?)?;
//!
//!     let observed = TimeValue::parse("2020-05-01 13:14:15")?;
//!     let result = refs.correct(observed)?;
//!     println!("{} ({:+} s)", result.corrected, result.delta_seconds);
//!
//!     Ok(())
//! }
//! ```

pub mod consts;
pub mod errors;
pub(crate) mod support;
pub mod time_value;
pub mod reference;
pub mod correction;
pub mod config;
pub mod metadata;
pub mod mp4;
pub mod subject;
pub mod batch;
pub mod frame;
pub mod adjust;
pub mod motion;
pub mod capture;
pub mod logging;
pub mod cli;
pub mod tests;

pub use time_value::TimeValue;
pub use errors::DriftError;
pub use reference::{DuplicatePolicy, ReferenceFile, ReferencePoint, ReferenceSet};
pub use correction::{CorrectionResult, DriftCorrector};
pub use config::{Backend, CorrectionConfig, TagProfile};
pub use metadata::{
    ContainerIo,
    Exiftool,
    Ffmpeg,
    FrameExtractor,
    MetadataIo,
    Reading,
    RoutedMetadata,
};
pub use mp4::{AtomDates, AtomHeader, DateAtom, DateAtomKind, Mp4Metadata};
pub use subject::{Subject, SubjectOutcome};
pub use batch::{run_batch, BatchReport};
pub use frame::{grab_frames, FrameNames, FrameOutcome, FrameStamp, FrameTools};
pub use adjust::{tell_adjustment, Adjustment, ClockTime};
pub use motion::{extract_motion_photo, is_mp4, samsung_trailer_offset, MotionPhotoOutcome};
pub use capture::{capture_references, capture_to_file};
pub use logging::{init_logging, LogLevel};
