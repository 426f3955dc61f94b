//! Drift correction errors.
//!
//! Errors raised while building reference data are fatal for a run.
//! `SubjectUnreadable` and `SubjectWriteFailed` concern a single file
//! and are reported without stopping the batch.

use std::path::PathBuf;

use thiserror::Error;

/// Various reference data, metadata and tool related errors.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Fewer than two usable reference points.
    #[error("At least 2 reference points are required, found {found}.")]
    InsufficientSamples { found: usize },
    /// Two reference points share the same observed time,
    /// leaving the slope between them undefined.
    #[error("Duplicate observed time {observed} in reference data.")]
    DuplicateObservedTime { observed: String },
    /// Reference file line could not be parsed.
    /// `line` is 1-based.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    /// Segment with zero observed span.
    /// Only reachable if a `ReferenceSet` invariant was broken.
    #[error("Degenerate segment at observed time {observed}.")]
    DegenerateSegment { observed: f64 },
    /// NaN or infinite time value.
    #[error("Time value must be finite, got {0}.")]
    NonFiniteTime(f64),
    /// No usable timestamp could be extracted from a subject file.
    #[error("Could not read a timestamp from '{}': {reason}", .path.display())]
    SubjectUnreadable { path: PathBuf, reason: String },
    /// Corrected timestamp could not be written back.
    #[error("Could not write timestamp to '{}': {reason}", .path.display())]
    SubjectWriteFailed { path: PathBuf, reason: String },
    /// External program not installed or not runnable.
    #[error("The required program '{0}' is missing or can not be run.")]
    ToolMissing(String),
    /// External program ran but reported failure.
    #[error("{tool} failed on '{}': {message}", .path.display())]
    ToolFailed {
        tool: String,
        path: PathBuf,
        message: String,
    },
    /// Frame time stamp not in `[HH:]MM:SS[.sss]` or `SS[.sss]` format.
    #[error("Invalid frame time stamp '{stamp}': {reason}")]
    InvalidFrameStamp { stamp: String, reason: String },
    /// Clock time not in `HH:MM:SS` format.
    #[error("Invalid clock time '{0}', expected HH:MM:SS.")]
    InvalidClockTime(String),
    /// Image does not carry a Samsung motion photo video.
    #[error("'{}' is probably not a Samsung Motion Photo.", .0.display())]
    NotMotionPhoto(PathBuf),
    /// Samsung trailer holds more than the embedded video.
    #[error("Unknown content in Samsung trailer: '{0}'. Embedded video can not be removed.")]
    UnknownTrailerContent(String),
    /// Samsung trailer offset could not be located.
    #[error("Could not locate the Samsung trailer offset.")]
    MissingTrailerOffset,
    /// No such atom.
    #[error("No such atom {0}.")]
    NoSuchAtom(String),
    /// Atom size that points outside the file or below header size.
    #[error("Unexpected MP4 atom size of {len} bytes @ offset {offset}.")]
    UnexpectedAtomSize { len: u64, offset: u64 },
    /// Calendar value could not be parsed.
    #[error("Could not parse '{value}' as date time: {source}")]
    TimeParse {
        value: String,
        #[source]
        source: time::error::Parse,
    },
    /// Calendar value could not be formatted.
    #[error("Could not format date time: {0}")]
    TimeFormat(#[from] time::error::Format),
    /// Seconds outside the representable calendar range.
    #[error("Time value {0} is outside the supported calendar range.")]
    TimeRange(f64),
    /// Converted `binrw` error.
    #[error("{0}")]
    BinRead(#[from] binrw::Error),
    /// Worker pool could not be started.
    #[error("Could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts DriftError to std::io::Error
impl From<DriftError> for std::io::Error {
    fn from(err: DriftError) -> Self {
        std::io::Error::other(err)
    }
}
