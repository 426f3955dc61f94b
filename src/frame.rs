//! Save single frames from a video as JPEG images whose
//! timestamp matches the moment the frame was taken.
//!
//! Frame positions are given as `[HH:]MM:SS[.sss]` or `SS[.sss]`.
//! Each image gets the video's metadata, with every date shifted
//! by the frame position rounded to whole seconds.

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::debug;

use crate::{
    support::{base_path, with_suffix},
    ContainerIo,
    DriftError,
    FrameExtractor,
    MetadataIo,
    TimeValue,
};

/// Position in a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStamp {
    original: String,
    /// Whole seconds.
    seconds: u64,
    /// Subsecond digits including the leading `.`, kept as text
    /// so they are passed on exactly as given.
    subsec: Option<String>,
}

impl FrameStamp {
    /// Parses `[HH:]MM:SS[.sss]` or `SS[.sss]`, one or more digits per field.
    ///
    /// With two fields, the first is minutes if it has at most two digits,
    /// hours otherwise. Minutes must be below 60, as must seconds
    /// whenever hours or minutes are given.
    pub fn parse(stamp: &str) -> Result<Self, DriftError> {
        let invalid = |reason: &str| DriftError::InvalidFrameStamp {
            stamp: stamp.to_owned(),
            reason: reason.to_owned(),
        };

        let (whole, subsec) = match stamp.split_once('.') {
            Some((whole, frac)) => {
                if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("unrecognized time format"))
                }
                (whole, Some(format!(".{frac}")))
            },
            None => (stamp, None),
        };

        let fields: Vec<&str> = whole.split(':').collect();
        if fields.iter().any(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit())) {
            return Err(invalid("unrecognized time format"))
        }
        let num = |s: &str| s.parse::<u64>().map_err(|_| invalid("number out of range"));

        let (h, m, s) = match fields.as_slice() {
            [s] => (0, 0, num(s)?),
            [m, s] if m.len() <= 2 => (0, num(m)?, num(s)?),
            [h, s] => (num(h)?, 0, num(s)?),
            [h, m, s] if m.len() <= 2 => (num(h)?, num(m)?, num(s)?),
            _ => return Err(invalid("unrecognized time format")),
        };

        if m > 59 {
            return Err(invalid("minutes notation wrong"))
        }
        if (h > 0 || m > 0) && s > 59 {
            return Err(invalid("seconds notation wrong"))
        }

        Ok(Self {
            original: stamp.to_owned(),
            seconds: s + m * 60 + h * 60 * 60,
            subsec,
        })
    }

    /// The stamp as given.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// `SS.sss`, e.g. `3723.250` for `1:02:03.250`.
    pub fn sec_format(&self) -> String {
        format!("{}{}", self.seconds, self.subsec.as_deref().unwrap_or(""))
    }

    /// Whole seconds, rounding subseconds of .5 and above up.
    pub fn rounded_seconds(&self) -> u64 {
        let frac: f64 = self.subsec.as_deref()
            .and_then(|s| format!("0{s}").parse().ok())
            .unwrap_or(0.0);
        match frac >= 0.5 {
            true => self.seconds + 1,
            false => self.seconds,
        }
    }

    /// `HH:MM:SS` of `rounded_seconds()`.
    pub fn hms_format(&self) -> String {
        let secs = self.rounded_seconds();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

impl FromStr for FrameStamp {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FrameStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Unique `<video base>_NNN.jpg` names next to a video.
#[derive(Debug)]
pub struct FrameNames {
    base: PathBuf,
    seq: usize,
}

impl FrameNames {
    pub fn new(video: &Path) -> Self {
        Self { base: base_path(video), seq: 0 }
    }

    /// First name at or after the current sequence number
    /// that does not exist yet. Calling again without creating
    /// the file returns the same name.
    pub fn next_free(&mut self) -> PathBuf {
        loop {
            let candidate = with_suffix(&self.base, &format!("_{:03}.jpg", self.seq));
            if !candidate.exists() {
                return candidate
            }
            self.seq += 1;
        }
    }
}

/// Result of grabbing one frame.
#[derive(Debug)]
pub struct FrameOutcome {
    pub stamp: FrameStamp,
    pub path: PathBuf,
    /// Whether the image was written. Tag copy or date shift
    /// may still have failed, see `result`.
    pub saved: bool,
    pub result: Result<(), DriftError>,
}

impl fmt::Display for FrameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.result, self.saved) {
            (Ok(()), _) => write!(f, "Time stamp \"{}\" is saved as \"{}\"",
                self.stamp, self.path.display()),
            (Err(err), true) => write!(f, "Time stamp \"{}\" is saved as \"{}\", but: {err}",
                self.stamp, self.path.display()),
            (Err(err), false) => write!(f, "The operation failed for time stamp \"{}\": {err}",
                self.stamp),
        }
    }
}

/// The tools a frame grab needs.
pub struct FrameTools<'a> {
    pub extractor: &'a dyn FrameExtractor,
    pub container: &'a dyn ContainerIo,
    pub metadata: &'a dyn MetadataIo,
}

/// Saves a frame for every stamp in `stamps`.
/// A failing stamp is reported and the rest continue.
pub fn grab_frames(video: &Path, stamps: &[FrameStamp], tools: &FrameTools) -> Vec<FrameOutcome> {
    let mut names = FrameNames::new(video);
    stamps.iter()
        .map(|stamp| {
            let path = names.next_free();
            let (saved, result) = match tools.extractor.extract_frame(video, stamp, &path) {
                Ok(()) => (true, tag_frame(video, &path, stamp, tools)),
                Err(err) => (false, Err(err)),
            };
            if let Err(err) = &result {
                debug!(stamp = stamp.original(), %err, "frame grab failed");
            }
            FrameOutcome { stamp: stamp.to_owned(), path, saved, result }
        })
        .collect()
}

/// Copies the video's metadata onto the frame image,
/// then moves each of its dates forward by the frame position.
fn tag_frame(video: &Path, image: &Path, stamp: &FrameStamp, tools: &FrameTools) -> Result<(), DriftError> {
    tools.container.copy_tags(video, image)?;

    let dates = tools.metadata.read_dates(image)?;
    if dates.is_empty() {
        return Err(DriftError::SubjectUnreadable {
            path: image.to_owned(),
            reason: "no date tags present".to_owned(),
        })
    }

    // One write per distinct value.
    let mut groups: BTreeMap<TimeValue, Vec<String>> = BTreeMap::new();
    for (tag, value) in dates.into_iter() {
        groups.entry(value).or_default().push(tag);
    }
    let offset = stamp.rounded_seconds() as f64;
    for (value, tags) in groups.iter() {
        tools.metadata.write_timestamp(image, tags, value.shift(offset)?)?;
    }

    debug!(image = %image.display(), by = %stamp.hms_format(), values = groups.len(), "shifted frame dates");
    Ok(())
}
