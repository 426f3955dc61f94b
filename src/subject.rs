//! A single photo or video whose timestamp gets corrected.
//!
//! Reading, correcting and writing are separate steps passing explicit
//! values along, so a write can only ever use the correction just computed.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    CorrectionConfig,
    CorrectionResult,
    DriftCorrector,
    DriftError,
    MetadataIo,
    Reading,
    ReferenceSet,
};

/// File whose timestamp is read, corrected and optionally written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    path: PathBuf,
}

/// Result of processing one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOutcome {
    pub path: PathBuf,
    /// Observed time as read.
    pub reading: Reading,
    pub correction: CorrectionResult,
    /// Tags the correction was (or, in a dry run, would be) written to.
    pub tags: Vec<String>,
    /// `false` for dry runs.
    pub written: bool,
}

impl fmt::Display for SubjectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.written {
            true => write!(f, "Shifted {} by {:+.0} seconds",
                self.path.display(), self.correction.delta_seconds),
            false => write!(f, "{} will be shifted by {:+.0} seconds",
                self.path.display(), self.correction.delta_seconds),
        }
    }
}

impl Subject {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_owned() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the observed time using the candidate tags in `config`.
    /// Any failure is reported as `DriftError::SubjectUnreadable`.
    pub fn read(&self, io: &dyn MetadataIo, config: &CorrectionConfig) -> Result<Reading, DriftError> {
        if !self.path.is_file() {
            return Err(self.unreadable("file does not exist"))
        }
        match io.read_timestamp(&self.path, &config.candidate_tags()) {
            Ok(reading) => Ok(reading),
            Err(err @ DriftError::SubjectUnreadable { .. }) => Err(err),
            Err(err) => Err(self.unreadable(&err.to_string())),
        }
    }

    /// Reads, corrects and, unless `config.dry_run`, writes the corrected time
    /// back to every date tag the file carries.
    pub fn correct(
        &self,
        io: &dyn MetadataIo,
        refs: &ReferenceSet,
        config: &CorrectionConfig
    ) -> Result<SubjectOutcome, DriftError> {
        let reading = self.read(io, config)?;
        let correction = DriftCorrector::correct(reading.value, refs)?;
        let tags = reading.write_tags();

        debug!(
            path = %self.path.display(),
            tag = %reading.tag,
            observed = %reading.value,
            corrected = %correction.corrected,
            delta = correction.delta_seconds,
            "computed correction"
        );

        let written = match config.dry_run {
            true => false,
            false => {
                io.write_timestamp(&self.path, &tags, correction.corrected)
                    .map_err(|err| DriftError::SubjectWriteFailed {
                        path: self.path.to_owned(),
                        reason: err.to_string(),
                    })?;
                info!(path = %self.path.display(), delta = correction.delta_seconds, "timestamp written");
                true
            },
        };

        Ok(SubjectOutcome {
            path: self.path.to_owned(),
            reading,
            correction,
            tags,
            written,
        })
    }

    fn unreadable(&self, reason: &str) -> DriftError {
        DriftError::SubjectUnreadable {
            path: self.path.to_owned(),
            reason: reason.to_owned(),
        }
    }
}

impl From<&Path> for Subject {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for Subject {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}
