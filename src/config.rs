//! Options for a correction run.
//!
//! Behaviour that differed between variants of the tool
//! (which tags to read, backend, dry run) is expressed here
//! rather than as separate code paths.

use crate::{
    consts::{PHOTO_SOURCE_TAGS, VIDEO_SOURCE_TAGS},
    DuplicatePolicy,
};

/// Preset lists of source tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagProfile {
    /// `DateTimeOriginal`, then `CreateDate`.
    #[default]
    Photo,
    /// `CreateDate`, `MediaCreateDate`, then `TrackCreateDate`.
    Video,
}

impl TagProfile {
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::Photo => PHOTO_SOURCE_TAGS.iter().map(|t| t.to_string()).collect(),
            Self::Video => VIDEO_SOURCE_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Metadata backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Exiftool for every file.
    #[default]
    Exiftool,
    /// Native QuickTime/MP4 reader and writer for
    /// `.mp4`, `.mov`, `.m4v`, exiftool for everything else.
    NativeMp4,
}

/// Correction run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionConfig {
    /// Candidate tags for the observed time, in order of preference.
    pub source_tags: Vec<String>,
    /// Tags never used as the source of the observed time.
    /// Still updated on write if present.
    pub excluded_tags: Vec<String>,
    /// Compute and report only, never write.
    pub dry_run: bool,
    /// Worker threads. 0 lets rayon decide.
    pub jobs: usize,
    /// Metadata backend.
    pub backend: Backend,
    /// Overwrite files in place instead of letting exiftool
    /// keep an `_original` backup.
    pub overwrite_original: bool,
    /// Handling of duplicate observed times in reference data.
    pub duplicates: DuplicatePolicy,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            source_tags: TagProfile::default().tags(),
            excluded_tags: Vec::new(),
            dry_run: false,
            jobs: 0,
            backend: Backend::default(),
            overwrite_original: false,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl CorrectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(mut self, profile: TagProfile) -> Self {
        self.source_tags = profile.tags();
        self
    }

    /// Replaces candidate source tags. Ignored if `tags` is empty.
    #[must_use]
    pub fn with_source_tags(mut self, tags: Vec<String>) -> Self {
        if !tags.is_empty() {
            self.source_tags = tags;
        }
        self
    }

    #[must_use]
    pub fn with_excluded_tags(mut self, tags: Vec<String>) -> Self {
        self.excluded_tags = tags;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_overwrite_original(mut self, overwrite: bool) -> Self {
        self.overwrite_original = overwrite;
        self
    }

    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Source tags minus excluded ones (case-insensitive).
    pub fn candidate_tags(&self) -> Vec<String> {
        self.source_tags
            .iter()
            .filter(|t| !self.excluded_tags.iter().any(|x| x.eq_ignore_ascii_case(t)))
            .cloned()
            .collect()
    }
}
