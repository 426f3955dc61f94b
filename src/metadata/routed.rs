use std::{collections::BTreeMap, path::Path};

use crate::{consts::MP4_EXTENSIONS, DriftError, MetadataIo, Mp4Metadata, Reading, TimeValue};

/// Native MP4 access for QuickTime/MP4 files,
/// a fallback (usually exiftool) for everything else.
#[derive(Debug, Clone)]
pub struct RoutedMetadata<F: MetadataIo> {
    native: Mp4Metadata,
    fallback: F,
}

impl<F: MetadataIo> RoutedMetadata<F> {
    pub fn new(fallback: F) -> Self {
        Self { native: Mp4Metadata::new(), fallback }
    }

    /// Whether `path` is handled natively, judging by extension.
    pub fn is_native(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| MP4_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn route(&self, path: &Path) -> &dyn MetadataIo {
        match Self::is_native(path) {
            true => &self.native,
            false => &self.fallback,
        }
    }
}

impl<F: MetadataIo> MetadataIo for RoutedMetadata<F> {
    fn read_timestamp(&self, path: &Path, candidates: &[String]) -> Result<Reading, DriftError> {
        self.route(path).read_timestamp(path, candidates)
    }

    fn read_dates(&self, path: &Path) -> Result<BTreeMap<String, TimeValue>, DriftError> {
        self.route(path).read_dates(path)
    }

    fn write_timestamp(&self, path: &Path, tags: &[String], value: TimeValue) -> Result<(), DriftError> {
        self.route(path).write_timestamp(path, tags, value)
    }
}
