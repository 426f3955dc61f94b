//! Exiftool backed metadata access.
//!
//! See: <https://exiftool.org/exiftool_pod.html>

use std::{
    collections::BTreeMap,
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use tracing::{debug, trace};

use crate::{
    consts::{DATE_TAGS, EXIFTOOL_DATE_FORMAT, EXIFTOOL_WRITE_FORMAT},
    metadata::select_reading,
    ContainerIo,
    DriftError,
    MetadataIo,
    Reading,
    TimeValue,
};

const TOOL: &str = "exiftool";

/// Runs the `exiftool` program.
#[derive(Debug, Clone)]
pub struct Exiftool {
    program: PathBuf,
    overwrite_original: bool,
}

impl Default for Exiftool {
    fn default() -> Self {
        Self {
            program: PathBuf::from(TOOL),
            overwrite_original: false,
        }
    }
}

impl Exiftool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific exiftool executable.
    pub fn with_program(mut self, program: &Path) -> Self {
        self.program = program.to_owned();
        self
    }

    /// Write in place instead of keeping an `_original` backup.
    pub fn with_overwrite_original(mut self, overwrite: bool) -> Self {
        self.overwrite_original = overwrite;
        self
    }

    /// Checks that exiftool can be run, returns its version.
    pub fn check(&self) -> Result<String, DriftError> {
        let output = self.run(&["-ver".into()], Path::new(""))?;
        let version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        debug!(%version, "found exiftool");
        Ok(version)
    }

    /// Arguments for reading `candidates` plus all known date tags
    /// with dates formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn read_args(path: &Path, candidates: &[String]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-s".into(), "-d".into(), EXIFTOOL_DATE_FORMAT.into()];
        let mut tags: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
        for tag in DATE_TAGS {
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag);
            }
        }
        args.extend(tags.iter().map(|t| OsString::from(format!("-{t}"))));
        args.push(path.into());
        args
    }

    /// Arguments for writing `value` to every tag in `tags`.
    pub fn write_args(
        &self,
        path: &Path,
        tags: &[String],
        value: TimeValue
    ) -> Result<Vec<OsString>, DriftError> {
        let formatted = value.to_datetime()?.format(EXIFTOOL_WRITE_FORMAT)?;
        let mut args: Vec<OsString> = Vec::new();
        if self.overwrite_original {
            args.push("-overwrite_original".into());
        }
        args.extend(tags.iter().map(|t| OsString::from(format!("-{t}={formatted}"))));
        args.push(path.into());
        Ok(args)
    }

    /// Runs exiftool with `args`. `path` is the file operated on,
    /// only used for error reporting.
    fn run(&self, args: &[OsString], path: &Path) -> Result<Output, DriftError> {
        trace!(program = %self.program.display(), ?args, "running");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => DriftError::ToolMissing(TOOL.to_owned()),
                _ => DriftError::Io(err),
            })?;

        match output.status.success() {
            true => Ok(output),
            false => Err(DriftError::ToolFailed {
                tool: TOOL.to_owned(),
                path: path.to_owned(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            }),
        }
    }
}

/// Parses exiftool's short (`-s`/`-S`) output,
/// `TagName : value` per line, into a map.
/// Only the first colon separates tag from value.
pub fn parse_tag_listing(stdout: &str) -> BTreeMap<String, String> {
    stdout.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(tag, value)| (tag.trim().to_owned(), value.trim().to_owned()))
        .filter(|(tag, _)| !tag.is_empty() && !tag.contains(char::is_whitespace))
        .collect()
}

impl Exiftool {
    /// Date values of `candidates` and all known date tags present.
    fn values(&self, path: &Path, candidates: &[String]) -> Result<BTreeMap<String, TimeValue>, DriftError> {
        let output = self.run(&Self::read_args(path, candidates), path)?;
        let listing = parse_tag_listing(&String::from_utf8_lossy(&output.stdout));

        // Unset dates come back unformatted, e.g. "0000:00:00 00:00:00",
        // and are not counted as present.
        Ok(listing.into_iter()
            .filter_map(|(tag, value)| TimeValue::parse(&value).ok().map(|t| (tag, t)))
            .collect())
    }
}

impl MetadataIo for Exiftool {
    fn read_timestamp(&self, path: &Path, candidates: &[String]) -> Result<Reading, DriftError> {
        let values = self.values(path, candidates)?;
        select_reading(path, &values, candidates)
    }

    fn read_dates(&self, path: &Path) -> Result<BTreeMap<String, TimeValue>, DriftError> {
        self.values(path, &[])
    }

    fn write_timestamp(&self, path: &Path, tags: &[String], value: TimeValue) -> Result<(), DriftError> {
        let output = self.run(&self.write_args(path, tags, value)?, path)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.contains("1 image files updated") {
            true => Ok(()),
            false => Err(DriftError::ToolFailed {
                tool: TOOL.to_owned(),
                path: path.to_owned(),
                message: format!(
                    "{} {}",
                    stdout.trim(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ).trim().to_owned(),
            }),
        }
    }
}

impl ContainerIo for Exiftool {
    fn copy_tags(&self, from: &Path, to: &Path) -> Result<(), DriftError> {
        let args: Vec<OsString> = vec![
            "-q".into(),
            "-overwrite_original".into(),
            "-tagsfromfile".into(),
            from.into(),
            to.into(),
        ];
        self.run(&args, to)?;
        Ok(())
    }

    fn embedded_video_type(&self, path: &Path) -> Result<Option<String>, DriftError> {
        let output = self.run(&["-S".into(), "-EmbeddedVideoType".into(), path.into()], path)?;
        let listing = parse_tag_listing(&String::from_utf8_lossy(&output.stdout));
        Ok(listing.get("EmbeddedVideoType").cloned())
    }

    fn embedded_video(&self, path: &Path) -> Result<Vec<u8>, DriftError> {
        let output = self.run(&["-b".into(), "-EmbeddedVideoFile".into(), path.into()], path)?;
        Ok(output.stdout)
    }

    fn trailer_listing(&self, path: &Path) -> Result<String, DriftError> {
        let output = self.run(&["-v1".into(), path.into()], path)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
