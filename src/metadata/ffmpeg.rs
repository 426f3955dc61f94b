//! FFmpeg backed frame extraction.

use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::{debug, trace};

use crate::{DriftError, FrameExtractor, FrameStamp};

const TOOL: &str = "ffmpeg";

/// Runs the `ffmpeg` program.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self { program: PathBuf::from(TOOL) }
    }
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: &Path) -> Self {
        self.program = program.to_owned();
        self
    }

    /// Checks that ffmpeg can be run.
    pub fn check(&self) -> Result<(), DriftError> {
        let status = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => Ok(()),
            _ => Err(DriftError::ToolMissing(TOOL.to_owned())),
        }
    }

    /// Arguments for saving the single frame at `at` to `output`.
    ///
    /// Seeks accurately rather than to the nearest key frame,
    /// logging at warning level where failures to write the image show up.
    pub fn frame_args(video: &Path, at: &FrameStamp, output: &Path) -> Vec<OsString> {
        vec![
            "-ss".into(), at.sec_format().into(),
            "-accurate_seek".into(),
            "-i".into(), video.into(),
            "-frames:v".into(), "1".into(),
            "-loglevel".into(), "24".into(),
            output.into(),
        ]
    }
}

impl FrameExtractor for Ffmpeg {
    fn extract_frame(&self, video: &Path, at: &FrameStamp, output: &Path) -> Result<(), DriftError> {
        let args = Self::frame_args(video, at, output);
        trace!(?args, "running ffmpeg");
        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => DriftError::ToolMissing(TOOL.to_owned()),
                _ => DriftError::Io(err),
            })?;

        // ffmpeg may exit with 0 without writing anything,
        // the output file is the only reliable sign of success.
        match output.exists() {
            true => {
                debug!(output = %output.display(), stamp = at.original(), "frame saved");
                Ok(())
            },
            false => Err(DriftError::ToolFailed {
                tool: TOOL.to_owned(),
                path: video.to_owned(),
                message: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            }),
        }
    }
}
