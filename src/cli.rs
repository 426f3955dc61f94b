//! Command line definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{Backend, CorrectionConfig, DuplicatePolicy, LogLevel};

/// Correct drifting camera clocks in photo and video metadata.
#[derive(Parser, Debug)]
#[command(name = "clockdrift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_verbosity(self.verbose, self.quiet)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Correct timestamps using a reference file of OBSERVED,TRUE pairs
    Correct(CorrectArgs),

    /// Interactively record true times for photos into a reference file
    Capture(CaptureArgs),

    /// Save video frames as JPEG images with matching timestamps
    GrabFrame(GrabFrameArgs),

    /// Tell how much to shift a photo given the clock time visible in it
    Adjustment(AdjustmentArgs),

    /// Extract the video clip from a Samsung motion photo
    ExtractMotion(ExtractMotionArgs),
}

/// Reference data duplicate handling.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Fail on duplicate observed times
    #[default]
    Reject,
    /// Keep the first pair for each observed time
    KeepFirst,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::Reject => DuplicatePolicy::Reject,
            OnDuplicate::KeepFirst => DuplicatePolicy::KeepFirst,
        }
    }
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct CorrectArgs {
    /// Reference file, one `OBSERVED,TRUE` pair per line
    pub refs: PathBuf,

    /// Photos and videos to correct
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Show the corrections without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Source tag for the observed time, in order of preference
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Never read the observed time from this tag
    #[arg(long = "exclude-tag", value_name = "TAG")]
    pub exclude_tags: Vec<String>,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value = "0")]
    pub jobs: usize,

    /// Read and write MP4/MOV dates without exiftool
    #[arg(long)]
    pub native_mp4: bool,

    /// Do not keep exiftool's `_original` backup files
    #[arg(long)]
    pub overwrite_original: bool,

    /// What to do with duplicate observed times in the reference file
    #[arg(long, value_enum, default_value = "reject")]
    pub on_duplicate: OnDuplicate,
}

impl CorrectArgs {
    pub fn config(&self) -> CorrectionConfig {
        let backend = match self.native_mp4 {
            true => Backend::NativeMp4,
            false => Backend::Exiftool,
        };
        CorrectionConfig::new()
            .with_source_tags(self.tags.to_owned())
            .with_excluded_tags(self.exclude_tags.to_owned())
            .with_dry_run(self.dry_run)
            .with_jobs(self.jobs)
            .with_backend(backend)
            .with_overwrite_original(self.overwrite_original)
            .with_duplicates(self.on_duplicate.into())
    }
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Reference file to create
    pub output: PathBuf,

    /// Photos showing a clock
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Source tag for the observed time, in order of preference
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

impl CaptureArgs {
    pub fn config(&self) -> CorrectionConfig {
        CorrectionConfig::new().with_source_tags(self.tags.to_owned())
    }
}

#[derive(Args, Debug)]
pub struct GrabFrameArgs {
    /// Video file
    pub video: PathBuf,

    /// Frame positions, `[HH:]MM:SS[.sss]` or `SS[.sss]`
    #[arg(required = true)]
    pub stamps: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AdjustmentArgs {
    /// Photo of a clock
    pub photo: PathBuf,

    /// Time shown on the clock, `HH:MM:SS`
    pub shown: String,
}

#[derive(Args, Debug)]
pub struct ExtractMotionArgs {
    /// Motion photo (JPEG)
    pub image: PathBuf,

    /// Also remove the video from the image
    #[arg(short, long)]
    pub split: bool,
}
