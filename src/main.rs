//! clockdrift: correct drifting camera clocks.
//!
//! ## Usage
//!
//! ```bash
//! clockdrift capture refs.csv clock1.jpg clock2.jpg   # Record reference points
//! clockdrift correct refs.csv *.jpg --dry-run         # Show corrections
//! clockdrift correct refs.csv *.jpg *.mp4 --native-mp4
//! clockdrift grab-frame clip.mp4 1:02 1:05.5          # Timestamped stills
//! clockdrift adjustment clock.jpg 10:15:00            # Shift for one photo
//! clockdrift extract-motion 20200101_101010.jpg --split
//! ```

use std::{io, path::Path, process::ExitCode};

use clap::Parser;
use tracing::{debug, info};

use clockdrift::{
    capture_to_file,
    cli::{AdjustmentArgs, CaptureArgs, Cli, Commands, CorrectArgs, ExtractMotionArgs, GrabFrameArgs},
    extract_motion_photo,
    grab_frames,
    init_logging,
    run_batch,
    tell_adjustment,
    Backend,
    ClockTime,
    DriftError,
    Exiftool,
    Ffmpeg,
    FrameStamp,
    FrameTools,
    MetadataIo,
    ReferenceFile,
    ReferenceSet,
    RoutedMetadata,
    Subject,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` if the command ran but some item failed.
fn run() -> Result<bool, DriftError> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match cli.command {
        Commands::Correct(args) => run_correct(&args),
        Commands::Capture(args) => run_capture(&args),
        Commands::GrabFrame(args) => run_grab_frame(&args),
        Commands::Adjustment(args) => run_adjustment(&args),
        Commands::ExtractMotion(args) => run_extract_motion(&args),
    }
}

fn run_correct(args: &CorrectArgs) -> Result<bool, DriftError> {
    let config = args.config();

    // Bad reference data fails the run before any file is touched.
    let refs = ReferenceSet::build_with(ReferenceFile::load(&args.refs)?, config.duplicates)?;
    info!(points = refs.len(), "loaded reference points");

    let exiftool = Exiftool::new().with_overwrite_original(config.overwrite_original);
    let needs_exiftool = match config.backend {
        Backend::Exiftool => true,
        Backend::NativeMp4 => args.files.iter()
            .any(|f| !RoutedMetadata::<Exiftool>::is_native(f)),
    };
    if needs_exiftool {
        exiftool.check()?;
    }

    let routed;
    let io: &dyn MetadataIo = match config.backend {
        Backend::Exiftool => &exiftool,
        Backend::NativeMp4 => {
            routed = RoutedMetadata::new(exiftool.to_owned());
            &routed
        }
    };

    let subjects: Vec<Subject> = args.files.iter().map(|f| Subject::new(f)).collect();
    let report = run_batch(&subjects, io, &refs, &config)?;

    for (_, result) in report.results.iter() {
        match result {
            Ok(outcome) => println!("{outcome}"),
            Err(err) => eprintln!("{err}"),
        }
    }
    debug!(
        total = report.len(),
        failed = report.failures().count(),
        "batch done"
    );

    Ok(!report.has_failures())
}

fn run_capture(args: &CaptureArgs) -> Result<bool, DriftError> {
    let config = args.config();
    let exiftool = Exiftool::new();
    exiftool.check()?;

    let subjects: Vec<Subject> = args.files.iter().map(|f| Subject::new(f)).collect();
    let refs = capture_to_file(
        &args.output,
        &subjects,
        &exiftool,
        &config,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )?;

    println!("Saved {} reference points to {}", refs.len(), args.output.display());
    Ok(true)
}

fn run_grab_frame(args: &GrabFrameArgs) -> Result<bool, DriftError> {
    check_exists(&args.video, "Video")?;

    let mut ok = true;
    let mut stamps = Vec::new();
    for stamp in args.stamps.iter() {
        match FrameStamp::parse(stamp) {
            Ok(s) => stamps.push(s),
            Err(err) => {
                eprintln!("{err}");
                ok = false;
            }
        }
    }

    let ffmpeg = Ffmpeg::new();
    ffmpeg.check()?;
    let exiftool = Exiftool::new().with_overwrite_original(true);
    exiftool.check()?;

    let tools = FrameTools {
        extractor: &ffmpeg,
        container: &exiftool,
        metadata: &exiftool,
    };
    for outcome in grab_frames(&args.video, &stamps, &tools) {
        println!("{outcome}");
        ok &= outcome.result.is_ok();
    }

    Ok(ok)
}

fn run_adjustment(args: &AdjustmentArgs) -> Result<bool, DriftError> {
    let shown = ClockTime::parse(&args.shown)?;
    check_exists(&args.photo, "Photo")?;

    let exiftool = Exiftool::new();
    exiftool.check()?;

    let adjustment = tell_adjustment(&args.photo, shown, &exiftool)?;
    println!("{adjustment}");
    Ok(true)
}

fn run_extract_motion(args: &ExtractMotionArgs) -> Result<bool, DriftError> {
    let exiftool = Exiftool::new().with_overwrite_original(true);
    exiftool.check()?;

    let outcome = extract_motion_photo(&args.image, &exiftool, args.split)?;
    println!("Saved embedded video as {}", outcome.video.display());
    if !outcome.tags_copied {
        eprintln!("Could not copy metadata to {}", outcome.video.display());
    }
    if let Some(len) = outcome.truncated_to {
        println!("Removed embedded video from {} ({len} bytes left)", args.image.display());
    }
    Ok(true)
}

fn check_exists(path: &Path, what: &str) -> Result<(), DriftError> {
    match path.is_file() {
        true => Ok(()),
        false => Err(DriftError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{what} file {} does not exist", path.display()),
        ))),
    }
}
