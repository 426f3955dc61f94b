//! Interactive capture of reference points.
//!
//! For each photo the recorded time is shown and the user types the true
//! time, e.g. read off a clock visible in the photo. An empty answer skips
//! the photo, end of input stops capturing.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    CorrectionConfig,
    DriftError,
    MetadataIo,
    ReferenceFile,
    ReferencePoint,
    ReferenceSet,
    Subject,
    TimeValue,
};

/// Prompts on `output` and reads answers from `input` for every subject.
/// Unreadable subjects are reported and skipped.
pub fn capture_references<R: BufRead, W: Write>(
    subjects: &[Subject],
    io: &dyn MetadataIo,
    config: &CorrectionConfig,
    input: &mut R,
    output: &mut W
) -> Result<Vec<ReferencePoint>, DriftError> {
    let mut points = Vec::new();

    'subjects: for subject in subjects.iter() {
        let reading = match subject.read(io, config) {
            Ok(r) => r,
            Err(err) => {
                debug!(%err, "skipping subject");
                writeln!(output, "{err}")?;
                continue;
            },
        };

        loop {
            write!(
                output,
                "{} was recorded at {}. True time (YYYY-MM-DD HH:MM:SS, empty to skip): ",
                subject.path().display(),
                reading.value
            )?;
            output.flush()?;

            let mut answer = String::new();
            if input.read_line(&mut answer)? == 0 {
                break 'subjects;
            }
            let answer = answer.trim();
            if answer.is_empty() {
                break;
            }
            match TimeValue::parse(answer) {
                Ok(truth) => {
                    points.push(ReferencePoint::new(reading.value, truth));
                    break;
                },
                Err(err) => writeln!(output, "{err}, try again.")?,
            }
        }
    }

    Ok(points)
}

/// Captures reference points and stores them at `path`, sorted by
/// observed time. The points must form a valid `ReferenceSet`.
pub fn capture_to_file<R: BufRead, W: Write>(
    path: &Path,
    subjects: &[Subject],
    io: &dyn MetadataIo,
    config: &CorrectionConfig,
    input: &mut R,
    output: &mut W
) -> Result<ReferenceSet, DriftError> {
    let points = capture_references(subjects, io, config, input, output)?;
    let refs = ReferenceSet::build_with(points, config.duplicates)?;
    ReferenceFile::store(path, refs.points())?;
    Ok(refs)
}
