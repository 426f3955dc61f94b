//! Reference file. One sample per line:
//!
//! ```ignore
//! 2019-07-14 12:30:05, 2019-07-14 12:31:40
//! ^ observed (device)  ^ true time
//! ```
//!
//! Blank lines are skipped. Any other line that does not parse
//! fails the whole load.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::debug;

use crate::{DriftError, ReferencePoint, TimeValue};

/// Load and store reference points as text.
pub struct ReferenceFile;

impl ReferenceFile {
    /// Read reference points from file at `path`.
    pub fn load(path: &Path) -> Result<Vec<ReferencePoint>, DriftError> {
        let file = File::open(path)?;
        let points = Self::parse(BufReader::new(file))?;
        debug!(path = %path.display(), points = points.len(), "loaded reference file");
        Ok(points)
    }

    /// Read reference points from any buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Vec<ReferencePoint>, DriftError> {
        let mut points = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            points.push(Self::parse_record(&line, i + 1)?);
        }
        Ok(points)
    }

    /// Parse a single `OBSERVED,TRUE` record.
    /// `line` is only used for error reporting.
    pub fn parse_record(record: &str, line: usize) -> Result<ReferencePoint, DriftError> {
        let malformed = |reason: String| DriftError::MalformedRecord { line, reason };

        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() != 2 {
            return Err(malformed(format!("expected 2 fields, found {}", fields.len())))
        }
        let observed = TimeValue::parse(fields[0]).map_err(|e| malformed(e.to_string()))?;
        let truth = TimeValue::parse(fields[1]).map_err(|e| malformed(e.to_string()))?;

        Ok(ReferencePoint::new(observed, truth))
    }

    /// Write reference points to `path`, sorted by observed time.
    pub fn store(path: &Path, points: &[ReferencePoint]) -> Result<(), DriftError> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write(&mut writer, points)?;
        writer.flush()?;
        debug!(path = %path.display(), points = points.len(), "stored reference file");
        Ok(())
    }

    /// Write reference points to any writer, sorted by observed time.
    pub fn write<W: Write>(writer: &mut W, points: &[ReferencePoint]) -> Result<(), DriftError> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.observed.cmp(&b.observed));
        for point in sorted.iter() {
            writeln!(writer, "{},{}", point.observed.format()?, point.truth.format()?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_whitespace_and_blank_lines() {
        let text = "2020-01-01 10:00:00 , 2020-01-01 10:00:30\n\n  \n2020-01-02 10:00:00,2020-01-02 10:01:00\n";
        let points = ReferenceFile::parse(text.as_bytes()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].drift(), 30.0);
        assert_eq!(points[1].drift(), 60.0);
    }

    #[test]
    fn malformed_line_aborts_with_line_number() {
        let text = "2020-01-01 10:00:00,2020-01-01 10:00:30\n\n2020-01-02 10:00:00;2020-01-02 10:01:00\n";
        match ReferenceFile::parse(text.as_bytes()) {
            Err(DriftError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let res = ReferenceFile::parse_record("2020-13-01 10:00:00,2020-01-01 10:00:30", 7);
        assert!(matches!(res, Err(DriftError::MalformedRecord { line: 7, .. })));
    }

    #[test]
    fn writes_sorted() {
        let late = ReferencePoint::new(
            TimeValue::parse("2020-01-02 10:00:00").unwrap(),
            TimeValue::parse("2020-01-02 10:01:00").unwrap(),
        );
        let early = ReferencePoint::new(
            TimeValue::parse("2020-01-01 10:00:00").unwrap(),
            TimeValue::parse("2020-01-01 10:00:30").unwrap(),
        );
        let mut out = Vec::new();
        ReferenceFile::write(&mut out, &[late, early]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2020-01-01 10:00:00,2020-01-01 10:00:30\n2020-01-02 10:00:00,2020-01-02 10:01:00\n"
        );
    }

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refs.csv");
        let points = vec![
            ReferencePoint::from((1_600_000_000, 1_600_000_020)),
            ReferencePoint::from((1_500_000_000, 1_500_000_010)),
        ];
        ReferenceFile::store(&path, &points).unwrap();
        let loaded = ReferenceFile::load(&path).unwrap();
        assert_eq!(loaded, vec![points[1], points[0]]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = ReferenceFile::load(Path::new("/nonexistent/refs.csv"));
        assert!(matches!(res, Err(DriftError::Io(_))));
    }
}
