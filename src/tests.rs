#[cfg(test)]
mod tests {
    use crate::{
        capture_references,
        capture_to_file,
        extract_motion_photo,
        grab_frames,
        metadata::select_reading,
        mp4::dates::time_value_to_mp4,
        run_batch,
        tell_adjustment,
        ClockTime,
        ContainerIo,
        CorrectionConfig,
        DriftError,
        FrameExtractor,
        FrameStamp,
        FrameTools,
        MetadataIo,
        Mp4Metadata,
        Reading,
        ReferenceFile,
        ReferencePoint,
        ReferenceSet,
        Subject,
        TagProfile,
        TimeValue,
    };
    use std::{
        collections::{BTreeMap, BTreeSet},
        fs,
        path::{Path, PathBuf},
        sync::Mutex,
    };
    use tempfile::TempDir;

    type Tags = BTreeMap<String, TimeValue>;

    /// In-memory stand-in for exiftool.
    #[derive(Default)]
    struct FakeMetadata {
        files: Mutex<BTreeMap<PathBuf, Tags>>,
        fail_writes: BTreeSet<PathBuf>,
        writes: Mutex<Vec<(PathBuf, Vec<String>, TimeValue)>>,
        video_type: Option<String>,
        video: Vec<u8>,
        listing: String,
    }

    impl FakeMetadata {
        fn with_file(self, path: &Path, tags: &[(&str, TimeValue)]) -> Self {
            let tags = tags.iter().map(|(t, v)| (t.to_string(), *v)).collect();
            self.files.lock().unwrap().insert(path.to_owned(), tags);
            self
        }

        fn tags(&self, path: &Path) -> Tags {
            self.files.lock().unwrap().get(path).cloned().unwrap_or_default()
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    impl MetadataIo for FakeMetadata {
        fn read_timestamp(&self, path: &Path, candidates: &[String]) -> Result<Reading, DriftError> {
            select_reading(path, &self.tags(path), candidates)
        }

        fn read_dates(&self, path: &Path) -> Result<Tags, DriftError> {
            Ok(self.tags(path))
        }

        fn write_timestamp(&self, path: &Path, tags: &[String], value: TimeValue) -> Result<(), DriftError> {
            if self.fail_writes.contains(path) {
                return Err(DriftError::ToolFailed {
                    tool: "fake".into(),
                    path: path.to_owned(),
                    message: "read-only".into(),
                })
            }
            let mut files = self.files.lock().unwrap();
            let entry = files.entry(path.to_owned()).or_default();
            for tag in tags.iter() {
                entry.insert(tag.to_owned(), value);
            }
            self.writes.lock().unwrap().push((path.to_owned(), tags.to_vec(), value));
            Ok(())
        }
    }

    impl ContainerIo for FakeMetadata {
        fn copy_tags(&self, from: &Path, to: &Path) -> Result<(), DriftError> {
            let tags = self.tags(from);
            self.files.lock().unwrap().insert(to.to_owned(), tags);
            Ok(())
        }

        fn embedded_video_type(&self, _path: &Path) -> Result<Option<String>, DriftError> {
            Ok(self.video_type.to_owned())
        }

        fn embedded_video(&self, _path: &Path) -> Result<Vec<u8>, DriftError> {
            Ok(self.video.to_owned())
        }

        fn trailer_listing(&self, _path: &Path) -> Result<String, DriftError> {
            Ok(self.listing.to_owned())
        }
    }

    /// Writes an empty image, or fails for the stamp `0`.
    struct FakeExtractor;

    impl FrameExtractor for FakeExtractor {
        fn extract_frame(&self, video: &Path, at: &FrameStamp, output: &Path) -> Result<(), DriftError> {
            if at.original() == "0" {
                return Err(DriftError::ToolFailed {
                    tool: "fake".into(),
                    path: video.to_owned(),
                    message: "no frame".into(),
                })
            }
            fs::write(output, b"")?;
            Ok(())
        }
    }

    fn t(secs: i64) -> TimeValue {
        TimeValue::from_secs(secs)
    }

    fn date(value: &str) -> TimeValue {
        TimeValue::parse(value).unwrap()
    }

    /// Camera gaining 20 s per 1000 s.
    fn fast_camera() -> ReferenceSet {
        ReferenceSet::build(vec![(1000, 1000).into(), (2000, 1980).into()]).unwrap()
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    // ------------------------------------------------------------------
    // Subjects and batches
    // ------------------------------------------------------------------

    #[test]
    fn batch_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let b = touch(&dir, "b.jpg");
        let c = touch(&dir, "c.jpg");
        let io = FakeMetadata::default()
            .with_file(&a, &[("DateTimeOriginal", t(1500))])
            .with_file(&b, &[("DateTimeOriginal", t(500))])
            .with_file(&c, &[("DateTimeOriginal", t(3000))]);

        let subjects: Vec<Subject> = vec![a.to_owned().into(), b.to_owned().into(), c.to_owned().into()];
        let config = CorrectionConfig::new().with_jobs(2);
        let report = run_batch(&subjects, &io, &fast_camera(), &config).unwrap();

        assert_eq!(report.len(), 3);
        assert!(!report.has_failures());
        let paths: Vec<&Path> = report.results.iter().map(|(p, _)| p.as_path()).collect();
        assert_eq!(paths, vec![a.as_path(), b.as_path(), c.as_path()]);

        let deltas: Vec<f64> = report.successes().map(|o| o.correction.delta_seconds).collect();
        assert_eq!(deltas, vec![-10.0, 10.0, -40.0]);

        assert_eq!(io.tags(&a)["DateTimeOriginal"], t(1490));
        assert_eq!(io.tags(&b)["DateTimeOriginal"], t(510));
        assert_eq!(io.tags(&c)["DateTimeOriginal"], t(2960));
    }

    #[test]
    fn batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = touch(&dir, "good.jpg");
        let untagged = touch(&dir, "untagged.jpg");
        let locked = touch(&dir, "locked.jpg");
        let missing = dir.path().join("missing.jpg");

        let mut io = FakeMetadata::default()
            .with_file(&good, &[("CreateDate", t(1500))])
            .with_file(&untagged, &[])
            .with_file(&locked, &[("CreateDate", t(1500))])
            .with_file(&missing, &[("CreateDate", t(1500))]);
        io.fail_writes.insert(locked.to_owned());

        let subjects: Vec<Subject> = [&missing, &good, &untagged, &locked]
            .iter()
            .map(|p| Subject::new(p))
            .collect();
        let report = run_batch(&subjects, &io, &fast_camera(), &CorrectionConfig::default()).unwrap();

        assert!(report.has_failures());
        assert_eq!(report.successes().count(), 1);
        let failures: Vec<(&Path, &DriftError)> = report.failures().collect();
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].0, missing.as_path());
        assert!(matches!(failures[0].1, DriftError::SubjectUnreadable { .. }));
        assert!(matches!(failures[1].1, DriftError::SubjectUnreadable { .. }));
        assert!(matches!(failures[2].1, DriftError::SubjectWriteFailed { .. }));

        // the good file was still written
        assert_eq!(io.tags(&good)["CreateDate"], t(1490));
        assert_eq!(io.write_count(), 1);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let io = FakeMetadata::default().with_file(&a, &[("DateTimeOriginal", t(1500))]);
        let config = CorrectionConfig::new().with_dry_run(true);

        let outcome = Subject::new(&a).correct(&io, &fast_camera(), &config).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.correction.corrected, t(1490));
        assert_eq!(io.write_count(), 0);
        assert_eq!(io.tags(&a)["DateTimeOriginal"], t(1500));
        assert_eq!(
            outcome.to_string(),
            format!("{} will be shifted by -10 seconds", a.display())
        );
    }

    #[test]
    fn excluded_tag_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let io = FakeMetadata::default().with_file(&a, &[
            ("DateTimeOriginal", t(9000)),
            ("CreateDate", t(1500)),
            ("ModifyDate", t(1600)),
        ]);
        let config = CorrectionConfig::new().with_excluded_tags(vec!["DateTimeOriginal".into()]);

        let outcome = Subject::new(&a).correct(&io, &fast_camera(), &config).unwrap();
        assert_eq!(outcome.reading.tag, "CreateDate");
        assert_eq!(outcome.tags, vec!["CreateDate", "DateTimeOriginal", "ModifyDate"]);
        assert!(outcome.written);
        assert_eq!(outcome.to_string(), format!("Shifted {} by -10 seconds", a.display()));

        let tags = io.tags(&a);
        assert!(tags.values().all(|v| *v == t(1490)));
    }

    #[test]
    fn video_profile_prefers_create_date() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.mov");
        let io = FakeMetadata::default().with_file(&a, &[
            ("MediaCreateDate", t(1200)),
            ("CreateDate", t(1500)),
        ]);
        let config = CorrectionConfig::new().with_profile(TagProfile::Video);
        let reading = Subject::new(&a).read(&io, &config).unwrap();
        assert_eq!(reading.tag, "CreateDate");
        assert_eq!(reading.value, t(1500));
    }

    // ------------------------------------------------------------------
    // Native MP4 dates
    // ------------------------------------------------------------------

    fn atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut bytes = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(payload);
        bytes
    }

    fn dates_v0(creation: u64, modification: u64, rest: usize) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(&(creation as u32).to_be_bytes());
        bytes.extend_from_slice(&(modification as u32).to_be_bytes());
        bytes.extend(std::iter::repeat(0xaa).take(rest));
        bytes
    }

    fn dates_v1(creation: u64, modification: u64, rest: usize) -> Vec<u8> {
        let mut bytes = vec![1, 0, 0, 0];
        bytes.extend_from_slice(&creation.to_be_bytes());
        bytes.extend_from_slice(&modification.to_be_bytes());
        bytes.extend(std::iter::repeat(0xbb).take(rest));
        bytes
    }

    /// ftyp, moov{mvhd v0, trak{tkhd v0, mdia{mdhd v1}}}, mdat.
    /// The track modification date is left unset.
    fn write_mp4(dir: &TempDir, created: TimeValue) -> PathBuf {
        let secs = time_value_to_mp4(created).unwrap();

        let mdhd = atom(b"mdhd", &dates_v1(secs + 10, secs + 11, 8));
        let mdia = atom(b"mdia", &mdhd);
        let mut trak = atom(b"tkhd", &dates_v0(secs + 5, 0, 72));
        trak.extend(mdia);
        let trak = atom(b"trak", &trak);
        let mut moov = atom(b"mvhd", &dates_v0(secs, secs + 1, 88));
        moov.extend(trak);

        let mut file = atom(b"ftyp", b"isom\0\0\x02\0isomiso2");
        file.extend(atom(b"moov", &moov));
        file.extend(atom(b"mdat", b"frame data"));

        let path = dir.path().join("clip.mp4");
        fs::write(&path, file).unwrap();
        path
    }

    #[test]
    fn mp4_reads_all_date_atoms() {
        let dir = tempfile::tempdir().unwrap();
        let created = date("2020-06-01 12:00:00");
        let path = write_mp4(&dir, created);

        let values = Mp4Metadata::new().values(&path).unwrap();
        assert_eq!(values["CreateDate"], created);
        assert_eq!(values["ModifyDate"], created.shift(1.0).unwrap());
        assert_eq!(values["TrackCreateDate"], created.shift(5.0).unwrap());
        assert_eq!(values["MediaCreateDate"], created.shift(10.0).unwrap());
        assert_eq!(values["MediaModifyDate"], created.shift(11.0).unwrap());
        // zero means unset
        assert!(!values.contains_key("TrackModifyDate"));

        let config = CorrectionConfig::new().with_profile(TagProfile::Video);
        let reading = Mp4Metadata::new().read_timestamp(&path, &config.candidate_tags()).unwrap();
        assert_eq!(reading.tag, "CreateDate");
        assert_eq!(reading.date_tags.len(), 5);
    }

    #[test]
    fn mp4_rewrites_dates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_mp4(&dir, date("2020-06-01 12:00:00"));
        let before = fs::read(&path).unwrap();

        let new = date("2021-01-02 03:04:05");
        let tags = vec!["CreateDate".to_owned(), "MediaModifyDate".to_owned()];
        Mp4Metadata::new().write_timestamp(&path, &tags, new).unwrap();

        let after = fs::read(&path).unwrap();
        assert_eq!(before.len(), after.len());
        assert!(after.ends_with(b"frame data"));

        let values = Mp4Metadata::new().values(&path).unwrap();
        assert_eq!(values["CreateDate"], new);
        assert_eq!(values["MediaModifyDate"], new);
        assert_eq!(values["TrackCreateDate"], date("2020-06-01 12:00:05"));
    }

    #[test]
    fn mp4_rejects_date_beyond_32_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_mp4(&dir, date("2020-06-01 12:00:00"));
        let before = fs::read(&path).unwrap();

        // mdhd (64-bit) would accept it, mvhd (32-bit) does not
        let tags = vec!["MediaCreateDate".to_owned(), "CreateDate".to_owned()];
        let res = Mp4Metadata::new().write_timestamp(&path, &tags, date("2100-01-01 00:00:00"));
        assert!(matches!(res, Err(DriftError::TimeRange(_))));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    fn write_truncated_mp4(dir: &TempDir, mvhd: &[u8]) -> PathBuf {
        let mut moov = atom(b"mvhd", mvhd);
        moov.extend(atom(b"free", &[0; 8]));
        let mut file = atom(b"ftyp", b"isom\0\0\x02\0");
        file.extend(atom(b"moov", &moov));

        let path = dir.path().join("short.mp4");
        fs::write(&path, file).unwrap();
        path
    }

    #[test]
    fn mp4_truncated_date_atom_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // version 0 needs 12 bytes, only 8 present
        let path = write_truncated_mp4(&dir, &dates_v0(100, 200, 0)[..8]);
        let before = fs::read(&path).unwrap();

        assert!(matches!(
            Mp4Metadata::new().values(&path),
            Err(DriftError::UnexpectedAtomSize { .. })
        ));
        let res = Mp4Metadata::new().write_timestamp(&path, &["CreateDate".to_owned()], t(0));
        assert!(matches!(res, Err(DriftError::UnexpectedAtomSize { .. })));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn mp4_truncated_version_1_atom_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // enough for version 0, not for the 64-bit dates of version 1
        let path = write_truncated_mp4(&dir, &dates_v1(100, 200, 0)[..16]);
        assert!(matches!(
            Mp4Metadata::new().values(&path),
            Err(DriftError::UnexpectedAtomSize { .. })
        ));
    }

    #[test]
    fn mp4_write_without_matching_atom() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_mp4(&dir, date("2020-06-01 12:00:00"));
        let res = Mp4Metadata::new().write_timestamp(&path, &["DateTimeOriginal".to_owned()], t(0));
        assert!(matches!(res, Err(DriftError::NoSuchAtom(_))));
    }

    #[test]
    fn mp4_subject_correction() {
        let dir = tempfile::tempdir().unwrap();
        let created = date("2020-06-01 12:00:00");
        let path = write_mp4(&dir, created);

        // camera clock one hour ahead
        let refs = ReferenceSet::build(vec![
            ReferencePoint::new(date("2020-06-01 00:00:00"), date("2020-05-31 23:00:00")),
            ReferencePoint::new(date("2020-06-02 00:00:00"), date("2020-06-01 23:00:00")),
        ]).unwrap();
        let config = CorrectionConfig::new().with_profile(TagProfile::Video);

        let outcome = Subject::new(&path).correct(&Mp4Metadata::new(), &refs, &config).unwrap();
        assert_eq!(outcome.correction.delta_seconds, -3600.0);

        let values = Mp4Metadata::new().values(&path).unwrap();
        assert!(values.values().all(|v| *v == date("2020-06-01 11:00:00")));
    }

    // ------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------

    #[test]
    fn capture_prompts_skips_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let b = touch(&dir, "b.jpg");
        let c = touch(&dir, "c.jpg");
        let missing = dir.path().join("missing.jpg");
        let io = FakeMetadata::default()
            .with_file(&a, &[("DateTimeOriginal", date("2020-01-01 10:00:00"))])
            .with_file(&b, &[("DateTimeOriginal", date("2020-01-01 11:00:00"))])
            .with_file(&c, &[("DateTimeOriginal", date("2020-01-01 12:00:00"))]);

        let subjects: Vec<Subject> = [&a, &missing, &b, &c].iter().map(|p| Subject::new(p)).collect();
        let mut input = "10 o'clock\n2020-01-01 09:59:00\n\n2020-01-01 11:58:00\n".as_bytes();
        let mut output = Vec::new();
        let points = capture_references(
            &subjects,
            &io,
            &CorrectionConfig::default(),
            &mut input,
            &mut output
        ).unwrap();

        assert_eq!(points, vec![
            ReferencePoint::new(date("2020-01-01 10:00:00"), date("2020-01-01 09:59:00")),
            ReferencePoint::new(date("2020-01-01 12:00:00"), date("2020-01-01 11:58:00")),
        ]);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("try again"));
        assert!(output.contains("was recorded at 2020-01-01 11:00:00"));
        assert!(output.contains("missing.jpg"));
    }

    #[test]
    fn capture_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let b = touch(&dir, "b.jpg");
        let io = FakeMetadata::default()
            .with_file(&a, &[("CreateDate", t(100))])
            .with_file(&b, &[("CreateDate", t(200))]);
        let subjects = vec![Subject::new(&a), Subject::new(&b)];

        let mut input = "".as_bytes();
        let points = capture_references(
            &subjects,
            &io,
            &CorrectionConfig::default(),
            &mut input,
            &mut Vec::new()
        ).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn capture_stores_sorted_reference_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let b = touch(&dir, "b.jpg");
        let io = FakeMetadata::default()
            .with_file(&a, &[("DateTimeOriginal", date("2020-01-02 10:00:00"))])
            .with_file(&b, &[("DateTimeOriginal", date("2020-01-01 10:00:00"))]);
        let subjects = vec![Subject::new(&a), Subject::new(&b)];
        let refs_path = dir.path().join("refs.csv");

        let mut input = "2020-01-02 09:00:00\n2020-01-01 09:30:00\n".as_bytes();
        let refs = capture_to_file(
            &refs_path,
            &subjects,
            &io,
            &CorrectionConfig::default(),
            &mut input,
            &mut Vec::new()
        ).unwrap();

        assert_eq!(
            fs::read_to_string(&refs_path).unwrap(),
            "2020-01-01 10:00:00,2020-01-01 09:30:00\n2020-01-02 10:00:00,2020-01-02 09:00:00\n"
        );
        let loaded = ReferenceSet::build(ReferenceFile::load(&refs_path).unwrap()).unwrap();
        assert_eq!(loaded, refs);
    }

    #[test]
    fn capture_needs_two_points() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(&dir, "a.jpg");
        let io = FakeMetadata::default().with_file(&a, &[("CreateDate", t(100))]);
        let refs_path = dir.path().join("refs.csv");

        let mut input = "2020-01-01 00:00:00\n".as_bytes();
        let res = capture_to_file(
            &refs_path,
            &[Subject::new(&a)],
            &io,
            &CorrectionConfig::default(),
            &mut input,
            &mut Vec::new()
        );
        assert!(matches!(res, Err(DriftError::InsufficientSamples { found: 1 })));
        assert!(!refs_path.exists());
    }

    // ------------------------------------------------------------------
    // Frames, adjustment, motion photos
    // ------------------------------------------------------------------

    #[test]
    fn frames_are_shifted_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let video = touch(&dir, "clip.mp4");
        let start = date("2020-01-01 10:00:00");
        let io = FakeMetadata::default().with_file(&video, &[
            ("CreateDate", start),
            ("MediaCreateDate", start),
        ]);
        let tools = FrameTools { extractor: &FakeExtractor, container: &io, metadata: &io };

        let stamps: Vec<FrameStamp> = ["1:00.5", "0", "2"].iter().map(|s| FrameStamp::parse(s).unwrap()).collect();
        let outcomes = grab_frames(&video, &stamps, &tools);

        assert_eq!(outcomes.len(), 3);
        let first = dir.path().join("clip_000.jpg");
        assert_eq!(outcomes[0].path, first);
        assert!(outcomes[0].saved && outcomes[0].result.is_ok());
        assert_eq!(io.tags(&first)["CreateDate"], date("2020-01-01 10:01:01"));
        assert_eq!(io.tags(&first)["MediaCreateDate"], date("2020-01-01 10:01:01"));

        assert!(!outcomes[1].saved);
        assert!(outcomes[1].to_string().starts_with("The operation failed for time stamp \"0\""));

        // the failed grab left no file, so its name is reused
        assert_eq!(outcomes[2].path, dir.path().join("clip_001.jpg"));
        assert_eq!(io.tags(&outcomes[2].path)["CreateDate"], date("2020-01-01 10:00:02"));
        // the video itself is untouched
        assert_eq!(io.tags(&video)["CreateDate"], start);
    }

    #[test]
    fn frame_dates_keep_their_own_values() {
        let dir = tempfile::tempdir().unwrap();
        let video = touch(&dir, "clip.mov");
        let io = FakeMetadata::default().with_file(&video, &[
            ("CreateDate", date("2020-01-01 10:00:00")),
            ("MediaCreateDate", date("2020-01-01 10:00:00")),
            ("ModifyDate", date("2020-01-01 12:00:00")),
        ]);
        let tools = FrameTools { extractor: &FakeExtractor, container: &io, metadata: &io };

        let outcomes = grab_frames(&video, &[FrameStamp::parse("2").unwrap()], &tools);
        assert!(outcomes[0].result.is_ok());

        let tags = io.tags(&outcomes[0].path);
        assert_eq!(tags["CreateDate"], date("2020-01-01 10:00:02"));
        assert_eq!(tags["MediaCreateDate"], date("2020-01-01 10:00:02"));
        assert_eq!(tags["ModifyDate"], date("2020-01-01 12:00:02"));
        // tags sharing a value are written together
        assert_eq!(io.write_count(), 2);
    }

    #[test]
    fn frame_without_dates_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let video = touch(&dir, "clip.mov");
        let io = FakeMetadata::default().with_file(&video, &[]);
        let tools = FrameTools { extractor: &FakeExtractor, container: &io, metadata: &io };

        let outcomes = grab_frames(&video, &[FrameStamp::parse("2").unwrap()], &tools);
        assert!(outcomes[0].saved);
        assert!(matches!(outcomes[0].result, Err(DriftError::SubjectUnreadable { .. })));
    }

    #[test]
    fn adjustment_from_create_date() {
        let dir = tempfile::tempdir().unwrap();
        let photo = touch(&dir, "clock.jpg");
        let io = FakeMetadata::default().with_file(&photo, &[("CreateDate", date("2020-01-01 10:15:30"))]);

        let shown = ClockTime::parse("10:14:00").unwrap();
        let adjustment = tell_adjustment(&photo, shown, &io).unwrap();
        assert_eq!(adjustment.seconds, -90);
        assert_eq!(adjustment.hms(), "-00:01:30");
    }

    fn mp4_bytes() -> Vec<u8> {
        let mut bytes = atom(b"ftyp", b"isom\0\0\x02\0");
        bytes.extend(atom(b"mdat", b"clip"));
        bytes
    }

    #[test]
    fn motion_photo_split() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("20200101_101010.jpg");
        fs::write(&image, vec![0xffu8; 100]).unwrap();

        let io = FakeMetadata {
            video_type: Some("MotionPhoto_Data".into()),
            video: mp4_bytes(),
            listing: "JPEG SOI\nSamsung trailer (36 bytes at offset 0x40):\n  EmbeddedVideoFile = (Binary data 20 bytes)\nJPEG EOI\n".into(),
            ..FakeMetadata::default()
        };

        let outcome = extract_motion_photo(&image, &io, true).unwrap();
        assert_eq!(outcome.video, dir.path().join("20200101_101010.mp4"));
        assert_eq!(fs::read(&outcome.video).unwrap(), mp4_bytes());
        assert!(outcome.tags_copied);
        assert_eq!(outcome.truncated_to, Some(0x40));
        assert_eq!(fs::metadata(&image).unwrap().len(), 0x40);
    }

    #[test]
    fn motion_photo_split_never_grows_image() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("b.jpg");
        fs::write(&image, vec![0xffu8; 100]).unwrap();
        let io = FakeMetadata {
            video_type: Some("MotionPhoto_Data".into()),
            video: mp4_bytes(),
            listing: "Samsung trailer (36 bytes at offset 0x1000):\n  EmbeddedVideoFile = (Binary data 20 bytes)\n".into(),
            ..FakeMetadata::default()
        };

        let outcome = extract_motion_photo(&image, &io, true).unwrap();
        assert_eq!(outcome.truncated_to, None);
        assert_eq!(fs::read(&image).unwrap(), vec![0xffu8; 100]);
        assert!(outcome.video.is_file());
    }

    #[test]
    fn motion_photo_without_split_keeps_image() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("a.jpg");
        fs::write(&image, vec![0xffu8; 100]).unwrap();
        let io = FakeMetadata {
            video_type: Some("MotionPhoto_Data".into()),
            video: mp4_bytes(),
            ..FakeMetadata::default()
        };

        let outcome = extract_motion_photo(&image, &io, false).unwrap();
        assert_eq!(outcome.truncated_to, None);
        assert_eq!(fs::metadata(&image).unwrap().len(), 100);
    }

    #[test]
    fn not_a_motion_photo() {
        let dir = tempfile::tempdir().unwrap();
        let image = touch(&dir, "a.jpg");
        let io = FakeMetadata::default();
        assert!(matches!(
            extract_motion_photo(&image, &io, false),
            Err(DriftError::NotMotionPhoto(_))
        ));
        assert!(!dir.path().join("a.mp4").exists());
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// At least two points, strictly increasing in both observed and true time.
        fn increasing_refs() -> impl Strategy<Value = ReferenceSet> {
            (
                0i64..2_000_000_000,
                -10_000i64..10_000,
                prop::collection::vec((1i64..100_000, 1i64..100_000), 1..8),
            ).prop_map(|(start, offset, gaps)| {
                let mut observed = start;
                let mut truth = start + offset;
                let mut points = vec![ReferencePoint::new(t(observed), t(truth))];
                for (d_obs, d_truth) in gaps {
                    observed += d_obs;
                    truth += d_truth;
                    points.push(ReferencePoint::new(t(observed), t(truth)));
                }
                ReferenceSet::build(points).unwrap()
            })
        }

        proptest! {
            #[test]
            fn segment_points_are_adjacent(refs in increasing_refs(), q in -1_000i64..3_000_000_000) {
                let (a, b) = refs.locate_segment(t(q));
                let i = refs.points().iter().position(|p| p == a).unwrap();
                prop_assert_eq!(&refs.points()[i + 1], b);
            }

            #[test]
            fn interior_query_is_bracketed(refs in increasing_refs(), at in any::<prop::sample::Index>()) {
                let lo = refs.first().observed().secs() as i64;
                let hi = refs.last().observed().secs() as i64;
                let q = t(lo + at.index((hi - lo) as usize) as i64);
                let (a, b) = refs.locate_segment(q);
                prop_assert!(a.observed() <= q);
                prop_assert!(q < b.observed());
            }

            #[test]
            fn reference_points_are_exact(refs in increasing_refs()) {
                for point in refs.iter() {
                    prop_assert_eq!(refs.correct(point.observed()).unwrap().corrected, point.truth());
                }
            }

            #[test]
            fn two_points_are_linear(
                o0 in 0i64..1_000_000_000,
                span in 1i64..1_000_000,
                t0 in 0i64..1_000_000_000,
                t_span in 1i64..1_000_000,
                q in 0i64..2_000_000_000,
            ) {
                let refs = ReferenceSet::build(vec![(o0, t0).into(), (o0 + span, t0 + t_span).into()]).unwrap();
                let slope = t_span as f64 / span as f64;
                // anchored at the other end of the segment
                let expected = (t0 + t_span) as f64 + (q - o0 - span) as f64 * slope;
                let corrected = refs.correct(t(q)).unwrap().corrected.secs();
                prop_assert!((corrected - expected).abs() <= 0.5 + 1e-3);
            }

            #[test]
            fn correction_is_monotonic(refs in increasing_refs(), q1 in 0i64..3_000_000_000, q2 in 0i64..3_000_000_000) {
                let (lo, hi) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
                let c_lo = refs.correct(t(lo)).unwrap().corrected;
                let c_hi = refs.correct(t(hi)).unwrap().corrected;
                prop_assert!(c_lo <= c_hi);
            }
        }
    }
}
