use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::{BufReader, Seek, SeekFrom, Write},
    path::Path,
};

use binrw::BinWriterExt;
use tracing::debug;

use crate::{
    metadata::select_reading,
    mp4::dates::{read_date_atoms, time_value_to_mp4},
    DateAtom,
    DriftError,
    MetadataIo,
    Reading,
    TimeValue,
};

/// Reads and rewrites QuickTime/MP4 dates without external tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4Metadata;

impl Mp4Metadata {
    pub fn new() -> Self {
        Self
    }

    /// All date-bearing atoms in the file at `path`.
    pub fn date_atoms(&self, path: &Path) -> Result<Vec<DateAtom>, DriftError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        read_date_atoms(&mut BufReader::new(file), len)
    }

    /// Tag values present in the file. For tags occurring in several
    /// atoms (one `tkhd` per track) the first one in file order is kept.
    pub fn values(&self, path: &Path) -> Result<BTreeMap<String, TimeValue>, DriftError> {
        let mut values = BTreeMap::new();
        for atom in self.date_atoms(path)?.iter() {
            if let Some(t) = atom.creation() {
                values.entry(atom.kind.creation_tag().to_owned()).or_insert(t);
            }
            if let Some(t) = atom.modification() {
                values.entry(atom.kind.modification_tag().to_owned()).or_insert(t);
            }
        }
        Ok(values)
    }
}

impl MetadataIo for Mp4Metadata {
    fn read_timestamp(&self, path: &Path, candidates: &[String]) -> Result<Reading, DriftError> {
        let values = self.values(path)?;
        select_reading(path, &values, candidates)
    }

    fn read_dates(&self, path: &Path) -> Result<BTreeMap<String, TimeValue>, DriftError> {
        self.values(path)
    }

    fn write_timestamp(&self, path: &Path, tags: &[String], value: TimeValue) -> Result<(), DriftError> {
        let secs = time_value_to_mp4(value)?;
        let mut atoms = self.date_atoms(path)?;

        // Apply to all atoms in memory first, so a value that does not
        // fit a 32-bit field fails before anything is written.
        let mut changed = Vec::new();
        for atom in atoms.iter_mut() {
            let mut hit = false;
            for tag in tags.iter() {
                hit |= atom.set(tag, secs)?;
            }
            if hit {
                changed.push(atom);
            }
        }

        if changed.is_empty() {
            return Err(DriftError::NoSuchAtom(format!("for tags {}", tags.join(", "))))
        }

        let mut file = OpenOptions::new().write(true).open(path)?;
        for atom in changed.iter() {
            file.seek(SeekFrom::Start(atom.header.data_offset()))?;
            file.write_be(&atom.dates)?;
        }
        file.flush()?;

        debug!(path = %path.display(), atoms = changed.len(), "rewrote MP4 dates");
        Ok(())
    }
}
