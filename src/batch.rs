//! Correcting many subjects against one reference set.
//!
//! Subjects are independent of each other and are processed on a bounded
//! `rayon` pool. The reference set is only read. Each subject's read and
//! write happen in sequence within the same task, and results come back in
//! input order, each paired with its path.

use std::path::{Path, PathBuf};

use rayon::{iter::{IntoParallelRefIterator, ParallelIterator}, ThreadPoolBuilder};
use tracing::debug;

use crate::{CorrectionConfig, DriftError, MetadataIo, ReferenceSet, Subject, SubjectOutcome};

/// Per-subject results of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, Result<SubjectOutcome, DriftError>)>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &SubjectOutcome> {
        self.results.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &DriftError)> {
        self.results.iter().filter_map(|(p, r)| r.as_ref().err().map(|e| (p.as_path(), e)))
    }

    /// `true` if any subject could not be read, corrected or written.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Corrects all `subjects`. Failures are kept per subject
/// and never stop the batch.
///
/// Only starting the worker pool can fail the whole call.
pub fn run_batch(
    subjects: &[Subject],
    io: &dyn MetadataIo,
    refs: &ReferenceSet,
    config: &CorrectionConfig
) -> Result<BatchReport, DriftError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()?;

    debug!(subjects = subjects.len(), threads = pool.current_num_threads(), "starting batch");

    let results: Vec<(PathBuf, Result<SubjectOutcome, DriftError>)> = pool.install(|| {
        subjects.par_iter()
            .map(|subject| {
                let result = subject.correct(io, refs, config);
                if let Err(err) = &result {
                    debug!(path = %subject.path().display(), %err, "subject failed");
                }
                (subject.path().to_owned(), result)
            })
            .collect()
    });

    Ok(BatchReport { results })
}
