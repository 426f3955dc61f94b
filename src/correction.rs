//! Piecewise-linear drift correction.
//!
//! The observed time is mapped onto true time with the straight line
//! through the two reference points of its segment, extrapolating
//! past either end of the reference range without clamping.

use crate::{DriftError, ReferenceSet, TimeValue};

/// Corrected time and the signed offset applied to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionResult {
    /// Corrected time, whole seconds.
    pub corrected: TimeValue,
    /// `corrected - observed` in seconds.
    pub delta_seconds: f64,
}

/// Stateless corrector. Only reads its inputs,
/// so it may be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftCorrector;

impl DriftCorrector {
    /// Corrects `query` using the segment `refs` selects for it.
    pub fn correct(query: TimeValue, refs: &ReferenceSet) -> Result<CorrectionResult, DriftError> {
        let (start, end) = refs.locate_segment(query);

        let span = end.observed - start.observed;
        if span == 0.0 {
            return Err(DriftError::DegenerateSegment { observed: start.observed.secs() })
        }
        let slope = (end.truth - start.truth) / span;

        // Equivalent to `query * slope + (start.truth - start.observed * slope)`,
        // but avoids multiplying epoch sized values by the slope.
        let corrected = TimeValue::new(start.truth.secs() + (query - start.observed) * slope)?.round();

        Ok(CorrectionResult {
            corrected,
            delta_seconds: corrected - query,
        })
    }
}

impl ReferenceSet {
    /// Shorthand for `DriftCorrector::correct(query, self)`.
    pub fn correct(&self, query: TimeValue) -> Result<CorrectionResult, DriftError> {
        DriftCorrector::correct(query, self)
    }
}
