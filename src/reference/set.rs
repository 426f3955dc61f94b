//! Sorted reference points and segment lookup.
//!
//! A set is sorted ascending by observed time, holds no two points
//! with the same observed time, and has at least two points, so that
//! every query can be mapped onto a segment.
//!
//! Segment selection at and beyond the range edges always widens to
//! the outermost segment:
//!
//! ```ignore
//!   query <= p[0]          -> (p[0], p[1])
//!   p[i] <= query < p[i+1] -> (p[i], p[i+1])
//!   query >= p[last]       -> (p[last-1], p[last])
//! ```
//!
//! A query equal to an interior point's observed time therefore
//! uses the segment starting at that point.

use std::slice::Iter;

use tracing::debug;

use crate::{DriftError, ReferencePoint, TimeValue};

/// What to do with points sharing an observed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `DriftError::DuplicateObservedTime`.
    #[default]
    Reject,
    /// Keep the first point in input order, drop the rest.
    KeepFirst,
}

/// Validated, sorted reference points. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    points: Vec<ReferencePoint>,
}

impl ReferenceSet {
    /// Builds a set, rejecting duplicate observed times.
    pub fn build(points: Vec<ReferencePoint>) -> Result<Self, DriftError> {
        Self::build_with(points, DuplicatePolicy::Reject)
    }

    /// Builds a set, resolving duplicate observed times via `policy`.
    ///
    /// Sorting is stable, so with `DuplicatePolicy::KeepFirst`
    /// the point kept is the earliest one in `points`.
    pub fn build_with(
        mut points: Vec<ReferencePoint>,
        policy: DuplicatePolicy
    ) -> Result<Self, DriftError> {
        points.sort_by(|a, b| a.observed.cmp(&b.observed));

        let before = points.len();
        match policy {
            DuplicatePolicy::Reject => {
                if let Some(pair) = points.windows(2).find(|w| w[0].observed == w[1].observed) {
                    return Err(DriftError::DuplicateObservedTime {
                        observed: pair[0].observed.to_string()
                    })
                }
            },
            DuplicatePolicy::KeepFirst => {
                points.dedup_by(|later, earlier| later.observed == earlier.observed);
                if points.len() != before {
                    debug!(dropped = before - points.len(), "dropped duplicate reference points");
                }
            },
        }

        if points.len() < 2 {
            return Err(DriftError::InsufficientSamples { found: points.len() })
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    pub fn iter(&self) -> Iter<'_, ReferencePoint> {
        self.points.iter()
    }

    /// Number of points, at least 2.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`, kept for API symmetry with `len()`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &ReferencePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &ReferencePoint {
        &self.points[self.points.len() - 1]
    }

    /// Returns the adjacent pair of points whose segment
    /// is used to correct `query`. See module docs for edge handling.
    pub fn locate_segment(&self, query: TimeValue) -> (&ReferencePoint, &ReferencePoint) {
        let last = self.points.len() - 1;

        if query <= self.points[0].observed {
            return (&self.points[0], &self.points[1])
        }
        if query >= self.points[last].observed {
            return (&self.points[last - 1], &self.points[last])
        }

        // Strictly inside the range: first point with observed > query
        // exists and is not the first point.
        let upper = self.points.partition_point(|p| p.observed <= query);
        (&self.points[upper - 1], &self.points[upper])
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a ReferencePoint;
    type IntoIter = Iter<'a, ReferencePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
