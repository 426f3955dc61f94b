use crate::TimeValue;

/// One sample of what the device's clock said (`observed`)
/// versus what time it actually was (`truth`).
/// Only meaningful inside a `ReferenceSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePoint {
    pub(crate) observed: TimeValue,
    pub(crate) truth: TimeValue,
}

impl ReferencePoint {
    pub fn new(observed: TimeValue, truth: TimeValue) -> Self {
        Self { observed, truth }
    }

    pub fn observed(&self) -> TimeValue {
        self.observed
    }

    pub fn truth(&self) -> TimeValue {
        self.truth
    }

    /// Drift at this point in seconds, `truth - observed`.
    pub fn drift(&self) -> f64 {
        self.truth - self.observed
    }
}

impl From<(i64, i64)> for ReferencePoint {
    fn from((observed, truth): (i64, i64)) -> Self {
        Self::new(TimeValue::from_secs(observed), TimeValue::from_secs(truth))
    }
}
