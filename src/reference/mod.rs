//! Reference points pairing a device's clock with true time,
//! and the sorted sets that correction interpolates over.

pub mod point;
pub mod set;
pub mod file;

pub use point::ReferencePoint;
pub use set::{DuplicatePolicy, ReferenceSet};
pub use file::ReferenceFile;
