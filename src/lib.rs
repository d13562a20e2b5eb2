//! Two-level text diffing
//!
//! Documents are aligned line by line first, then every small changed block is
//! aligned character by character. The result is a list of line block
//! mappings, each optionally refined into character ranges.
//!
//! ```
//! use linediff::{DiffOptions, LinesDiffComputer};
//!
//! let diff = LinesDiffComputer::new().compute_diff(
//!     &["hello world"],
//!     &["hello brave world"],
//!     &DiffOptions::default(),
//! );
//!
//! assert_eq!(diff.changes.len(), 1);
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use areas::computer::LinesDiffComputer;
pub use artifacts::algorithms::deadline::Deadline;
pub use artifacts::mapping::{LineRangeMapping, LinesDiff, RangeMapping};
pub use artifacts::options::DiffOptions;
pub use artifacts::wire::DiffWire;
