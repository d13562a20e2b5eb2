use crate::artifacts::algorithms::deadline::Deadline;
use serde::{Deserialize, Serialize};

/// Caller-facing knobs of a diff computation
///
/// Deserializes from camelCase keys so option blobs produced by editor hosts can be
/// used as-is. Missing keys take their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    /// Treat lines that only differ in leading/trailing whitespace as equal
    pub ignore_trim_whitespace: bool,
    /// Time budget in milliseconds, `0` for none
    pub max_computation_time_ms: u32,
    /// Refine blocks of any size instead of only small ones
    pub compute_more_minimal_edits: bool,
}

impl DiffOptions {
    pub fn deadline(&self) -> Deadline {
        Deadline::from_millis(self.max_computation_time_ms)
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_trim_whitespace: true,
            max_computation_time_ms: 5000,
            compute_more_minimal_edits: false,
        }
    }
}
